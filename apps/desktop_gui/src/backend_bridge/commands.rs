//! Backend commands queued from UI to backend worker.

use client_core::{SaveRequest, ToastId};
use shared::domain::PersonId;

/// Which screen asked for a single person; the answer is routed back to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPurpose {
    Edit,
    Delete,
}

#[derive(Debug, Clone)]
pub enum BackendCommand {
    LoadPeople,
    /// Like `LoadPeople`, but drops the cached collection so the server is asked again.
    ReloadPeople,
    LoadPerson { id: PersonId, purpose: LoadPurpose },
    SavePerson(SaveRequest),
    DeletePerson(PersonId),
    /// Publishes an error toast for a failure detected on the UI side.
    ShowError(String),
    DismissToast(ToastId),
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::LoadPeople => "load_people",
            BackendCommand::ReloadPeople => "reload_people",
            BackendCommand::LoadPerson { .. } => "load_person",
            BackendCommand::SavePerson(SaveRequest::Create(_)) => "create_person",
            BackendCommand::SavePerson(SaveRequest::Update(..)) => "update_person",
            BackendCommand::DeletePerson(_) => "delete_person",
            BackendCommand::ShowError(_) => "show_error",
            BackendCommand::DismissToast(_) => "dismiss_toast",
        }
    }
}
