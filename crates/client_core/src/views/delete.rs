//! Delete confirmation screen.

use shared::domain::{Person, PersonId};

use super::{parse_person_id, Navigation};

pub const MISSING_ID_MESSAGE: &str = "No person ID provided";

#[derive(Debug, Clone)]
pub struct DeleteView {
    person_id: Option<PersonId>,
    person: Option<Person>,
    loading: bool,
    deleting: bool,
    error: Option<String>,
}

impl DeleteView {
    /// A missing id is an inline error right away; no request is made for it.
    pub fn from_route(id_param: Option<&str>) -> Self {
        let mut view = Self {
            person_id: None,
            person: None,
            loading: false,
            deleting: false,
            error: None,
        };

        match id_param.filter(|raw| !raw.trim().is_empty()) {
            None => view.error = Some(MISSING_ID_MESSAGE.to_string()),
            Some(raw) => match parse_person_id(raw) {
                Some(id) => {
                    view.person_id = Some(id);
                    view.loading = true;
                }
                None => view.error = Some(format!("Invalid person ID: {raw}")),
            },
        }
        view
    }

    pub fn pending_load(&self) -> Option<PersonId> {
        self.person_id.filter(|_| self.loading)
    }

    pub fn on_loaded(&mut self, person: Person) {
        self.person = Some(person);
        self.loading = false;
    }

    pub fn on_load_failed(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.loading = false;
    }

    pub fn person(&self) -> Option<&Person> {
        self.person.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn confirm_label(&self) -> &'static str {
        if self.deleting {
            "Deleting..."
        } else {
            "Confirm Delete"
        }
    }

    /// Returns the id to delete, or `None` while a delete is in flight or nothing is loaded.
    pub fn confirm(&mut self) -> Option<PersonId> {
        if self.deleting || self.person.is_none() {
            return None;
        }
        let id = self.person_id?;
        self.deleting = true;
        Some(id)
    }

    pub fn on_delete_succeeded(&mut self) -> Navigation {
        self.deleting = false;
        Navigation::ToList
    }

    pub fn on_delete_failed(&mut self) {
        self.deleting = false;
    }
}
