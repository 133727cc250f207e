//! View-level operations: one directory call each, reported through toasts.
//!
//! Errors come back already prefixed with the user-facing context ("Failed to load person:
//! ..."), so front-ends can show them inline without rebuilding the message.

use shared::{
    domain::{Person, PersonId},
    error::DirectoryError,
    protocol::PersonDraft,
};
use tracing::warn;

use crate::{
    directory::{DirectoryClient, DirectoryResult},
    toast::ToastHub,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveRequest {
    Create(PersonDraft),
    Update(PersonId, PersonDraft),
}

impl SaveRequest {
    fn verb(&self) -> &'static str {
        match self {
            SaveRequest::Create(_) => "create",
            SaveRequest::Update(..) => "update",
        }
    }
}

fn report(toasts: &ToastHub, prefix: &str, err: DirectoryError) -> DirectoryError {
    let err = err.with_prefix(prefix);
    warn!("{err}");
    toasts.show_error(err.message());
    err
}

pub async fn load_people(
    client: &DirectoryClient,
    toasts: &ToastHub,
) -> DirectoryResult<Vec<Person>> {
    client
        .list_all()
        .await
        .map_err(|err| report(toasts, "Failed to load people: ", err))
}

/// Drops the cached collection first so the list comes from the server.
pub async fn reload_people(
    client: &DirectoryClient,
    toasts: &ToastHub,
) -> DirectoryResult<Vec<Person>> {
    client.invalidate().await;
    load_people(client, toasts).await
}

pub async fn load_person(
    client: &DirectoryClient,
    toasts: &ToastHub,
    id: PersonId,
) -> DirectoryResult<Person> {
    client
        .get(id)
        .await
        .map_err(|err| report(toasts, "Failed to load person: ", err))
}

pub async fn save_person(
    client: &DirectoryClient,
    toasts: &ToastHub,
    request: SaveRequest,
) -> DirectoryResult<Person> {
    let verb = request.verb();
    let result = match &request {
        SaveRequest::Create(draft) => client.create(draft).await,
        SaveRequest::Update(id, draft) => client.update(*id, draft).await,
    };

    match result {
        Ok(person) => {
            let message = match request {
                SaveRequest::Create(_) => "Person created successfully!",
                SaveRequest::Update(..) => "Person updated successfully!",
            };
            toasts.show_success(message);
            Ok(person)
        }
        Err(err) => Err(report(toasts, &format!("Failed to {verb} person: "), err)),
    }
}

pub async fn delete_person(
    client: &DirectoryClient,
    toasts: &ToastHub,
    id: PersonId,
) -> DirectoryResult<()> {
    match client.delete(id).await {
        Ok(()) => {
            toasts.show_success("Person deleted successfully!");
            Ok(())
        }
        Err(err) => Err(report(toasts, "Failed to delete person: ", err)),
    }
}

#[cfg(test)]
#[path = "tests/workflow_tests.rs"]
mod tests;
