use super::*;
use crate::{
    directory::PeopleTransport,
    toast::{ToastEvent, ToastKind},
    views::{EditView, SubmitAction},
};
use async_trait::async_trait;
use shared::protocol::PersonPatch;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use tokio::sync::broadcast;

struct StubTransport {
    people: Vec<Person>,
    fail_with: Option<String>,
    calls: Arc<AtomicUsize>,
}

impl StubTransport {
    fn ok(people: Vec<Person>) -> Self {
        Self {
            people,
            fail_with: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            people: Vec::new(),
            fail_with: Some(message.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn check(&self) -> DirectoryResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.fail_with {
            Some(message) => Err(DirectoryError::new(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PeopleTransport for StubTransport {
    async fn fetch_all(&self) -> DirectoryResult<Vec<Person>> {
        self.check()?;
        Ok(self.people.clone())
    }

    async fn fetch_one(&self, id: PersonId) -> DirectoryResult<Person> {
        self.check()?;
        self.people
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| DirectoryError::new("HTTP status client error (404 Not Found)"))
    }

    async fn create(&self, draft: &PersonDraft) -> DirectoryResult<Person> {
        self.check()?;
        Ok(draft.clone().into_person(PersonId(11)))
    }

    async fn update(&self, id: PersonId, draft: &PersonDraft) -> DirectoryResult<PersonPatch> {
        self.check()?;
        Ok(PersonPatch {
            id: Some(id),
            name: Some(draft.name.clone()),
            email: Some(draft.email.clone()),
            phone: Some(draft.phone.clone()),
            address: draft.address.clone(),
            company: draft.company.clone(),
        })
    }

    async fn delete(&self, _id: PersonId) -> DirectoryResult<()> {
        self.check()
    }
}

fn person(id: i64, name: &str) -> Person {
    Person {
        id: PersonId(id),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        phone: "1-463-123-4447".to_string(),
        address: None,
        company: None,
    }
}

fn setup(transport: StubTransport) -> (DirectoryClient, ToastHub, broadcast::Receiver<ToastEvent>) {
    let client = DirectoryClient::new(Arc::new(transport));
    let toasts = ToastHub::default();
    let rx = toasts.subscribe();
    (client, toasts, rx)
}

fn shown(rx: &mut broadcast::Receiver<ToastEvent>) -> Vec<(ToastKind, String)> {
    let mut out = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let ToastEvent::Shown(toast) = event {
            out.push((toast.kind, toast.message));
        }
    }
    out
}

#[tokio::test]
async fn load_people_success_is_silent() {
    let (client, toasts, mut rx) = setup(StubTransport::ok(vec![person(1, "Leanne Graham")]));
    let people = load_people(&client, &toasts).await.expect("load");
    assert_eq!(people.len(), 1);
    assert!(shown(&mut rx).is_empty());
}

#[tokio::test]
async fn load_people_failure_is_broadcast_with_context() {
    let (client, toasts, mut rx) = setup(StubTransport::failing("connection refused"));
    let err = load_people(&client, &toasts).await.expect_err("must fail");

    assert_eq!(err.message(), "Failed to load people: connection refused");
    assert_eq!(
        shown(&mut rx),
        vec![(
            ToastKind::Error,
            "Failed to load people: connection refused".to_string()
        )]
    );
}

#[tokio::test]
async fn reload_goes_back_to_the_server() {
    let transport = StubTransport::ok(vec![person(1, "Leanne Graham")]);
    let calls = Arc::clone(&transport.calls);
    let (client, toasts, mut rx) = setup(transport);

    load_people(&client, &toasts).await.expect("load");
    load_people(&client, &toasts).await.expect("cached load");
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let people = reload_people(&client, &toasts).await.expect("reload");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(people.len(), 1);
    assert_eq!(client.cached_len().await, 1);
    assert!(shown(&mut rx).is_empty());
}

#[tokio::test]
async fn load_person_failure_message_is_prefixed_for_inline_display() {
    let (client, toasts, mut rx) = setup(StubTransport::ok(Vec::new()));
    let err = load_person(&client, &toasts, PersonId(3))
        .await
        .expect_err("missing");
    assert_eq!(
        err.message(),
        "Failed to load person: HTTP status client error (404 Not Found)"
    );
    assert_eq!(shown(&mut rx).len(), 1);
}

#[tokio::test]
async fn create_and_update_report_success() {
    let (client, toasts, mut rx) = setup(StubTransport::ok(vec![person(1, "Leanne Graham")]));

    let mut view = EditView::from_route(Some("new"));
    view.form.name = "Nicholas Runolfsdottir".to_string();
    view.form.email = "Sherwood@rosamond.me".to_string();
    view.form.phone = "586.493.6943 x140".to_string();
    let SubmitAction::Create(draft) = view.submit() else {
        panic!("expected create");
    };
    let created = save_person(&client, &toasts, SaveRequest::Create(draft))
        .await
        .expect("create");
    assert_eq!(created.id, PersonId(11));

    let mut body = PersonDraft::from(&created);
    body.phone = "586.493.6943".to_string();
    save_person(&client, &toasts, SaveRequest::Update(created.id, body))
        .await
        .expect("update");

    assert_eq!(
        shown(&mut rx),
        vec![
            (ToastKind::Success, "Person created successfully!".to_string()),
            (ToastKind::Success, "Person updated successfully!".to_string()),
        ]
    );
}

#[tokio::test]
async fn failed_update_is_broadcast_and_view_can_retry() {
    let (client, toasts, mut rx) = setup(StubTransport::failing("Server error"));
    let mut view = EditView::from_route(Some("4"));
    view.on_loaded(&person(4, "Patricia Lebsack"));

    let SubmitAction::Update(id, draft) = view.submit() else {
        panic!("expected update");
    };
    let err = save_person(&client, &toasts, SaveRequest::Update(id, draft))
        .await
        .expect_err("must fail");
    view.on_save_failed();

    assert_eq!(err.message(), "Failed to update person: Server error");
    assert!(view.can_submit());
    assert_eq!(
        shown(&mut rx),
        vec![(
            ToastKind::Error,
            "Failed to update person: Server error".to_string()
        )]
    );
}

#[tokio::test]
async fn rejected_form_never_reaches_the_network() {
    let transport = StubTransport::ok(Vec::new());
    let calls = Arc::clone(&transport.calls);
    let (_client, _toasts, mut rx) = setup(transport);

    let mut view = EditView::from_route(None);
    view.form.name = "Al".to_string();
    view.form.email = "al@example.com".to_string();
    view.form.phone = "555-0100".to_string();

    assert_eq!(view.submit(), SubmitAction::Rejected);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(shown(&mut rx).is_empty());
}

#[tokio::test]
async fn delete_reports_success_and_failure() {
    let (client, toasts, mut rx) = setup(StubTransport::ok(vec![person(2, "Ervin Howell")]));
    delete_person(&client, &toasts, PersonId(2))
        .await
        .expect("delete");
    assert_eq!(
        shown(&mut rx),
        vec![(ToastKind::Success, "Person deleted successfully!".to_string())]
    );

    let (client, toasts, mut rx) = setup(StubTransport::failing("timed out"));
    let err = delete_person(&client, &toasts, PersonId(2))
        .await
        .expect_err("must fail");
    assert_eq!(err.message(), "Failed to delete person: timed out");
    assert_eq!(shown(&mut rx)[0].0, ToastKind::Error);
}
