//! Backend worker: owns the tokio runtime, the directory client and the toast hub.

use std::{sync::Arc, thread};

use client_core::{workflow, ClientSettings, DirectoryClient, ToastEvent, ToastHub};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use tokio::sync::broadcast;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn spawn_backend_thread(
    settings: ClientSettings,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                send_ui_event(
                    &ui_tx,
                    UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!("failed to build runtime: {err}"),
                    )),
                );
                return;
            }
        };

        runtime.block_on(run_backend(settings, cmd_rx, ui_tx));
    })
}

async fn run_backend(
    settings: ClientSettings,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    let client = match DirectoryClient::over_http(
        settings.api_base_url.clone(),
        settings.request_timeout,
    ) {
        Ok(client) => Arc::new(client),
        Err(err) => {
            tracing::error!("failed to build directory client: {err}");
            send_ui_event(
                &ui_tx,
                UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    err.message(),
                )),
            );
            return;
        }
    };
    let toasts = Arc::new(ToastHub::new(settings.toast_ttl));
    let forwarder = tokio::spawn(forward_toasts(toasts.subscribe(), ui_tx.clone()));

    tracing::info!(api = %settings.api_base_url, "backend worker ready");
    send_ui_event(
        &ui_tx,
        UiEvent::Info(format!("Directory: {}", settings.api_base_url)),
    );

    while let Ok(cmd) = cmd_rx.recv() {
        let client = Arc::clone(&client);
        let toasts = Arc::clone(&toasts);
        let ui_tx = ui_tx.clone();
        tokio::spawn(async move {
            if let Some(event) = handle_command(&client, &toasts, cmd).await {
                send_ui_event(&ui_tx, event);
            }
        });
    }

    tracing::info!("ui command queue closed; backend worker stopping");
    forwarder.abort();
}

/// Runs one command to completion. Toast-only commands produce no UI event.
pub(crate) async fn handle_command(
    client: &DirectoryClient,
    toasts: &ToastHub,
    cmd: BackendCommand,
) -> Option<UiEvent> {
    let event = match cmd {
        BackendCommand::LoadPeople => match workflow::load_people(client, toasts).await {
            Ok(people) => UiEvent::PeopleLoaded(people),
            Err(err) => UiEvent::PeopleLoadFailed(err.message().to_string()),
        },
        BackendCommand::ReloadPeople => match workflow::reload_people(client, toasts).await {
            Ok(people) => UiEvent::PeopleLoaded(people),
            Err(err) => UiEvent::PeopleLoadFailed(err.message().to_string()),
        },
        BackendCommand::LoadPerson { id, purpose } => {
            match workflow::load_person(client, toasts, id).await {
                Ok(person) => UiEvent::PersonLoaded { purpose, person },
                Err(err) => UiEvent::PersonLoadFailed {
                    purpose,
                    id,
                    message: err.message().to_string(),
                },
            }
        }
        BackendCommand::SavePerson(request) => {
            match workflow::save_person(client, toasts, request).await {
                Ok(person) => UiEvent::PersonSaved(person),
                Err(err) => UiEvent::SaveFailed(err.message().to_string()),
            }
        }
        BackendCommand::DeletePerson(id) => {
            match workflow::delete_person(client, toasts, id).await {
                Ok(()) => UiEvent::PersonDeleted(id),
                Err(err) => UiEvent::DeleteFailed(err.message().to_string()),
            }
        }
        BackendCommand::ShowError(message) => {
            toasts.show_error(message);
            return None;
        }
        BackendCommand::DismissToast(id) => {
            toasts.dismiss(id);
            return None;
        }
    };
    Some(event)
}

async fn forward_toasts(mut rx: broadcast::Receiver<ToastEvent>, ui_tx: Sender<UiEvent>) {
    loop {
        match rx.recv().await {
            Ok(event) => send_ui_event(&ui_tx, UiEvent::Toast(event)),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "toast forwarder lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

fn send_ui_event(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    match ui_tx.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(_)) => tracing::warn!("ui event queue full; dropping event"),
        Err(TrySendError::Disconnected(_)) => tracing::debug!("ui event queue closed"),
    }
}
