//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext};

/// Queues `cmd` without blocking the frame. On failure the banner explains why and
/// `false` is returned so the caller can roll back its in-flight state.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    banner: &mut Option<UiError>,
) -> bool {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            true
        }
        Err(TrySendError::Full(_)) => {
            tracing::warn!(command = cmd_name, "ui->backend queue full");
            *banner = Some(UiError::from_message(
                UiErrorContext::CommandQueue,
                "UI command queue is full; please retry",
            ));
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::error!(command = cmd_name, "backend worker disconnected");
            *banner = Some(UiError::from_message(
                UiErrorContext::CommandQueue,
                "Backend command processor disconnected; restart the app",
            ));
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::dispatch_backend_command;
    use crate::backend_bridge::commands::BackendCommand;
    use crate::controller::events::{UiErrorCategory, UiErrorContext};
    use crossbeam_channel::bounded;

    #[test]
    fn queues_command_and_leaves_banner_alone() {
        let (tx, rx) = bounded(1);
        let mut banner = None;

        assert!(dispatch_backend_command(&tx, BackendCommand::LoadPeople, &mut banner));
        assert!(banner.is_none());
        assert!(matches!(rx.try_recv(), Ok(BackendCommand::LoadPeople)));
    }

    #[test]
    fn full_queue_sets_transport_banner() {
        let (tx, _rx) = bounded(1);
        let mut banner = None;
        assert!(dispatch_backend_command(&tx, BackendCommand::LoadPeople, &mut banner));
        assert!(!dispatch_backend_command(&tx, BackendCommand::LoadPeople, &mut banner));

        let err = banner.expect("banner");
        assert_eq!(err.context(), UiErrorContext::CommandQueue);
        assert_eq!(err.category(), UiErrorCategory::Transport);
    }

    #[test]
    fn disconnected_worker_is_reported() {
        let (tx, rx) = bounded(4);
        drop(rx);
        let mut banner = None;

        assert!(!dispatch_backend_command(
            &tx,
            BackendCommand::ShowError("boom".to_string()),
            &mut banner
        ));
        let err = banner.expect("banner");
        assert!(err.message().contains("disconnected"));
        assert_eq!(err.headline(), "Directory service unreachable");
    }
}
