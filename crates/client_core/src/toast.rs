//! Transient success/error notifications shared by every view.

use std::{
    collections::HashMap,
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use tokio::{sync::broadcast, task::JoinHandle};
use tracing::debug;

pub const DEFAULT_TOAST_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ToastId(pub u64);

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub kind: ToastKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalReason {
    Expired,
    Dismissed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToastEvent {
    Shown(Toast),
    Removed { id: ToastId, reason: RemovalReason },
}

type ExpiryTable = Arc<Mutex<HashMap<ToastId, JoinHandle<()>>>>;

/// Publish side of the notification channel.
///
/// Every shown toast owns an entry in the expiry table until its timer fires or it is
/// dismissed. Publishing must happen inside a tokio runtime.
pub struct ToastHub {
    next_id: AtomicU64,
    ttl: Duration,
    events: broadcast::Sender<ToastEvent>,
    expiries: ExpiryTable,
}

impl Default for ToastHub {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_TTL)
    }
}

impl ToastHub {
    pub fn new(ttl: Duration) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            next_id: AtomicU64::new(0),
            ttl,
            events,
            expiries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ToastEvent> {
        self.events.subscribe()
    }

    pub fn show_success(&self, message: impl Into<String>) -> ToastId {
        self.show(ToastKind::Success, message.into())
    }

    pub fn show_error(&self, message: impl Into<String>) -> ToastId {
        self.show(ToastKind::Error, message.into())
    }

    fn show(&self, kind: ToastKind, message: String) -> ToastId {
        let id = ToastId(self.next_id.fetch_add(1, Ordering::SeqCst));
        debug!(toast_id = id.0, ?kind, "toast: shown");
        let _ = self.events.send(ToastEvent::Shown(Toast { id, kind, message }));

        let events = self.events.clone();
        let expiries = Arc::clone(&self.expiries);
        let ttl = self.ttl;

        // The timer must not observe the table before its own handle is recorded.
        let mut table = lock_table(&self.expiries);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            if lock_table(&expiries).remove(&id).is_some() {
                debug!(toast_id = id.0, "toast: expired");
                let _ = events.send(ToastEvent::Removed {
                    id,
                    reason: RemovalReason::Expired,
                });
            }
        });
        table.insert(id, handle);
        id
    }

    /// Removes a toast before its timer fires. Returns `false` if it is already gone.
    pub fn dismiss(&self, id: ToastId) -> bool {
        let Some(handle) = lock_table(&self.expiries).remove(&id) else {
            return false;
        };
        handle.abort();
        debug!(toast_id = id.0, "toast: dismissed");
        let _ = self.events.send(ToastEvent::Removed {
            id,
            reason: RemovalReason::Dismissed,
        });
        true
    }

    pub fn pending_timers(&self) -> usize {
        lock_table(&self.expiries).len()
    }
}

impl Drop for ToastHub {
    fn drop(&mut self) {
        for (_, handle) in lock_table(&self.expiries).drain() {
            handle.abort();
        }
    }
}

fn lock_table(
    table: &Mutex<HashMap<ToastId, JoinHandle<()>>>,
) -> std::sync::MutexGuard<'_, HashMap<ToastId, JoinHandle<()>>> {
    table.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Subscriber-side view of the toasts currently on screen, in arrival order.
#[derive(Debug, Default, Clone)]
pub struct ToastTray {
    toasts: Vec<Toast>,
}

impl ToastTray {
    pub fn apply(&mut self, event: ToastEvent) {
        match event {
            ToastEvent::Shown(toast) => self.toasts.push(toast),
            ToastEvent::Removed { id, .. } => self.toasts.retain(|toast| toast.id != id),
        }
    }

    /// Applies every queued event without blocking. A lagged receiver skips the overflowed
    /// events; their removals still arrive later.
    pub fn drain(&mut self, rx: &mut broadcast::Receiver<ToastEvent>) {
        loop {
            match rx.try_recv() {
                Ok(event) => self.apply(event),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "toast: subscriber lagged");
                }
                Err(_) => break,
            }
        }
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/toast_tests.rs"]
mod tests;
