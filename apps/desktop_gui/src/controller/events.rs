//! Backend-to-UI events and error modeling for the desktop GUI controller.

use client_core::ToastEvent;
use shared::domain::{Person, PersonId};

use crate::backend_bridge::commands::LoadPurpose;

#[derive(Debug, Clone)]
pub enum UiEvent {
    Info(String),
    Error(UiError),
    Toast(ToastEvent),
    PeopleLoaded(Vec<Person>),
    PeopleLoadFailed(String),
    PersonLoaded {
        purpose: LoadPurpose,
        person: Person,
    },
    PersonLoadFailed {
        purpose: LoadPurpose,
        id: PersonId,
        message: String,
    },
    PersonSaved(Person),
    SaveFailed(String),
    PersonDeleted(PersonId),
    DeleteFailed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Server,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    CommandQueue,
}

/// Failure shown in the status banner. Request failures go through toasts instead.
#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("malformed")
            || message_lower.contains("unsupported")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timed out")
            || message_lower.contains("timeout")
            || message_lower.contains("connection")
            || message_lower.contains("dns")
            || message_lower.contains("disconnected")
            || message_lower.contains("queue is full")
        {
            UiErrorCategory::Transport
        } else if message_lower.contains("server error") || message_lower.contains("status") {
            UiErrorCategory::Server
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn headline(&self) -> &'static str {
        match (self.context, self.category) {
            (UiErrorContext::BackendStartup, _) => "Backend worker failed to start",
            (_, UiErrorCategory::Transport) => "Directory service unreachable",
            (_, UiErrorCategory::Server) => "Directory service returned an error",
            (_, UiErrorCategory::Validation) => "Invalid configuration or input",
            (_, UiErrorCategory::Unknown) => "Unexpected error",
        }
    }

    /// Startup failures leave no backend to retry against.
    pub fn is_fatal(&self) -> bool {
        self.context == UiErrorContext::BackendStartup
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
