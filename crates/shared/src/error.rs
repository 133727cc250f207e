use thiserror::Error;

const DEFAULT_MESSAGE: &str = "Server error";

/// The only failure kind surfaced by the people directory.
///
/// Transport details (status codes, bodies) are dropped at the client boundary; only the
/// message text survives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DirectoryError {
    message: String,
}

impl DirectoryError {
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            return Self {
                message: DEFAULT_MESSAGE.to_string(),
            };
        }
        Self { message }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns a copy with `prefix` prepended, e.g. `"Failed to load people: "`.
    pub fn with_prefix(&self, prefix: &str) -> Self {
        Self {
            message: format!("{prefix}{}", self.message),
        }
    }
}
