//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Failure raised by a pluggable exercise evaluator.
///
/// The runner catches this and renders the message inline; it never
/// propagates past the exercise component.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct EvaluationError {
    message: String,
}

impl EvaluationError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Failure writing to the system clipboard (denied or unavailable).
///
/// Caught by the copy affordance and logged; never shown to the user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("clipboard write failed: {0}")]
pub struct ClipboardError(pub String);

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
