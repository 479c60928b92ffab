//! Roster store error types.

use thiserror::Error;

/// Error that can occur in a roster store backend.
#[derive(Debug, Error)]
pub enum RosterError {
    /// A username clashed with an existing entry (case-insensitive).
    #[error("roster entry '{username}' already exists")]
    DuplicateUsername { username: String },

    /// The backend failed.
    #[error("roster storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl RosterError {
    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        RosterError::Storage {
            message: message.into(),
            source: None,
        }
    }

    /// Create a storage error with source.
    pub fn storage_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        RosterError::Storage {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Result type for roster operations.
pub type RosterResult<T> = Result<T, RosterError>;
