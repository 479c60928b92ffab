//! Reconciler error types.

use thiserror::Error;

use pagesmith_directory::DirectoryError;
use pagesmith_roster::RosterError;

/// Error that can occur during a reconciliation operation.
#[derive(Debug, Error)]
pub enum ReconcilerError {
    // Precondition failures: abort before any external call is made.
    /// The configured auditor has no roster entry.
    #[error("auditor '{username}' has no roster entry")]
    AuditorNotFound { username: String },

    /// The auditor's roster entry carries no directory credential.
    #[error("auditor '{username}' has no directory credential")]
    AuditorTokenMissing { username: String },

    /// The engine configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// A directory gateway call failed.
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// A roster store call failed.
    #[error(transparent)]
    Roster(#[from] RosterError),
}

impl ReconcilerError {
    /// Whether this failure happened before any external side effect.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            ReconcilerError::AuditorNotFound { .. }
                | ReconcilerError::AuditorTokenMissing { .. }
                | ReconcilerError::InvalidConfiguration { .. }
        )
    }
}

/// Result type for reconciler operations.
pub type Result<T> = std::result::Result<T, ReconcilerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_classification() {
        assert!(ReconcilerError::AuditorNotFound {
            username: "auditor".to_string(),
        }
        .is_precondition());
        assert!(ReconcilerError::AuditorTokenMissing {
            username: "auditor".to_string(),
        }
        .is_precondition());
        assert!(!ReconcilerError::Directory(DirectoryError::AuthenticationFailed)
            .is_precondition());
    }

    #[test]
    fn test_display() {
        let err = ReconcilerError::AuditorNotFound {
            username: "auditor".to_string(),
        };
        assert_eq!(err.to_string(), "auditor 'auditor' has no roster entry");
    }

    #[test]
    fn test_directory_error_passes_through() {
        let err: ReconcilerError = DirectoryError::removal_failed("octocat", "boom").into();
        assert_eq!(
            err.to_string(),
            "failed to remove 'octocat' from the organization: boom"
        );
    }
}
