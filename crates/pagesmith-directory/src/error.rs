//! Directory gateway error types.
//!
//! Error definitions with transient/permanent classification.

use thiserror::Error;

/// Error that can occur while talking to the external directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    // Connection errors (usually transient)
    /// Failed to reach the directory at all.
    #[error("connection failed: {message}")]
    ConnectionFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Request timed out.
    #[error("request timeout after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// The directory is throttling us.
    #[error("rate limited by the directory")]
    RateLimited {
        /// Seconds to wait before retrying, if the directory said.
        retry_after_secs: Option<u64>,
    },

    // Authentication errors (permanent)
    /// The credential was rejected.
    #[error("authentication failed: invalid or expired credential")]
    AuthenticationFailed,

    /// The credential is valid but not allowed to perform the operation.
    #[error("permission denied for {operation}")]
    PermissionDenied { operation: String },

    // Operation errors
    /// A single member removal failed.
    #[error("failed to remove '{login}' from the organization: {message}")]
    RemovalFailed {
        login: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A member or team listing failed.
    #[error("failed to list {scope}: {message}")]
    ListingFailed {
        scope: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The requested team does not exist in the organization.
    #[error("team '{team}' not found in organization '{organization}'")]
    TeamNotFound { organization: String, team: String },

    /// Internal error.
    #[error("internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl DirectoryError {
    /// Check if this error is transient and the call may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DirectoryError::ConnectionFailed { .. }
                | DirectoryError::Timeout { .. }
                | DirectoryError::RateLimited { .. }
        )
    }

    /// Check if this error is permanent and retry won't help.
    pub fn is_permanent(&self) -> bool {
        !self.is_transient()
    }

    /// Get an error code for classification.
    pub fn error_code(&self) -> &'static str {
        match self {
            DirectoryError::ConnectionFailed { .. } => "CONNECTION_FAILED",
            DirectoryError::Timeout { .. } => "TIMEOUT",
            DirectoryError::RateLimited { .. } => "RATE_LIMITED",
            DirectoryError::AuthenticationFailed => "AUTH_FAILED",
            DirectoryError::PermissionDenied { .. } => "PERMISSION_DENIED",
            DirectoryError::RemovalFailed { .. } => "REMOVAL_FAILED",
            DirectoryError::ListingFailed { .. } => "LISTING_FAILED",
            DirectoryError::TeamNotFound { .. } => "TEAM_NOT_FOUND",
            DirectoryError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    // Convenience constructors

    /// Create a connection failed error.
    pub fn connection_failed(message: impl Into<String>) -> Self {
        DirectoryError::ConnectionFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Create a removal failed error.
    pub fn removal_failed(login: impl Into<String>, message: impl Into<String>) -> Self {
        DirectoryError::RemovalFailed {
            login: login.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a removal failed error with source.
    pub fn removal_failed_with_source(
        login: impl Into<String>,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        DirectoryError::RemovalFailed {
            login: login.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a listing failed error.
    pub fn listing_failed(scope: impl Into<String>, message: impl Into<String>) -> Self {
        DirectoryError::ListingFailed {
            scope: scope.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a team not found error.
    pub fn team_not_found(organization: impl Into<String>, team: impl Into<String>) -> Self {
        DirectoryError::TeamNotFound {
            organization: organization.into(),
            team: team.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        DirectoryError::Internal {
            message: message.into(),
            source: None,
        }
    }
}

/// Result type for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_errors() {
        let transient = vec![
            DirectoryError::connection_failed("test"),
            DirectoryError::Timeout { timeout_secs: 30 },
            DirectoryError::RateLimited {
                retry_after_secs: Some(60),
            },
        ];

        for err in transient {
            assert!(
                err.is_transient(),
                "expected {} to be transient",
                err.error_code()
            );
        }
    }

    #[test]
    fn test_permanent_errors() {
        let permanent = vec![
            DirectoryError::AuthenticationFailed,
            DirectoryError::removal_failed("octocat", "boom"),
            DirectoryError::listing_failed("organization members", "boom"),
            DirectoryError::team_not_found("acme", "publishers"),
        ];

        for err in permanent {
            assert!(
                err.is_permanent(),
                "expected {} to be permanent",
                err.error_code()
            );
        }
    }

    #[test]
    fn test_error_display() {
        let err = DirectoryError::removal_failed("octocat", "403 Forbidden");
        assert_eq!(
            err.to_string(),
            "failed to remove 'octocat' from the organization: 403 Forbidden"
        );

        let err = DirectoryError::team_not_found("acme", "publishers");
        assert_eq!(
            err.to_string(),
            "team 'publishers' not found in organization 'acme'"
        );
    }

    #[test]
    fn test_error_with_source() {
        let source = std::io::Error::other("connection reset");
        let err = DirectoryError::removal_failed_with_source("octocat", "transport error", source);

        assert_eq!(err.error_code(), "REMOVAL_FAILED");
        if let DirectoryError::RemovalFailed { source, .. } = &err {
            assert!(source.is_some());
        } else {
            panic!("expected RemovalFailed variant");
        }
    }
}
