//! Audit event sink.
//!
//! The engine's only observable output besides its return values. Sinks
//! are fire-and-forget: a sink that cannot deliver handles that itself
//! rather than failing a reconciliation batch.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use pagesmith_directory::DirectoryError;

/// What happened to the subject of an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// A member was removed from the organization.
    MemberRemoved,
    /// A removal was attempted and failed.
    RemovalFailed,
    /// A roster entry's active flag changed.
    ActivityChanged,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MemberRemoved => write!(f, "member_removed"),
            Self::RemovalFailed => write!(f, "removal_failed"),
            Self::ActivityChanged => write!(f, "activity_changed"),
        }
    }
}

/// Why a member was (or was about to be) removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalReason {
    /// No recent sign-in or push activity.
    StaleAccess,
    /// Organization member with no roster entry.
    UnknownMember,
}

impl std::fmt::Display for RemovalReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StaleAccess => write!(f, "stale_access"),
            Self::UnknownMember => write!(f, "unknown_member"),
        }
    }
}

/// A structured audit event emitted by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Unique identifier for the event.
    pub id: Uuid,
    /// What happened.
    pub action: AuditAction,
    /// The login or username the event is about.
    pub subject: String,
    /// Action-specific detail.
    pub detail: serde_json::Value,
    /// When the event occurred.
    pub occurred_at: DateTime<Utc>,
}

impl AuditEvent {
    fn new(action: AuditAction, subject: impl Into<String>, detail: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            action,
            subject: subject.into(),
            detail,
            occurred_at: Utc::now(),
        }
    }

    /// A member was removed from the organization.
    #[must_use]
    pub fn member_removed(login: impl Into<String>, reason: RemovalReason) -> Self {
        Self::new(
            AuditAction::MemberRemoved,
            login,
            serde_json::json!({ "reason": reason.to_string() }),
        )
    }

    /// A removal attempt failed.
    #[must_use]
    pub fn removal_failed(
        login: impl Into<String>,
        reason: RemovalReason,
        error: &DirectoryError,
    ) -> Self {
        Self::new(
            AuditAction::RemovalFailed,
            login,
            serde_json::json!({
                "reason": reason.to_string(),
                "error": error.to_string(),
                "error_code": error.error_code(),
            }),
        )
    }

    /// A roster entry's active flag changed.
    #[must_use]
    pub fn activity_changed(username: impl Into<String>, is_active: bool) -> Self {
        Self::new(
            AuditAction::ActivityChanged,
            username,
            serde_json::json!({ "is_active": is_active }),
        )
    }
}

/// Sink for audit events.
#[async_trait::async_trait]
pub trait AuditSink: Send + Sync {
    /// Record one event. Delivery problems are the sink's to handle.
    async fn record(&self, event: AuditEvent);
}

/// In-memory audit sink for testing.
#[derive(Debug, Default)]
pub struct InMemoryAuditSink {
    events: Arc<RwLock<Vec<AuditEvent>>>,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events, in record order.
    pub async fn events(&self) -> Vec<AuditEvent> {
        self.events.read().await.clone()
    }

    /// Recorded events with the given action.
    pub async fn events_with_action(&self, action: AuditAction) -> Vec<AuditEvent> {
        self.events
            .read()
            .await
            .iter()
            .filter(|e| e.action == action)
            .cloned()
            .collect()
    }

    /// Number of recorded events.
    pub async fn count(&self) -> usize {
        self.events.read().await.len()
    }

    /// Clear all events.
    pub async fn clear(&self) {
        self.events.write().await.clear();
    }
}

#[async_trait::async_trait]
impl AuditSink for InMemoryAuditSink {
    async fn record(&self, event: AuditEvent) {
        self.events.write().await.push(event);
    }
}
