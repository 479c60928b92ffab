//! Roster entry model.
//!
//! One entry per provisioned user. The roster is the authoritative record
//! of who should have access; the external organization's membership is a
//! correctable projection of it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A provisioned user in the internal roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Unique identifier for the entry.
    pub id: Uuid,

    /// The user's login, stored verbatim. Comparisons against external
    /// logins fold case; see [`RosterEntry::matches_login`].
    pub username: String,

    /// Whether the user currently holds organization access.
    pub is_active: bool,

    /// When the user last signed in to the platform (None = never).
    pub signed_in_at: Option<DateTime<Utc>>,

    /// When the user last pushed content (None = never).
    pub pushed_at: Option<DateTime<Utc>>,

    /// When the entry was created.
    pub created_at: DateTime<Utc>,

    /// When the entry was last updated.
    pub updated_at: DateTime<Utc>,

    /// Credential used to call the external directory on the user's
    /// behalf. Only auditor accounts carry one.
    pub directory_token: Option<String>,
}

impl RosterEntry {
    /// Create an active entry with the current timestamps and no
    /// activity signals.
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            is_active: true,
            signed_in_at: None,
            pushed_at: None,
            created_at: now,
            updated_at: now,
            directory_token: None,
        }
    }

    /// Set the active flag.
    #[must_use]
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Set the last sign-in timestamp.
    #[must_use]
    pub fn with_signed_in_at(mut self, at: DateTime<Utc>) -> Self {
        self.signed_in_at = Some(at);
        self
    }

    /// Set the last push timestamp.
    #[must_use]
    pub fn with_pushed_at(mut self, at: DateTime<Utc>) -> Self {
        self.pushed_at = Some(at);
        self
    }

    /// Set the creation timestamp.
    #[must_use]
    pub fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }

    /// Set the directory credential.
    #[must_use]
    pub fn with_directory_token(mut self, token: impl Into<String>) -> Self {
        self.directory_token = Some(token.into());
        self
    }

    /// Case-insensitive match against an external login.
    pub fn matches_login(&self, login: &str) -> bool {
        self.username.to_lowercase() == login.to_lowercase()
    }

    /// The username folded to lower case, for set comparisons.
    pub fn username_lower(&self) -> String {
        self.username.to_lowercase()
    }

    /// Whether the entry shows no activity signal since `cutoff`.
    ///
    /// An entry created after the cutoff is never stale: fresh accounts
    /// naturally have empty activity fields. Past that guard, a missing
    /// sign-in or push timestamp counts as "never", which is stale.
    pub fn is_stale(&self, cutoff: DateTime<Utc>) -> bool {
        if self.created_at >= cutoff {
            return false;
        }
        let before = |ts: Option<DateTime<Utc>>| ts.is_none_or(|t| t < cutoff);
        before(self.signed_in_at) && before(self.pushed_at)
    }
}
