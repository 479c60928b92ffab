//! Roster store contract and in-memory implementation.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::entry::RosterEntry;
use crate::error::{RosterError, RosterResult};

// ============================================================================
// Bulk Update Descriptor
// ============================================================================

/// Whether an update matches entries inside or outside a login set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetMembership {
    /// Entries whose username is in the set.
    In,
    /// Entries whose username is not in the set.
    NotIn,
}

/// Descriptor for a bulk active-flag update.
///
/// The store only transitions rows whose current flag differs from the
/// target, so an activate-in pass and a deactivate-not-in pass over the
/// same login set can never touch the same row.
#[derive(Debug, Clone)]
pub struct ActivityUpdate {
    /// The value to set the active flag to.
    pub is_active: bool,
    /// Lower-cased logins to match usernames against.
    pub logins: HashSet<String>,
    /// Whether matching entries are inside or outside `logins`.
    pub membership: SetMembership,
}

impl ActivityUpdate {
    /// Activate entries whose username is in `logins`.
    #[must_use]
    pub fn activate_in(logins: HashSet<String>) -> Self {
        Self {
            is_active: true,
            logins,
            membership: SetMembership::In,
        }
    }

    /// Deactivate entries whose username is not in `logins`.
    #[must_use]
    pub fn deactivate_not_in(logins: HashSet<String>) -> Self {
        Self {
            is_active: false,
            logins,
            membership: SetMembership::NotIn,
        }
    }

    /// Whether this update selects the given entry for transition.
    pub fn selects(&self, entry: &RosterEntry) -> bool {
        if entry.is_active == self.is_active {
            return false;
        }
        let in_set = self.logins.contains(&entry.username_lower());
        match self.membership {
            SetMembership::In => in_set,
            SetMembership::NotIn => !in_set,
        }
    }
}

// ============================================================================
// Store Trait
// ============================================================================

/// Contract for the internal authoritative user table.
///
/// Entry creation and deletion belong to the host platform's account
/// flows; the auditor only reads entries and flips activity flags.
#[async_trait::async_trait]
pub trait RosterStore: Send + Sync {
    /// Find an entry by username, folding case.
    async fn find_by_username(&self, username: &str) -> RosterResult<Option<RosterEntry>>;

    /// Apply a bulk active-flag update and return the transitioned rows.
    async fn update_active_flag(&self, update: ActivityUpdate) -> RosterResult<Vec<RosterEntry>>;

    /// List active entries with no activity signal since `cutoff`.
    async fn list_stale(&self, cutoff: DateTime<Utc>) -> RosterResult<Vec<RosterEntry>>;

    /// List every username in the roster, verbatim.
    async fn list_usernames(&self) -> RosterResult<Vec<String>>;
}

// ============================================================================
// In-Memory Store (for testing)
// ============================================================================

/// In-memory roster store for testing.
#[derive(Debug, Default)]
pub struct InMemoryRosterStore {
    entries: Arc<RwLock<HashMap<Uuid, RosterEntry>>>,
}

impl InMemoryRosterStore {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, enforcing case-insensitive username uniqueness.
    pub async fn insert(&self, entry: RosterEntry) -> RosterResult<RosterEntry> {
        let mut entries = self.entries.write().await;
        if entries
            .values()
            .any(|e| e.username_lower() == entry.username_lower())
        {
            return Err(RosterError::DuplicateUsername {
                username: entry.username,
            });
        }
        entries.insert(entry.id, entry.clone());
        Ok(entry)
    }

    /// Number of entries in the store.
    pub async fn count(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Clear all entries.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

#[async_trait::async_trait]
impl RosterStore for InMemoryRosterStore {
    async fn find_by_username(&self, username: &str) -> RosterResult<Option<RosterEntry>> {
        let entries = self.entries.read().await;
        Ok(entries
            .values()
            .find(|e| e.matches_login(username))
            .cloned())
    }

    async fn update_active_flag(&self, update: ActivityUpdate) -> RosterResult<Vec<RosterEntry>> {
        let mut entries = self.entries.write().await;
        let now = Utc::now();

        let mut transitioned: Vec<RosterEntry> = Vec::new();
        for entry in entries.values_mut() {
            if update.selects(entry) {
                entry.is_active = update.is_active;
                entry.updated_at = now;
                transitioned.push(entry.clone());
            }
        }

        transitioned.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(transitioned)
    }

    async fn list_stale(&self, cutoff: DateTime<Utc>) -> RosterResult<Vec<RosterEntry>> {
        let entries = self.entries.read().await;
        let mut stale: Vec<RosterEntry> = entries
            .values()
            .filter(|e| e.is_active && e.is_stale(cutoff))
            .cloned()
            .collect();
        stale.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(stale)
    }

    async fn list_usernames(&self) -> RosterResult<Vec<String>> {
        let entries = self.entries.read().await;
        let mut usernames: Vec<String> =
            entries.values().map(|e| e.username.clone()).collect();
        usernames.sort();
        Ok(usernames)
    }
}
