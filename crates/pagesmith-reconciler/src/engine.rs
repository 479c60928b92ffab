//! Membership reconciliation engine.
//!
//! Compares the internal roster with the live organization's membership
//! and applies corrective mutations. Four independent operations, all
//! idempotent: each run recomputes from current state, so re-running
//! against unchanged external data performs no additional work.
//!
//! The roster is the source of truth for who should have access; the
//! organization's membership is a correctable projection of it. Every
//! operation reads both sources within the same run before mutating
//! either.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use futures::future::{join_all, try_join_all};
use serde::Serialize;
use tracing::{error, info, warn};

use pagesmith_directory::{DirectoryGateway, MemberRole, OrgMember};
use pagesmith_roster::{ActivityUpdate, RosterStore};

use crate::audit::{AuditEvent, AuditSink, RemovalReason};
use crate::config::ReconcilerConfig;
use crate::error::{ReconcilerError, Result};

// ============================================================================
// Outcomes
// ============================================================================

/// Result of a team-pruning pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PruneOutcome {
    /// How many teams were audited.
    pub teams_audited: usize,
    /// Logins removed from the organization.
    pub removed: Vec<String>,
}

/// Result of an activity-refresh pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ActivityOutcome {
    /// Usernames whose entries were marked active.
    pub activated: Vec<String>,
    /// Usernames whose entries were marked inactive.
    pub deactivated: Vec<String>,
}

impl ActivityOutcome {
    /// Total number of transitioned entries.
    pub fn transitions(&self) -> usize {
        self.activated.len() + self.deactivated.len()
    }
}

/// Result of a removal sweep (stale or unknown members).
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepOutcome {
    /// Logins removed from the organization.
    pub removed: Vec<String>,
    /// Logins whose removal failed; each has a failure audit event.
    pub failed: Vec<String>,
}

/// Aggregate of one full audit run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AuditSummary {
    /// Activity-refresh outcome.
    pub activity: ActivityOutcome,
    /// Stale-member sweep outcome.
    pub stale: SweepOutcome,
    /// Unknown-member sweep outcome.
    pub unknown: SweepOutcome,
    /// Team-pruning outcome.
    pub pruned: PruneOutcome,
}

// ============================================================================
// Engine
// ============================================================================

/// Reconciles the internal roster against the external organization.
pub struct ReconciliationEngine {
    config: ReconcilerConfig,
    directory: Arc<dyn DirectoryGateway>,
    roster: Arc<dyn RosterStore>,
    audit: Arc<dyn AuditSink>,
}

impl ReconciliationEngine {
    /// Create an engine, validating the configuration.
    pub fn new(
        config: ReconcilerConfig,
        directory: Arc<dyn DirectoryGateway>,
        roster: Arc<dyn RosterStore>,
        audit: Arc<dyn AuditSink>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            directory,
            roster,
            audit,
        })
    }

    /// The configuration the engine was constructed with.
    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Resolve the auditor's directory credential from the roster.
    ///
    /// A missing entry or missing credential aborts the calling operation
    /// before any directory call is made.
    async fn auditor_token(&self) -> Result<String> {
        let username = &self.config.auditor_username;
        let entry = self
            .roster
            .find_by_username(username)
            .await?
            .ok_or_else(|| ReconcilerError::AuditorNotFound {
                username: username.clone(),
            })?;
        entry
            .directory_token
            .ok_or_else(|| ReconcilerError::AuditorTokenMissing {
                username: username.clone(),
            })
    }

    /// Remove members of the audited teams who are neither on the
    /// reference team nor organization admins.
    ///
    /// If the reference team's roster comes back empty the pass is a
    /// deliberate no-op: a degraded listing that returns empty instead of
    /// erroring must not trigger a mass removal.
    ///
    /// Any single removal failure fails the whole pass; the stale and
    /// unknown-member sweeps report per member instead.
    pub async fn prune_team_members(&self) -> Result<PruneOutcome> {
        let token = self.auditor_token().await?;
        let org = &self.config.organization;

        let reference: HashSet<String> = self
            .directory
            .team_members(&token, org, &self.config.reference_team)
            .await?
            .iter()
            .map(OrgMember::login_lower)
            .collect();

        if reference.is_empty() {
            warn!(
                organization = %org,
                team = %self.config.reference_team,
                "reference team roster is empty, skipping team pruning"
            );
            return Ok(PruneOutcome::default());
        }

        let admins: HashSet<String> = self
            .directory
            .organization_members(&token, org, MemberRole::Admin)
            .await?
            .iter()
            .map(OrgMember::login_lower)
            .collect();

        let mut seen: HashSet<String> = HashSet::new();
        let mut to_remove: Vec<String> = Vec::new();
        for team in &self.config.audited_teams {
            let members = self.directory.team_members(&token, org, team).await?;
            for member in members {
                let lower = member.login_lower();
                if reference.contains(&lower) || admins.contains(&lower) {
                    continue;
                }
                // A login on several audited teams is removed once.
                if seen.insert(lower) {
                    info!(
                        organization = %org,
                        team = %team,
                        login = %member.login,
                        "removing team member outside the reference team"
                    );
                    to_remove.push(member.login);
                }
            }
        }

        try_join_all(
            to_remove
                .iter()
                .map(|login| self.directory.remove_member(&token, org, login)),
        )
        .await?;

        Ok(PruneOutcome {
            teams_audited: self.config.audited_teams.len(),
            removed: to_remove,
        })
    }

    /// Synchronize each roster entry's active flag with live organization
    /// membership, emitting one audit event per transitioned entry.
    pub async fn refresh_activity(&self) -> Result<ActivityOutcome> {
        let token = self.auditor_token().await?;
        let org = &self.config.organization;

        let members = self
            .directory
            .organization_members(&token, org, MemberRole::All)
            .await?;
        let logins: HashSet<String> = members.iter().map(OrgMember::login_lower).collect();

        // The two updates cannot overlap: each only transitions rows whose
        // current flag differs from its target.
        let activated = self
            .roster
            .update_active_flag(ActivityUpdate::activate_in(logins.clone()))
            .await?;
        let deactivated = self
            .roster
            .update_active_flag(ActivityUpdate::deactivate_not_in(logins))
            .await?;

        for entry in &activated {
            self.audit
                .record(AuditEvent::activity_changed(&entry.username, true))
                .await;
        }
        for entry in &deactivated {
            self.audit
                .record(AuditEvent::activity_changed(&entry.username, false))
                .await;
        }

        info!(
            organization = %org,
            activated = activated.len(),
            deactivated = deactivated.len(),
            "refreshed roster activity flags"
        );

        Ok(ActivityOutcome {
            activated: activated.into_iter().map(|e| e.username).collect(),
            deactivated: deactivated.into_iter().map(|e| e.username).collect(),
        })
    }

    /// Remove organization access for active roster entries with no
    /// sign-in or push inside the configured window.
    ///
    /// Individual removal failures are reported through the audit sink
    /// and do not abort the sweep.
    pub async fn revoke_stale_members(&self) -> Result<SweepOutcome> {
        let token = self.auditor_token().await?;
        let cutoff = self.config.staleness_cutoff(Utc::now());

        let stale = self.roster.list_stale(cutoff).await?;
        info!(
            organization = %self.config.organization,
            cutoff = %cutoff,
            count = stale.len(),
            "revoking access for stale roster entries"
        );

        let logins: Vec<String> = stale.into_iter().map(|e| e.username).collect();
        Ok(self.sweep(&token, logins, RemovalReason::StaleAccess).await)
    }

    /// Remove organization members that have no roster entry at all.
    ///
    /// Individual removal failures are reported through the audit sink
    /// and do not abort the sweep.
    pub async fn remove_unknown_members(&self) -> Result<SweepOutcome> {
        let token = self.auditor_token().await?;
        let org = &self.config.organization;

        let known: HashSet<String> = self
            .roster
            .list_usernames()
            .await?
            .into_iter()
            .map(|u| u.to_lowercase())
            .collect();
        let members = self
            .directory
            .organization_members(&token, org, MemberRole::All)
            .await?;

        let unknown: Vec<String> = members
            .into_iter()
            .filter(|m| !known.contains(&m.login_lower()))
            .map(|m| m.login)
            .collect();
        info!(
            organization = %org,
            count = unknown.len(),
            "removing organization members with no roster entry"
        );

        Ok(self.sweep(&token, unknown, RemovalReason::UnknownMember).await)
    }

    /// Run every operation once: activity refresh, stale sweep, unknown
    /// sweep, then team pruning. Stops at the first operation-level
    /// failure.
    pub async fn run_full_audit(&self) -> Result<AuditSummary> {
        let activity = self.refresh_activity().await?;
        let stale = self.revoke_stale_members().await?;
        let unknown = self.remove_unknown_members().await?;
        let pruned = self.prune_team_members().await?;
        Ok(AuditSummary {
            activity,
            stale,
            unknown,
            pruned,
        })
    }

    /// Issue removals concurrently, catching each failure locally. The
    /// sweep resolves once every attempt has settled.
    async fn sweep(&self, token: &str, logins: Vec<String>, reason: RemovalReason) -> SweepOutcome {
        let org = &self.config.organization;

        let attempts = logins.into_iter().map(|login| async move {
            match self.directory.remove_member(token, org, &login).await {
                Ok(()) => {
                    info!(organization = %org, login = %login, reason = %reason, "removed organization member");
                    self.audit
                        .record(AuditEvent::member_removed(login.as_str(), reason))
                        .await;
                    (login, true)
                }
                Err(err) => {
                    error!(
                        organization = %org,
                        login = %login,
                        reason = %reason,
                        error = %err,
                        "failed to remove organization member"
                    );
                    self.audit
                        .record(AuditEvent::removal_failed(login.as_str(), reason, &err))
                        .await;
                    (login, false)
                }
            }
        });

        let mut outcome = SweepOutcome::default();
        for (login, removed) in join_all(attempts).await {
            if removed {
                outcome.removed.push(login);
            } else {
                outcome.failed.push(login);
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::InMemoryAuditSink;
    use pagesmith_directory::InMemoryDirectory;
    use pagesmith_roster::{InMemoryRosterStore, RosterEntry};

    fn engine_with(
        config: ReconcilerConfig,
        directory: Arc<InMemoryDirectory>,
        roster: Arc<InMemoryRosterStore>,
    ) -> ReconciliationEngine {
        ReconciliationEngine::new(config, directory, roster, Arc::new(InMemoryAuditSink::new()))
            .unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = ReconciliationEngine::new(
            ReconcilerConfig::new("", "auditor"),
            Arc::new(InMemoryDirectory::new()),
            Arc::new(InMemoryRosterStore::new()),
            Arc::new(InMemoryAuditSink::new()),
        );
        assert!(matches!(
            result.err(),
            Some(ReconcilerError::InvalidConfiguration { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_auditor_aborts_before_directory_calls() {
        let directory = Arc::new(InMemoryDirectory::new());
        let engine = engine_with(
            ReconcilerConfig::new("acme", "auditor"),
            Arc::clone(&directory),
            Arc::new(InMemoryRosterStore::new()),
        );

        let err = engine.refresh_activity().await.unwrap_err();
        assert!(matches!(err, ReconcilerError::AuditorNotFound { .. }));
        assert!(err.is_precondition());
        assert!(directory.removals().await.is_empty());
    }

    #[tokio::test]
    async fn test_auditor_without_credential_aborts() {
        let roster = Arc::new(InMemoryRosterStore::new());
        roster.insert(RosterEntry::new("auditor")).await.unwrap();

        let engine = engine_with(
            ReconcilerConfig::new("acme", "auditor"),
            Arc::new(InMemoryDirectory::new()),
            roster,
        );

        let err = engine.remove_unknown_members().await.unwrap_err();
        assert!(matches!(err, ReconcilerError::AuditorTokenMissing { .. }));
    }

    #[tokio::test]
    async fn test_empty_reference_team_skips_pruning() {
        let directory = Arc::new(InMemoryDirectory::new());
        directory.set_team("acme", "staff", Vec::new()).await;
        directory
            .set_team("acme", "publishers", vec![OrgMember::new("intruder")])
            .await;

        let roster = Arc::new(InMemoryRosterStore::new());
        roster
            .insert(RosterEntry::new("auditor").with_directory_token("tok"))
            .await
            .unwrap();

        let config = ReconcilerConfig::new("acme", "auditor")
            .with_audited_teams(vec!["publishers".to_string()]);
        let engine = engine_with(config, Arc::clone(&directory), roster);

        let outcome = engine.prune_team_members().await.unwrap();
        assert!(outcome.removed.is_empty());
        assert_eq!(outcome.teams_audited, 0);
        assert!(directory.removals().await.is_empty());
    }
}
