//! Reconciler configuration.
//!
//! Loaded once per process run and handed to the engine at construction;
//! operations never re-derive defaults at call time.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ReconcilerError, Result};

/// Configuration for a [`ReconciliationEngine`].
///
/// [`ReconciliationEngine`]: crate::engine::ReconciliationEngine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    /// The external organization whose membership is audited.
    pub organization: String,

    /// Roster username of the auditor account whose directory credential
    /// the engine calls with.
    pub auditor_username: String,

    /// Team whose members are exempt from team pruning.
    #[serde(default = "default_reference_team")]
    pub reference_team: String,

    /// Teams audited by the pruning pass.
    #[serde(default)]
    pub audited_teams: Vec<String>,

    /// Days without a sign-in or push before an active entry counts as
    /// stale.
    #[serde(default = "default_max_days_since_login")]
    pub max_days_since_login: u32,
}

fn default_reference_team() -> String {
    "staff".to_string()
}

fn default_max_days_since_login() -> u32 {
    90
}

impl ReconcilerConfig {
    /// Create a configuration with default pruning and staleness settings.
    #[must_use]
    pub fn new(organization: impl Into<String>, auditor_username: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            auditor_username: auditor_username.into(),
            reference_team: default_reference_team(),
            audited_teams: Vec::new(),
            max_days_since_login: default_max_days_since_login(),
        }
    }

    /// Set the reference team.
    #[must_use]
    pub fn with_reference_team(mut self, team: impl Into<String>) -> Self {
        self.reference_team = team.into();
        self
    }

    /// Set the audited teams.
    #[must_use]
    pub fn with_audited_teams(mut self, teams: Vec<String>) -> Self {
        self.audited_teams = teams;
        self
    }

    /// Set the staleness window in days.
    #[must_use]
    pub fn with_max_days_since_login(mut self, days: u32) -> Self {
        self.max_days_since_login = days;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.organization.trim().is_empty() {
            return Err(ReconcilerError::InvalidConfiguration {
                message: "organization must not be empty".to_string(),
            });
        }
        if self.auditor_username.trim().is_empty() {
            return Err(ReconcilerError::InvalidConfiguration {
                message: "auditor_username must not be empty".to_string(),
            });
        }
        if self.reference_team.trim().is_empty() {
            return Err(ReconcilerError::InvalidConfiguration {
                message: "reference_team must not be empty".to_string(),
            });
        }
        if self.max_days_since_login == 0 {
            return Err(ReconcilerError::InvalidConfiguration {
                message: "max_days_since_login must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// The staleness cutoff relative to `now`.
    pub fn staleness_cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(i64::from(self.max_days_since_login))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReconcilerConfig::new("acme", "auditor");
        assert_eq!(config.reference_team, "staff");
        assert!(config.audited_teams.is_empty());
        assert_eq!(config.max_days_since_login, 90);
    }

    #[test]
    fn test_serde_defaults() {
        let config: ReconcilerConfig =
            serde_json::from_str(r#"{"organization":"acme","auditor_username":"auditor"}"#)
                .unwrap();
        assert_eq!(config.reference_team, "staff");
        assert_eq!(config.max_days_since_login, 90);
    }

    #[test]
    fn test_validate_rejects_empty_organization() {
        let config = ReconcilerConfig::new("", "auditor");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_window() {
        let config = ReconcilerConfig::new("acme", "auditor").with_max_days_since_login(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_staleness_cutoff() {
        let config = ReconcilerConfig::new("acme", "auditor").with_max_days_since_login(30);
        let now = Utc::now();
        assert_eq!(config.staleness_cutoff(now), now - Duration::days(30));
    }
}
