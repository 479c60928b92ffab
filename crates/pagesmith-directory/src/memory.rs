//! In-memory directory for testing.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{DirectoryError, DirectoryResult};
use crate::traits::DirectoryGateway;
use crate::types::{MemberRole, OrgMember};

#[derive(Debug, Default)]
struct OrgState {
    members: Vec<OrgMember>,
    teams: HashMap<String, Vec<OrgMember>>,
}

#[derive(Debug, Default)]
struct DirectoryState {
    orgs: HashMap<String, OrgState>,
    /// Lower-cased logins whose removal fails with an injected error.
    failing_removals: HashSet<String>,
    /// Logins passed to `remove_member`, in call order.
    removals: Vec<String>,
}

/// In-memory [`DirectoryGateway`] for testing.
///
/// Removal actually mutates the organization and team rosters, so
/// re-running an operation against the same directory observes the
/// post-removal state.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    state: Arc<RwLock<DirectoryState>>,
}

impl InMemoryDirectory {
    /// Create an empty in-memory directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member to an organization.
    pub async fn add_member(&self, organization: &str, member: OrgMember) {
        let mut state = self.state.write().await;
        state
            .orgs
            .entry(organization.to_string())
            .or_default()
            .members
            .push(member);
    }

    /// Create or replace a team roster inside an organization.
    pub async fn set_team(&self, organization: &str, team: &str, members: Vec<OrgMember>) {
        let mut state = self.state.write().await;
        state
            .orgs
            .entry(organization.to_string())
            .or_default()
            .teams
            .insert(team.to_string(), members);
    }

    /// Make removal of the given login fail with an injected error.
    pub async fn fail_removal_of(&self, login: &str) {
        let mut state = self.state.write().await;
        state.failing_removals.insert(login.to_lowercase());
    }

    /// Logins passed to `remove_member` so far, in call order.
    pub async fn removals(&self) -> Vec<String> {
        self.state.read().await.removals.clone()
    }

    /// Clear all organizations, rosters and call records.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        *state = DirectoryState::default();
    }
}

#[async_trait]
impl DirectoryGateway for InMemoryDirectory {
    async fn organization_members(
        &self,
        _token: &str,
        organization: &str,
        role: MemberRole,
    ) -> DirectoryResult<Vec<OrgMember>> {
        let state = self.state.read().await;
        let members = state
            .orgs
            .get(organization)
            .map(|org| org.members.clone())
            .unwrap_or_default();

        Ok(members
            .into_iter()
            .filter(|m| match role {
                MemberRole::All => true,
                MemberRole::Admin => m.is_admin(),
                MemberRole::Member => !m.is_admin(),
            })
            .collect())
    }

    async fn team_members(
        &self,
        _token: &str,
        organization: &str,
        team: &str,
    ) -> DirectoryResult<Vec<OrgMember>> {
        let state = self.state.read().await;
        state
            .orgs
            .get(organization)
            .and_then(|org| org.teams.get(team))
            .cloned()
            .ok_or_else(|| DirectoryError::team_not_found(organization, team))
    }

    async fn remove_member(
        &self,
        _token: &str,
        organization: &str,
        login: &str,
    ) -> DirectoryResult<()> {
        let lower = login.to_lowercase();
        let mut state = self.state.write().await;

        if state.failing_removals.contains(&lower) {
            return Err(DirectoryError::removal_failed(
                login,
                "injected removal failure",
            ));
        }

        state.removals.push(login.to_string());

        if let Some(org) = state.orgs.get_mut(organization) {
            org.members.retain(|m| m.login_lower() != lower);
            for roster in org.teams.values_mut() {
                roster.retain(|m| m.login_lower() != lower);
            }
        }

        Ok(())
    }
}
