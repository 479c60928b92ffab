//! Directory gateway contract.

use async_trait::async_trait;

use crate::error::DirectoryResult;
use crate::types::{MemberRole, OrgMember};

/// Gateway to the external organization directory.
///
/// Implementations wrap a live directory API (listing members and team
/// rosters, removing a member). Listings are complete: pagination against
/// the remote API is the implementation's concern, callers always see the
/// full collection.
#[async_trait]
pub trait DirectoryGateway: Send + Sync {
    /// List the organization's members, optionally filtered by role.
    ///
    /// # Arguments
    /// * `token` - Credential of the auditor performing the call.
    /// * `organization` - The organization to list.
    /// * `role` - Role filter (`All` returns every member).
    async fn organization_members(
        &self,
        token: &str,
        organization: &str,
        role: MemberRole,
    ) -> DirectoryResult<Vec<OrgMember>>;

    /// List the members of one team inside the organization.
    ///
    /// Fails with [`DirectoryError::TeamNotFound`] if the team does not
    /// exist; an existing team with no members returns an empty list.
    ///
    /// [`DirectoryError::TeamNotFound`]: crate::error::DirectoryError::TeamNotFound
    async fn team_members(
        &self,
        token: &str,
        organization: &str,
        team: &str,
    ) -> DirectoryResult<Vec<OrgMember>>;

    /// Remove a member from the organization.
    ///
    /// Idempotent: removing a login that is not currently a member succeeds.
    async fn remove_member(
        &self,
        token: &str,
        organization: &str,
        login: &str,
    ) -> DirectoryResult<()>;
}
