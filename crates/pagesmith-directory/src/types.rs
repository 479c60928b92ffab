//! Transient values returned by the directory gateway.
//!
//! None of these are persisted; they exist only for the duration of a
//! reconciliation pass.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A member of the external organization, as the directory reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgMember {
    /// The member's login in the external directory.
    pub login: String,
    /// Organization-level permissions, when the listing includes them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<MemberPermissions>,
}

impl OrgMember {
    /// Create a plain member with no permission information.
    #[must_use]
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            permissions: None,
        }
    }

    /// Create a member that holds organization admin rights.
    #[must_use]
    pub fn admin(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            permissions: Some(MemberPermissions { admin: true }),
        }
    }

    /// Whether the directory reported this member as an organization admin.
    pub fn is_admin(&self) -> bool {
        self.permissions.is_some_and(|p| p.admin)
    }

    /// The login folded to lower case, for set comparisons.
    pub fn login_lower(&self) -> String {
        self.login.to_lowercase()
    }
}

/// Organization-level permissions of a member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberPermissions {
    /// Whether the member administers the organization.
    pub admin: bool,
}

/// Role filter for organization member listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    /// All members regardless of role.
    #[default]
    All,
    /// Organization admins only.
    Admin,
    /// Non-admin members only.
    Member,
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberRole::All => write!(f, "all"),
            MemberRole::Admin => write!(f, "admin"),
            MemberRole::Member => write!(f, "member"),
        }
    }
}

/// A named team's member collection inside the organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRoster {
    /// The team's slug in the external directory.
    pub team: String,
    /// Members currently on the team.
    pub members: Vec<OrgMember>,
}

impl TeamRoster {
    /// Create a roster for a team.
    #[must_use]
    pub fn new(team: impl Into<String>, members: Vec<OrgMember>) -> Self {
        Self {
            team: team.into(),
            members,
        }
    }

    /// Member logins folded to lower case, for set comparisons.
    pub fn logins_lower(&self) -> HashSet<String> {
        self.members.iter().map(OrgMember::login_lower).collect()
    }
}
