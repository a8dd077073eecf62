//! User roles.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Role attached to a user identity.
///
/// Plain users browse listings and request viewings. Agents additionally own
/// listings and sales-pipeline records. Admins bypass ownership checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Default role for registered users.
    #[default]
    User,
    /// Listing agent: may create listings and manage pipeline clients.
    Agent,
    /// Administrator: ownership checks do not apply.
    Admin,
}

impl Role {
    /// Whether this role may manage listings, appointments and clients.
    #[must_use]
    pub const fn is_agent_or_admin(self) -> bool {
        matches!(self, Self::Agent | Self::Admin)
    }

    /// Whether this role bypasses per-resource ownership checks.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Canonical lowercase name, as stored and as carried in credentials.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Agent => "agent",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "agent" => Ok(Self::Agent),
            "admin" => Ok(Self::Admin),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

/// Error returned when parsing an unrecognized role name.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);
