//! Core domain models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account role
///
/// Closed set of authorization levels. Each protected action declares a
/// minimum required role; `satisfies` answers whether an account role is
/// a member of the set of roles accepted for that requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Moderator,
    Admin,
}

impl Role {
    /// Whether this role meets a required minimum role.
    ///
    /// Deliberately an explicit membership check rather than an ordinal
    /// comparison so the accepted set per requirement stays visible.
    pub fn satisfies(self, required: Role) -> bool {
        match required {
            Role::User => true,
            Role::Moderator => matches!(self, Role::Moderator | Role::Admin),
            Role::Admin => matches!(self, Role::Admin),
        }
    }

    /// Database representation (text column)
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Moderator => "moderator",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "moderator" => Ok(Role::Moderator),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}
