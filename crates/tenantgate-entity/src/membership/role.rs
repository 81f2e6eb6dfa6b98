//! Organization role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The role a user holds inside one organization.
///
/// `Admin` can manage the organization's users and metadata; `User` is a
/// plain member. Super-admin is a user flag, not an org role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "org_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum OrgRole {
    /// Organization administrator.
    Admin,
    /// Regular member.
    User,
}

impl OrgRole {
    /// Check if this role is an org admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Return the role as its wire/storage string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::User => "USER",
        }
    }
}

impl fmt::Display for OrgRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OrgRole {
    type Err = tenantgate_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ADMIN" => Ok(Self::Admin),
            "USER" => Ok(Self::User),
            _ => Err(tenantgate_core::AppError::validation(format!(
                "Invalid org role: '{s}'. Expected one of: ADMIN, USER"
            ))),
        }
    }
}
