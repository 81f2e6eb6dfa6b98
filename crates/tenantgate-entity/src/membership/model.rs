//! Membership entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::OrgRole;

/// Links one user to one organization with a role. A user holds at most
/// one membership per organization.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Membership {
    /// Numeric primary key.
    pub membership_id: i64,
    /// Member user.
    pub user_id: i64,
    /// Organization.
    pub org_id: i64,
    /// Role within the organization.
    pub role: OrgRole,
}

/// A membership joined with its user, as listed to org admins.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrgMember {
    /// User primary key.
    pub user_id: i64,
    /// User external identifier.
    pub user_uuid: Uuid,
    /// User email.
    pub email: String,
    /// Whether the user has completed onboarding.
    pub is_active: bool,
    /// Role within the organization.
    pub role: OrgRole,
}
