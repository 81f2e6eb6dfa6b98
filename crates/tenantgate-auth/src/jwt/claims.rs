//! Session claims embedded in every access token.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tenantgate_entity::membership::{Membership, OrgRole};
use tenantgate_entity::user::User;

/// One organization membership as carried in a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgClaim {
    /// Organization id.
    pub org_id: i64,
    /// Role held in that organization.
    pub role: OrgRole,
}

impl From<&Membership> for OrgClaim {
    fn from(membership: &Membership) -> Self {
        Self {
            org_id: membership.org_id,
            role: membership.role,
        }
    }
}

/// Claims payload of a session token.
///
/// This is a snapshot taken at login. Membership changes made afterwards are
/// not visible until the holder logs in again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject, the user's external id.
    pub sub: Uuid,
    /// Numeric user id.
    pub uid: i64,
    /// Super-admin flag at issuance.
    pub is_super_admin: bool,
    /// Every membership at issuance.
    pub orgs: Vec<OrgClaim>,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Token id.
    pub jti: Uuid,
}

impl Claims {
    /// Build the claims for `user` issued at `issued_at` and valid for `ttl`.
    pub fn for_user(
        user: &User,
        memberships: &[Membership],
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            sub: user.user_uuid,
            uid: user.user_id,
            is_super_admin: user.is_super_admin,
            orgs: memberships.iter().map(OrgClaim::from).collect(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
            jti: Uuid::new_v4(),
        }
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }

    /// The role held in `org_id`, if any.
    pub fn role_in(&self, org_id: i64) -> Option<OrgRole> {
        self.orgs
            .iter()
            .find(|claim| claim.org_id == org_id)
            .map(|claim| claim.role)
    }
}
