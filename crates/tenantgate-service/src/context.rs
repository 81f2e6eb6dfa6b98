//! The authenticated principal of a request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tenantgate_auth::jwt::{Claims, OrgClaim};
use tenantgate_auth::rbac::MembershipClaims;
use tenantgate_entity::membership::OrgRole;

/// Who is acting, as asserted by a verified session token.
///
/// Built from claims alone; nothing is looked up per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    /// Numeric user id.
    pub user_id: i64,
    /// External user id.
    pub user_uuid: Uuid,
    /// Super-admin flag at token issuance.
    pub is_super_admin: bool,
    /// Memberships at token issuance.
    pub orgs: Vec<OrgClaim>,
    /// When the presented token expires.
    pub token_expires_at: DateTime<Utc>,
    /// Client address, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// When the request was received.
    #[serde(skip)]
    pub request_time: Option<DateTime<Utc>>,
}

impl Principal {
    /// Build a principal from verified claims.
    pub fn from_claims(claims: Claims) -> Self {
        let token_expires_at = claims.expires_at();
        Self {
            user_id: claims.uid,
            user_uuid: claims.sub,
            is_super_admin: claims.is_super_admin,
            orgs: claims.orgs,
            token_expires_at,
            ip_address: None,
            request_time: Some(Utc::now()),
        }
    }

    /// Attach the client address.
    pub fn with_ip(mut self, ip_address: Option<String>) -> Self {
        self.ip_address = ip_address;
        self
    }

    /// Role held in `org_id`, if any.
    pub fn role_in(&self, org_id: i64) -> Option<OrgRole> {
        self.orgs
            .iter()
            .find(|m| m.org_id == org_id)
            .map(|m| m.role)
    }
}

impl MembershipClaims for Principal {
    fn is_super_admin(&self) -> bool {
        self.is_super_admin
    }

    fn memberships(&self) -> &[OrgClaim] {
        &self.orgs
    }
}
