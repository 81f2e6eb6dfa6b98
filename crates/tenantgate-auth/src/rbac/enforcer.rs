//! Access decisions over a principal's embedded claims.
//!
//! Decisions are pure: no storage is consulted, only the super-admin flag
//! and the membership list carried by the principal.

use serde::{Deserialize, Serialize};

use tenantgate_core::error::AppError;
use tenantgate_entity::membership::OrgRole;

use crate::jwt::claims::{Claims, OrgClaim};

/// What a principal must hold in the target organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleRequirement {
    /// Any membership in the organization.
    AnyMembership,
    /// An `ADMIN` membership in the organization.
    Admin,
}

impl RoleRequirement {
    /// Whether `role` satisfies this requirement. Roles are not ordered
    /// beyond this.
    pub fn satisfied_by(&self, role: OrgRole) -> bool {
        match self {
            Self::AnyMembership => true,
            Self::Admin => role.is_admin(),
        }
    }
}

impl From<OrgRole> for RoleRequirement {
    fn from(role: OrgRole) -> Self {
        match role {
            OrgRole::Admin => Self::Admin,
            OrgRole::User => Self::AnyMembership,
        }
    }
}

/// Anything carrying the claims access decisions are made from.
pub trait MembershipClaims {
    /// Super-admin flag.
    fn is_super_admin(&self) -> bool;

    /// Memberships held.
    fn memberships(&self) -> &[OrgClaim];
}

impl MembershipClaims for Claims {
    fn is_super_admin(&self) -> bool {
        self.is_super_admin
    }

    fn memberships(&self) -> &[OrgClaim] {
        &self.orgs
    }
}

/// Evaluates organization-scoped access.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessControl;

impl AccessControl {
    /// Creates a new evaluator.
    pub fn new() -> Self {
        Self
    }

    /// Super-admins pass everything; everyone else needs a membership in
    /// `org_id` that satisfies `requirement`.
    pub fn allows<P: MembershipClaims + ?Sized>(
        &self,
        principal: &P,
        org_id: i64,
        requirement: RoleRequirement,
    ) -> bool {
        principal.is_super_admin()
            || principal
                .memberships()
                .iter()
                .any(|m| m.org_id == org_id && requirement.satisfied_by(m.role))
    }

    /// Guard form of [`allows`](Self::allows).
    pub fn require<P: MembershipClaims + ?Sized>(
        &self,
        principal: &P,
        org_id: i64,
        requirement: RoleRequirement,
    ) -> Result<(), AppError> {
        if self.allows(principal, org_id, requirement) {
            Ok(())
        } else {
            Err(AppError::forbidden(match requirement {
                RoleRequirement::AnyMembership => "Not a member of this organization",
                RoleRequirement::Admin => "Organization admin role required",
            }))
        }
    }

    /// Require the super-admin flag.
    pub fn require_super_admin<P: MembershipClaims + ?Sized>(
        &self,
        principal: &P,
    ) -> Result<(), AppError> {
        if principal.is_super_admin() {
            Ok(())
        } else {
            Err(AppError::forbidden("Super admin only"))
        }
    }

    /// Organizations the principal is a member of.
    pub fn org_ids<P: MembershipClaims + ?Sized>(&self, principal: &P) -> Vec<i64> {
        principal.memberships().iter().map(|m| m.org_id).collect()
    }

    /// Organizations the principal administers.
    pub fn admin_org_ids<P: MembershipClaims + ?Sized>(&self, principal: &P) -> Vec<i64> {
        principal
            .memberships()
            .iter()
            .filter(|m| m.role.is_admin())
            .map(|m| m.org_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        super_admin: bool,
        orgs: Vec<OrgClaim>,
    }

    impl MembershipClaims for Fixture {
        fn is_super_admin(&self) -> bool {
            self.super_admin
        }

        fn memberships(&self) -> &[OrgClaim] {
            &self.orgs
        }
    }

    fn member_of_five() -> Fixture {
        Fixture {
            super_admin: false,
            orgs: vec![OrgClaim {
                org_id: 5,
                role: OrgRole::User,
            }],
        }
    }

    #[test]
    fn test_user_membership_scope() {
        let acl = AccessControl::new();
        let principal = member_of_five();

        assert!(!acl.allows(&principal, 5, RoleRequirement::Admin));
        assert!(acl.allows(&principal, 5, RoleRequirement::AnyMembership));
        assert!(!acl.allows(&principal, 6, RoleRequirement::Admin));
        assert!(!acl.allows(&principal, 6, RoleRequirement::AnyMembership));
    }

    #[test]
    fn test_super_admin_allowed_everywhere() {
        let acl = AccessControl::new();
        let principal = Fixture {
            super_admin: true,
            orgs: Vec::new(),
        };

        for org_id in [1, 5, 999] {
            assert!(acl.allows(&principal, org_id, RoleRequirement::Admin));
        }
        assert!(acl.require_super_admin(&principal).is_ok());
    }

    #[test]
    fn test_require_returns_forbidden() {
        let acl = AccessControl::new();
        let err = acl
            .require(&member_of_five(), 5, RoleRequirement::Admin)
            .unwrap_err();
        assert_eq!(err.kind, tenantgate_core::ErrorKind::Forbidden);
        assert!(acl.require_super_admin(&member_of_five()).is_err());
    }

    #[test]
    fn test_org_id_filters() {
        let acl = AccessControl::new();
        let principal = Fixture {
            super_admin: false,
            orgs: vec![
                OrgClaim {
                    org_id: 1,
                    role: OrgRole::Admin,
                },
                OrgClaim {
                    org_id: 2,
                    role: OrgRole::User,
                },
            ],
        };
        assert_eq!(acl.org_ids(&principal), vec![1, 2]);
        assert_eq!(acl.admin_org_ids(&principal), vec![1]);
    }
}
