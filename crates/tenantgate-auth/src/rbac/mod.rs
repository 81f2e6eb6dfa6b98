//! Organization-scoped role-based access control.

pub mod enforcer;

pub use enforcer::{AccessControl, MembershipClaims, RoleRequirement};
