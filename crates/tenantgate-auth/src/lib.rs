//! # tenantgate-auth
//!
//! Credential and authorization primitives for TenantGate.
//!
//! ## Modules
//!
//! - `password`: Argon2id hashing with legacy bcrypt verification, length policy
//! - `jwt`: signed session claims carrying the principal's memberships
//! - `invite`: one-time invite tokens, keyed hashing and lifecycle management
//! - `rbac`: organization-scoped access decisions over embedded claims
//! - `delivery`: the outbound channel for invite links (SMTP, log, in-memory)

pub mod delivery;
pub mod invite;
pub mod jwt;
pub mod password;
pub mod rbac;

pub use delivery::{
    InviteDelivery, LogDelivery, MemoryDelivery, SmtpDelivery, delivery_from_config,
};
pub use invite::{InviteManager, InviteTokenHasher, InviteVerdict, IssuedInvite, RawInviteToken};
pub use jwt::{AccessToken, Claims, JwtDecoder, JwtEncoder, OrgClaim};
pub use password::{PasswordHasher, PasswordValidator};
pub use rbac::{AccessControl, MembershipClaims, RoleRequirement};
