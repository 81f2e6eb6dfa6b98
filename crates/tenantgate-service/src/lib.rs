//! # tenantgate-service
//!
//! Application services for TenantGate. `IdentityService` exposes the
//! authentication and invitation operations; `OrganizationService` builds
//! tenant administration on top of it.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod identity;
pub mod organization;

pub use context::Principal;
pub use identity::IdentityService;
pub use organization::{OrganizationService, ProvisionedUser};
