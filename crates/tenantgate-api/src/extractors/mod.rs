//! Custom Axum extractors.
//!
//! Together these form the request authentication gate: [`AuthUser`]
//! verifies the bearer token, and the guards layer organization-scoped
//! role checks on top of it before a handler runs.

pub mod auth;
pub mod guards;
pub mod json;

pub use auth::AuthUser;
pub use guards::{OrgAdmin, OrgMember, ProjectMember, SuperAdmin};
pub use json::ValidatedJson;
