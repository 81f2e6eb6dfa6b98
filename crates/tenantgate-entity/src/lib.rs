//! # tenantgate-entity
//!
//! Domain entity models for TenantGate. Every struct in this crate
//! represents a database table row or a domain value object. Database
//! entities additionally derive `sqlx::FromRow`.

pub mod invite;
pub mod membership;
pub mod organization;
pub mod project;
pub mod user;
