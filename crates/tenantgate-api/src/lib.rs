//! # tenantgate-api
//!
//! HTTP API layer for TenantGate built on Axum.
//!
//! Provides the REST endpoints, the request authentication gate
//! (extractors that turn a bearer token into a [`Principal`] and enforce
//! organization roles), CORS and request logging middleware, and DTOs.
//!
//! [`Principal`]: tenantgate_service::Principal

pub mod app;
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use state::AppState;
