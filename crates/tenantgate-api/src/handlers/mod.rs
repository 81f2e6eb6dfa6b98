//! Request handlers, one module per resource.

pub mod auth;
pub mod health;
pub mod invite;
pub mod org;
pub mod project;
pub mod user;
