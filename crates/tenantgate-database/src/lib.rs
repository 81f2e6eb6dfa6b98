//! # tenantgate-database
//!
//! PostgreSQL connection management, concrete repositories for the
//! identity tables, and the [`IdentityStore`] abstraction the services are
//! written against. An in-memory store backs tests and local tooling.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{IdentityStore, MemoryIdentityStore, PgIdentityStore};
