//! Organization (tenant) entities.

pub mod model;

pub use model::Organization;
