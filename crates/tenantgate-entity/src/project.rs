//! Project entity model.
//!
//! Projects belong to exactly one organization. Only the name and the
//! ownership link are modeled here; project content lives outside this system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A resource owned by an organization.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    /// Numeric primary key.
    pub project_id: i64,
    /// Display name.
    pub project_name: String,
    /// Owning organization.
    pub project_org_id: i64,
    /// When the project was created.
    pub created_at: DateTime<Utc>,
}
