//! Organization entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A tenant. Every membership, project and org-scoped permission hangs off
/// an organization.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Organization {
    /// Numeric primary key.
    pub org_id: i64,
    /// Stable external identifier.
    pub org_uuid: Uuid,
    /// Display name.
    pub name: String,
    /// Free-form JSON object owned by org admins.
    pub metadata: serde_json::Value,
    /// When the organization was created.
    pub created_at: DateTime<Utc>,
}
