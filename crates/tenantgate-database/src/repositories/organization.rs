//! Organization repository implementation.

use sqlx::PgPool;

use tenantgate_core::error::{AppError, ErrorKind};
use tenantgate_core::result::AppResult;
use tenantgate_entity::organization::Organization;

/// Repository for the `organizations` table.
#[derive(Debug, Clone)]
pub struct OrganizationRepository {
    pool: PgPool,
}

impl OrganizationRepository {
    /// Create a new organization repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an organization by primary key.
    pub async fn find_by_id(&self, org_id: i64) -> AppResult<Option<Organization>> {
        sqlx::query_as::<_, Organization>(
            "SELECT org_id, org_uuid, name, metadata, created_at FROM organizations WHERE org_id = $1",
        )
        .bind(org_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find organization", e))
    }

    /// List organizations, optionally restricted to the given ids.
    pub async fn list(&self, only: Option<&[i64]>) -> AppResult<Vec<Organization>> {
        let query = match only {
            Some(ids) => sqlx::query_as::<_, Organization>(
                "SELECT org_id, org_uuid, name, metadata, created_at FROM organizations \
                 WHERE org_id = ANY($1) ORDER BY org_id",
            )
            .bind(ids.to_vec()),
            None => sqlx::query_as::<_, Organization>(
                "SELECT org_id, org_uuid, name, metadata, created_at FROM organizations ORDER BY org_id",
            ),
        };

        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list organizations", e))
    }

    /// Create an organization with a unique name.
    pub async fn create(&self, name: &str, metadata: &serde_json::Value) -> AppResult<Organization> {
        sqlx::query_as::<_, Organization>(
            "INSERT INTO organizations (name, metadata) VALUES ($1, $2) \
             RETURNING org_id, org_uuid, name, metadata, created_at",
        )
        .bind(name)
        .bind(metadata)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("organizations_name_key") =>
            {
                AppError::conflict(format!("Organization '{name}' already exists"))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create organization", e),
        })
    }

    /// Replace an organization's metadata document.
    pub async fn update_metadata(
        &self,
        org_id: i64,
        metadata: &serde_json::Value,
    ) -> AppResult<Option<Organization>> {
        sqlx::query_as::<_, Organization>(
            "UPDATE organizations SET metadata = $2 WHERE org_id = $1 \
             RETURNING org_id, org_uuid, name, metadata, created_at",
        )
        .bind(org_id)
        .bind(metadata)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update organization metadata", e)
        })
    }
}
