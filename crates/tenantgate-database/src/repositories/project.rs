//! Project repository implementation.

use sqlx::PgPool;

use tenantgate_core::error::{AppError, ErrorKind};
use tenantgate_core::result::AppResult;
use tenantgate_entity::project::Project;

const PROJECT_COLUMNS: &str = "project_id, project_name, project_org_id, created_at";

/// Repository for the `projects` table.
#[derive(Debug, Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    /// Create a new project repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The owning organization of a project.
    pub async fn find_org_id(&self, project_id: i64) -> AppResult<Option<i64>> {
        sqlx::query_scalar::<_, i64>("SELECT project_org_id FROM projects WHERE project_id = $1")
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to resolve project", e))
    }

    /// Projects of one organization, by name.
    pub async fn list_by_org(&self, org_id: i64) -> AppResult<Vec<Project>> {
        sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE project_org_id = $1 \
             ORDER BY project_name, project_id"
        ))
        .bind(org_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list projects", e))
    }

    /// Insert a project under `org_id`.
    pub async fn create(&self, org_id: i64, name: &str) -> AppResult<Project> {
        sqlx::query_as::<_, Project>(&format!(
            "INSERT INTO projects (project_name, project_org_id) VALUES ($1, $2) \
             RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(name)
        .bind(org_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                AppError::not_found("Organization not found")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create project", e),
        })
    }
}
