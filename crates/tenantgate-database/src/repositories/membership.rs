//! Membership repository implementation.

use sqlx::{PgConnection, PgPool};

use tenantgate_core::error::{AppError, ErrorKind};
use tenantgate_core::result::AppResult;
use tenantgate_entity::membership::{Membership, OrgMember, OrgRole};

/// Repository for the `user_memberships` table.
#[derive(Debug, Clone)]
pub struct MembershipRepository {
    pool: PgPool,
}

impl MembershipRepository {
    /// Create a new membership repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All memberships of one user.
    pub async fn find_by_user(&self, user_id: i64) -> AppResult<Vec<Membership>> {
        sqlx::query_as::<_, Membership>(
            "SELECT membership_id, user_id, org_id, role FROM user_memberships \
             WHERE user_id = $1 ORDER BY org_id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load memberships", e))
    }

    /// The membership of `user_id` in `org_id`, if any.
    pub async fn find(&self, user_id: i64, org_id: i64) -> AppResult<Option<Membership>> {
        sqlx::query_as::<_, Membership>(
            "SELECT membership_id, user_id, org_id, role FROM user_memberships \
             WHERE user_id = $1 AND org_id = $2",
        )
        .bind(user_id)
        .bind(org_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find membership", e))
    }

    /// Members of an organization joined with their user rows.
    pub async fn list_members(&self, org_id: i64) -> AppResult<Vec<OrgMember>> {
        sqlx::query_as::<_, OrgMember>(
            "SELECT u.user_id, u.user_uuid, u.email, u.is_active, m.role \
             FROM user_memberships m JOIN users u ON u.user_id = m.user_id \
             WHERE m.org_id = $1 ORDER BY u.user_id",
        )
        .bind(org_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list org members", e))
    }

    /// Delete one membership. Returns `false` if there was none.
    pub async fn delete(&self, user_id: i64, org_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM user_memberships WHERE user_id = $1 AND org_id = $2")
            .bind(user_id)
            .bind(org_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to remove membership", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Insert a membership; at most one per (user, org).
    pub async fn create(
        conn: &mut PgConnection,
        user_id: i64,
        org_id: i64,
        role: OrgRole,
    ) -> AppResult<Membership> {
        sqlx::query_as::<_, Membership>(
            "INSERT INTO user_memberships (user_id, org_id, role) VALUES ($1, $2, $3) \
             RETURNING membership_id, user_id, org_id, role",
        )
        .bind(user_id)
        .bind(org_id)
        .bind(role)
        .fetch_one(conn)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("uq_user_org") => {
                AppError::conflict("User is already a member of this organization")
            }
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                AppError::not_found("Organization not found")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create membership", e),
        })
    }
}
