//! Invite repository implementation.
//!
//! Every state change is a conditional statement so the lifecycle rules
//! hold under concurrency: revocation only touches open invites, and
//! redemption only succeeds for an unused, unexpired row.

use sqlx::{PgConnection, PgPool};

use tenantgate_core::error::{AppError, ErrorKind};
use tenantgate_core::result::AppResult;
use tenantgate_entity::invite::{Invite, InvitePurpose, NewInvite};

const INVITE_COLUMNS: &str =
    "invite_id, user_id, token_hash, purpose, expires_at, used_at, created_at, created_by_user_id";

/// Repository for the `user_invites` table.
#[derive(Debug, Clone)]
pub struct InviteRepository {
    pool: PgPool,
}

impl InviteRepository {
    /// Create a new invite repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Look an invite up by token hash, regardless of state.
    pub async fn find_by_hash(
        &self,
        token_hash: &str,
        purpose: InvitePurpose,
    ) -> AppResult<Option<Invite>> {
        sqlx::query_as::<_, Invite>(&format!(
            "SELECT {INVITE_COLUMNS} FROM user_invites WHERE token_hash = $1 AND purpose = $2"
        ))
        .bind(token_hash)
        .bind(purpose.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find invite", e))
    }

    /// Serialize issuance for one (user, purpose) until the transaction ends.
    pub async fn lock_issuance(
        conn: &mut PgConnection,
        user_id: i64,
        purpose: InvitePurpose,
    ) -> AppResult<()> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(format!("invite:{user_id}:{}", purpose.as_str()))
            .execute(conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock invites", e))?;
        Ok(())
    }

    /// Expire every open invite of this user, whatever the purpose.
    pub async fn revoke_all_open(conn: &mut PgConnection, user_id: i64) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE user_invites SET expires_at = NOW() \
             WHERE user_id = $1 AND used_at IS NULL AND expires_at > NOW()",
        )
        .bind(user_id)
        .execute(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to revoke invites", e))?;
        Ok(result.rows_affected())
    }

    /// Expire every open invite of this user and purpose.
    pub async fn revoke_open(
        conn: &mut PgConnection,
        user_id: i64,
        purpose: InvitePurpose,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE user_invites SET expires_at = NOW() \
             WHERE user_id = $1 AND purpose = $2 AND used_at IS NULL AND expires_at > NOW()",
        )
        .bind(user_id)
        .bind(purpose.as_str())
        .execute(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to revoke invites", e))?;
        Ok(result.rows_affected())
    }

    /// Insert a fresh invite row.
    pub async fn create(conn: &mut PgConnection, data: &NewInvite) -> AppResult<Invite> {
        sqlx::query_as::<_, Invite>(&format!(
            "INSERT INTO user_invites (user_id, token_hash, purpose, expires_at, created_by_user_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {INVITE_COLUMNS}"
        ))
        .bind(data.user_id)
        .bind(&data.token_hash)
        .bind(data.purpose.as_str())
        .bind(data.expires_at)
        .bind(data.created_by_user_id)
        .fetch_one(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create invite", e))
    }

    /// Mark an invite used if it is still redeemable and its user has never
    /// set a password. Returns the invited user on success, `None` if another
    /// redemption won, it expired, or the user is past onboarding.
    pub async fn consume(conn: &mut PgConnection, invite_id: i64) -> AppResult<Option<i64>> {
        sqlx::query_scalar::<_, i64>(
            "UPDATE user_invites i SET used_at = NOW() \
             FROM users u \
             WHERE i.invite_id = $1 AND i.used_at IS NULL AND i.expires_at > NOW() \
               AND u.user_id = i.user_id AND u.password_hash IS NULL \
             RETURNING i.user_id",
        )
        .bind(invite_id)
        .fetch_optional(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to consume invite", e))
    }
}
