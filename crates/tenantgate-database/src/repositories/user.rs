//! User repository implementation.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use tenantgate_core::error::{AppError, ErrorKind};
use tenantgate_core::result::AppResult;
use tenantgate_entity::user::{NewUser, User};

const USER_COLUMNS: &str =
    "user_id, user_uuid, email, password_hash, is_super_admin, is_active, created_at";

/// Repository for the `users` table.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by primary key.
    pub async fn find_by_id(&self, user_id: i64) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    /// Find a user by external identifier.
    pub async fn find_by_uuid(&self, user_uuid: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_uuid = $1"
        ))
        .bind(user_uuid)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by uuid", e))
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by email", e))
    }

    /// Replace a user's password hash.
    pub async fn update_password_hash(&self, user_id: i64, password_hash: &str) -> AppResult<()> {
        sqlx::query("UPDATE users SET password_hash = $2 WHERE user_id = $1")
            .bind(user_id)
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update password hash", e)
            })?;
        Ok(())
    }

    /// Mark a user inactive. Returns `false` if the user does not exist.
    pub async fn deactivate(conn: &mut PgConnection, user_id: i64) -> AppResult<bool> {
        let result = sqlx::query("UPDATE users SET is_active = FALSE WHERE user_id = $1")
            .bind(user_id)
            .execute(conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to deactivate user", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Insert a user row. Active exactly when a hash is supplied.
    pub async fn create(conn: &mut PgConnection, data: &NewUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, password_hash, is_super_admin, is_active) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(data.email.trim())
        .bind(&data.password_hash)
        .bind(data.is_super_admin)
        .bind(data.is_active())
        .fetch_one(conn)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("users_email_lower_key") =>
            {
                AppError::conflict(format!("Email '{}' is already registered", data.email.trim()))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create user", e),
        })
    }

    /// Set the first password and activate in one statement. Returns
    /// `false` if the user already had a password.
    pub async fn activate_with_password(
        conn: &mut PgConnection,
        user_id: i64,
        password_hash: &str,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, is_active = TRUE \
             WHERE user_id = $1 AND password_hash IS NULL",
        )
        .bind(user_id)
        .bind(password_hash)
        .execute(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to activate user", e))?;
        Ok(result.rows_affected() > 0)
    }
}
