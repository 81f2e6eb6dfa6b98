//! Embedded schema migrations.

use sqlx::PgPool;
use tracing::info;

use tenantgate_core::error::{AppError, ErrorKind};
use tenantgate_core::result::AppResult;

/// Apply every pending migration under `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    info!("Applying identity schema migrations");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to run migrations", e))?;

    info!("Identity schema is up to date");
    Ok(())
}
