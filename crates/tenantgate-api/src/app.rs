//! Application builder: wires state into the router and runs the server.

use std::sync::Arc;

use axum::Router;
use tracing::{error, info};

use tenantgate_auth::delivery::delivery_from_config;
use tenantgate_core::config::AppConfig;
use tenantgate_core::error::AppError;
use tenantgate_database::DatabasePool;
use tenantgate_database::store::PgIdentityStore;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Runs the TenantGate server against a Postgres pool until shutdown.
pub async fn run_server(config: AppConfig, db: DatabasePool) -> Result<(), AppError> {
    info!("Starting TenantGate server...");

    // ── Step 1: Identity store ───────────────────────────────────
    let store = Arc::new(PgIdentityStore::new(db.clone()));

    // ── Step 2: Invite delivery ──────────────────────────────────
    let delivery = delivery_from_config(&config.invite)?;

    // ── Step 3: Services and router ──────────────────────────────
    let addr = config.server.bind_address();
    let state = AppState::new(config, store, delivery)?;
    let app = build_app(state);

    // ── Step 4: Serve ────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!(address = %addr, "TenantGate server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    db.close().await;
    info!("TenantGate server stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received, starting graceful shutdown...");
}
