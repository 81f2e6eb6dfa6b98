//! Route definitions for the TenantGate HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::{build_cors_layer, request_logging};
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(invite_routes())
        .merge(org_routes())
        .merge(user_routes())
        .merge(project_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(request_logging))
        .with_state(state)
}

/// Auth endpoints: login, me
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/me", get(handlers::auth::me))
}

/// Invite endpoints (public)
fn invite_routes() -> Router<AppState> {
    Router::new()
        .route("/invites/verify", get(handlers::invite::verify))
        .route("/invites/redeem", post(handlers::invite::redeem))
}

/// Organization administration
fn org_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/orgs",
            post(handlers::org::create_org).get(handlers::org::list_orgs),
        )
        .route("/orgs/{org_id}/metadata", put(handlers::org::update_metadata))
        .route("/orgs/{org_id}/admins", post(handlers::org::create_admin))
        .route(
            "/orgs/{org_id}/users",
            get(handlers::org::list_users).post(handlers::org::create_user),
        )
        .route(
            "/orgs/{org_id}/users/{user_id}",
            delete(handlers::org::remove_user),
        )
        .route(
            "/orgs/{org_id}/users/{user_id}/invite",
            post(handlers::org::resend_invite),
        )
}

/// User administration (super-admin)
fn user_routes() -> Router<AppState> {
    Router::new().route(
        "/users/{user_id}/deactivate",
        post(handlers::user::deactivate),
    )
}

/// Projects: per-organization listing and creation, project-scoped checks
fn project_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/orgs/{org_id}/projects",
            get(handlers::project::list_projects).post(handlers::project::create_project),
        )
        .route(
            "/projects/{project_id}/access",
            get(handlers::project::access),
        )
}

/// Health
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
