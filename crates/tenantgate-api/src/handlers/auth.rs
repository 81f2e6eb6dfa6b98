//! Auth handlers: login and profile.

use axum::Json;
use axum::extract::State;

use tenantgate_core::error::AppError;

use crate::dto::request::LoginRequest;
use crate::dto::response::{ApiResponse, LoginResponse, ProfileResponse};
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let token = state
        .identity
        .authenticate(&req.email, &req.password)
        .await?;

    Ok(Json(ApiResponse::ok(LoginResponse::from(token))))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Json<ApiResponse<ProfileResponse>> {
    let principal = auth.into_inner();
    let admin_org_ids = state.identity.access().admin_org_ids(&principal);
    Json(ApiResponse::ok(ProfileResponse {
        principal,
        admin_org_ids,
    }))
}
