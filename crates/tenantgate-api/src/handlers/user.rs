//! User administration handlers.

use axum::Json;
use axum::extract::{Path, State};

use tenantgate_core::error::AppError;

use crate::dto::response::{ApiResponse, MessageResponse};
use crate::extractors::SuperAdmin;
use crate::state::AppState;

/// POST /api/users/{user_id}/deactivate
pub async fn deactivate(
    State(state): State<AppState>,
    SuperAdmin(principal): SuperAdmin,
    Path(user_id): Path<i64>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    state
        .organizations
        .deactivate_user(&principal, user_id)
        .await?;

    Ok(Json(ApiResponse::ok(MessageResponse::new("User deactivated"))))
}
