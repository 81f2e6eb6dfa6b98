//! Invite handlers: verification and redemption.
//!
//! Both endpoints are public; the raw token is the credential.

use axum::Json;
use axum::extract::{Query, State};

use tenantgate_auth::invite::InviteVerdict;
use tenantgate_core::error::AppError;

use crate::dto::request::{RedeemInviteRequest, VerifyInviteQuery};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// GET /api/invites/verify?token=
pub async fn verify(
    State(state): State<AppState>,
    Query(query): Query<VerifyInviteQuery>,
) -> Result<Json<ApiResponse<InviteVerdict>>, AppError> {
    let verdict = state.identity.verify_invite(&query.token).await?;
    Ok(Json(ApiResponse::ok(verdict)))
}

/// POST /api/invites/redeem
pub async fn redeem(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RedeemInviteRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    state
        .identity
        .redeem_invite(&req.token, &req.password)
        .await?;

    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Password set. You can now log in.",
    ))))
}
