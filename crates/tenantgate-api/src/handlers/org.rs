//! Organization administration handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use tenantgate_core::error::AppError;
use tenantgate_entity::membership::{OrgMember, OrgRole};
use tenantgate_entity::organization::Organization;

use crate::dto::request::{CreateOrgRequest, ProvisionUserRequest, UpdateMetadataRequest};
use crate::dto::response::{
    ApiResponse, InviteSentResponse, MessageResponse, ProvisionedUserResponse,
};
use crate::extractors::{AuthUser, OrgAdmin, SuperAdmin, ValidatedJson};
use crate::state::AppState;

/// POST /api/orgs
pub async fn create_org(
    State(state): State<AppState>,
    SuperAdmin(principal): SuperAdmin,
    ValidatedJson(req): ValidatedJson<CreateOrgRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Organization>>), AppError> {
    let org = state
        .organizations
        .create_org(&principal, &req.name, req.metadata)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(org))))
}

/// GET /api/orgs
pub async fn list_orgs(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<Organization>>>, AppError> {
    let orgs = state.organizations.list_orgs(&auth).await?;
    Ok(Json(ApiResponse::ok(orgs)))
}

/// PUT /api/orgs/{org_id}/metadata
pub async fn update_metadata(
    State(state): State<AppState>,
    guard: OrgAdmin,
    ValidatedJson(req): ValidatedJson<UpdateMetadataRequest>,
) -> Result<Json<ApiResponse<Organization>>, AppError> {
    let org = state
        .organizations
        .update_metadata(&guard.principal, guard.org_id, req.metadata)
        .await?;
    Ok(Json(ApiResponse::ok(org)))
}

/// GET /api/orgs/{org_id}/users
pub async fn list_users(
    State(state): State<AppState>,
    guard: OrgAdmin,
) -> Result<Json<ApiResponse<Vec<OrgMember>>>, AppError> {
    let members = state
        .organizations
        .list_org_users(&guard.principal, guard.org_id)
        .await?;
    Ok(Json(ApiResponse::ok(members)))
}

/// POST /api/orgs/{org_id}/admins
pub async fn create_admin(
    State(state): State<AppState>,
    SuperAdmin(principal): SuperAdmin,
    Path(org_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<ProvisionUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ProvisionedUserResponse>>), AppError> {
    let provisioned = state
        .organizations
        .provision_user(&principal, org_id, &req.email, OrgRole::Admin)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(ProvisionedUserResponse::from(provisioned))),
    ))
}

/// POST /api/orgs/{org_id}/users
pub async fn create_user(
    State(state): State<AppState>,
    guard: OrgAdmin,
    ValidatedJson(req): ValidatedJson<ProvisionUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ProvisionedUserResponse>>), AppError> {
    let provisioned = state
        .organizations
        .provision_user(&guard.principal, guard.org_id, &req.email, OrgRole::User)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(ProvisionedUserResponse::from(provisioned))),
    ))
}

/// DELETE /api/orgs/{org_id}/users/{user_id}
pub async fn remove_user(
    State(state): State<AppState>,
    guard: OrgAdmin,
    Path((_, user_id)): Path<(i64, i64)>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    state
        .organizations
        .remove_user(&guard.principal, guard.org_id, user_id)
        .await?;

    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "User removed from organization",
    ))))
}

/// POST /api/orgs/{org_id}/users/{user_id}/invite
pub async fn resend_invite(
    State(state): State<AppState>,
    guard: OrgAdmin,
    Path((_, user_id)): Path<(i64, i64)>,
) -> Result<Json<ApiResponse<InviteSentResponse>>, AppError> {
    let invite_expires_at = state
        .organizations
        .resend_invite(&guard.principal, guard.org_id, user_id)
        .await?;

    Ok(Json(ApiResponse::ok(InviteSentResponse {
        user_id,
        invite_expires_at,
    })))
}
