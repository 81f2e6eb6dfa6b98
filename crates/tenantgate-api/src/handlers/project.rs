//! Project handlers: listing, creation and access checks.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use tenantgate_core::error::AppError;
use tenantgate_entity::project::Project;

use crate::dto::request::CreateProjectRequest;
use crate::dto::response::{ApiResponse, ProjectAccessResponse};
use crate::extractors::{OrgAdmin, OrgMember, ProjectMember, ValidatedJson};
use crate::state::AppState;

/// GET /api/orgs/{org_id}/projects
pub async fn list_projects(
    State(state): State<AppState>,
    guard: OrgMember,
) -> Result<Json<ApiResponse<Vec<Project>>>, AppError> {
    let projects = state
        .organizations
        .list_projects(&guard.principal, guard.org_id)
        .await?;
    Ok(Json(ApiResponse::ok(projects)))
}

/// POST /api/orgs/{org_id}/projects
pub async fn create_project(
    State(state): State<AppState>,
    guard: OrgAdmin,
    ValidatedJson(req): ValidatedJson<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Project>>), AppError> {
    let project = state
        .organizations
        .create_project(&guard.principal, guard.org_id, &req.project_name)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(project))))
}

/// GET /api/projects/{project_id}/access
pub async fn access(guard: ProjectMember) -> Json<ApiResponse<ProjectAccessResponse>> {
    Json(ApiResponse::ok(ProjectAccessResponse {
        project_id: guard.project_id,
        org_id: guard.org_id,
        role: guard.principal.role_in(guard.org_id),
        is_super_admin: guard.principal.is_super_admin,
    }))
}
