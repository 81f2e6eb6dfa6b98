//! Role guards layered on [`AuthUser`].
//!
//! Each guard authenticates first, so an unauthenticated caller always
//! sees 401 before any 403 or path error.

use std::collections::HashMap;

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use tenantgate_auth::rbac::RoleRequirement;
use tenantgate_core::error::AppError;
use tenantgate_service::Principal;

use super::auth::AuthUser;
use crate::state::AppState;

/// A super-admin caller.
#[derive(Debug, Clone)]
pub struct SuperAdmin(pub Principal);

impl FromRequestParts<AppState> for SuperAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(principal) = AuthUser::from_request_parts(parts, state).await?;
        state.identity.access().require_super_admin(&principal)?;
        Ok(SuperAdmin(principal))
    }
}

/// A caller holding `ADMIN` in the `{org_id}` of the route.
#[derive(Debug, Clone)]
pub struct OrgAdmin {
    /// The caller.
    pub principal: Principal,
    /// The organization from the path.
    pub org_id: i64,
}

impl FromRequestParts<AppState> for OrgAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let (principal, org_id) = org_scope(parts, state, RoleRequirement::Admin).await?;
        Ok(OrgAdmin { principal, org_id })
    }
}

/// A caller with any membership in the `{org_id}` of the route.
#[derive(Debug, Clone)]
pub struct OrgMember {
    /// The caller.
    pub principal: Principal,
    /// The organization from the path.
    pub org_id: i64,
}

impl FromRequestParts<AppState> for OrgMember {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let (principal, org_id) =
            org_scope(parts, state, RoleRequirement::AnyMembership).await?;
        Ok(OrgMember { principal, org_id })
    }
}

/// A caller with any membership in the organization owning the
/// `{project_id}` of the route.
#[derive(Debug, Clone)]
pub struct ProjectMember {
    /// The caller.
    pub principal: Principal,
    /// The project from the path.
    pub project_id: i64,
    /// The organization owning the project.
    pub org_id: i64,
}

impl FromRequestParts<AppState> for ProjectMember {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(principal) = AuthUser::from_request_parts(parts, state).await?;
        let project_id = path_id(parts, state, "project_id").await?;
        let org_id = state
            .organizations
            .authorize_project(&principal, project_id, RoleRequirement::AnyMembership)
            .await?;
        Ok(ProjectMember {
            principal,
            project_id,
            org_id,
        })
    }
}

async fn org_scope(
    parts: &mut Parts,
    state: &AppState,
    requirement: RoleRequirement,
) -> Result<(Principal, i64), AppError> {
    let AuthUser(principal) = AuthUser::from_request_parts(parts, state).await?;
    let org_id = path_id(parts, state, "org_id").await?;
    state
        .identity
        .access()
        .require(&principal, org_id, requirement)?;
    Ok((principal, org_id))
}

async fn path_id(parts: &mut Parts, state: &AppState, name: &str) -> Result<i64, AppError> {
    let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
        .await
        .map_err(|e| AppError::validation(e.body_text()))?;

    let raw = params
        .get(name)
        .ok_or_else(|| AppError::internal(format!("Route has no `{name}` parameter")))?;

    raw.parse()
        .map_err(|_| AppError::validation(format!("Invalid {name}: {raw}")))
}
