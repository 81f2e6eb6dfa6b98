//! `AuthUser` extractor: pulls the bearer token from the Authorization
//! header, verifies it, and injects the principal.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;

use tenantgate_core::error::AppError;
use tenantgate_service::Principal;

use crate::state::AppState;

/// The authenticated principal of a request.
///
/// A missing, malformed, forged or expired token rejects with the single
/// `Invalid or expired token` outcome (401).
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

impl AuthUser {
    /// Returns the inner principal.
    pub fn principal(&self) -> &Principal {
        &self.0
    }

    /// Consumes the extractor.
    pub fn into_inner(self) -> Principal {
        self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = Principal;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::invalid_or_expired())?;

        let principal = state.identity.principal(bearer.token())?;

        let ip_address = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string());

        Ok(AuthUser(principal.with_ip(ip_address)))
    }
}
