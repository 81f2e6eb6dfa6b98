//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login request body.
///
/// Blank fields are not a validation error: every failed login answers
/// with the same credential error.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Password.
    #[serde(default)]
    pub password: String,
}

/// Query of `GET /api/invites/verify`.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyInviteQuery {
    /// Raw invite token from the link.
    #[serde(default)]
    pub token: String,
}

/// Invite redemption body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RedeemInviteRequest {
    /// Raw invite token from the link.
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    /// The first password of the account. Policy is enforced by the service.
    pub password: String,
}

/// Create organization request (super-admin).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateOrgRequest {
    /// Unique organization name.
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
    /// Free-form JSON object.
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

/// Create a project inside an organization.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProjectRequest {
    /// Project name.
    #[validate(length(min = 1, max = 200, message = "Project name must be 1-200 characters"))]
    pub project_name: String,
}

/// Replace organization metadata.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateMetadataRequest {
    /// New metadata object.
    pub metadata: serde_json::Value,
}

/// Provision an org admin or org user by email.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProvisionUserRequest {
    /// Email of the user to invite.
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
}
