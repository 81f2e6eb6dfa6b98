//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tenantgate_auth::jwt::AccessToken;
use tenantgate_entity::membership::OrgRole;
use tenantgate_service::{Principal, ProvisionedUser};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Signed session token.
    pub access_token: String,
    /// Always `bearer`.
    pub token_type: String,
    /// Session token expiration.
    pub expires_at: DateTime<Utc>,
}

impl From<AccessToken> for LoginResponse {
    fn from(token: AccessToken) -> Self {
        Self {
            access_token: token.token,
            token_type: "bearer".to_string(),
            expires_at: token.expires_at,
        }
    }
}

/// A user provisioned into an organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionedUserResponse {
    /// New user id.
    pub user_id: i64,
    /// Normalized email.
    pub email: String,
    /// Organization joined.
    pub org_id: i64,
    /// Role in that organization.
    pub role: OrgRole,
    /// Expiry of the invite that was sent.
    pub invite_expires_at: DateTime<Utc>,
}

impl From<ProvisionedUser> for ProvisionedUserResponse {
    fn from(p: ProvisionedUser) -> Self {
        Self {
            user_id: p.user.user_id,
            email: p.user.email,
            org_id: p.membership.org_id,
            role: p.membership.role,
            invite_expires_at: p.invite_expires_at,
        }
    }
}

/// A re-sent invite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InviteSentResponse {
    /// Invited user.
    pub user_id: i64,
    /// Expiry of the new invite.
    pub invite_expires_at: DateTime<Utc>,
}

/// The caller's profile as asserted by the session token.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    /// The principal.
    #[serde(flatten)]
    pub principal: Principal,
    /// Organizations the caller administers.
    pub admin_org_ids: Vec<i64>,
}

/// Result of a project access check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectAccessResponse {
    /// Project checked.
    pub project_id: i64,
    /// Organization owning it.
    pub org_id: i64,
    /// Caller's role there; absent for super-admins without membership.
    pub role: Option<OrgRole>,
    /// Whether access came from the super-admin flag.
    pub is_super_admin: bool,
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

impl MessageResponse {
    /// Wraps a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status string.
    pub status: String,
    /// Version.
    pub version: String,
    /// Seconds since the server started.
    pub uptime_seconds: u64,
}
