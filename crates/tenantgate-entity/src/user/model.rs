//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An identity record.
///
/// `password_hash` is `None` while the user is pending onboarding. An
/// active user always carries a hash; the `users` table enforces this with
/// a check constraint.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Numeric primary key.
    pub user_id: i64,
    /// Stable external identifier, used as the session subject.
    pub user_uuid: Uuid,
    /// Email address, unique case-insensitively.
    pub email: String,
    /// Argon2id (or legacy bcrypt) password hash.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// Bypasses every organization-scoped check.
    pub is_super_admin: bool,
    /// Whether the account may log in.
    pub is_active: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// The stored hash, but only for an account that is allowed to log in.
    pub fn login_hash(&self) -> Option<&str> {
        if self.is_active {
            self.password_hash.as_deref()
        } else {
            None
        }
    }

    /// Whether the user still awaits invite onboarding.
    pub fn is_pending(&self) -> bool {
        !self.is_active && self.password_hash.is_none()
    }
}

/// Data required to insert a user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Email address.
    pub email: String,
    /// Pre-hashed password; `None` for invite-onboarded users.
    pub password_hash: Option<String>,
    /// Super-admin flag.
    pub is_super_admin: bool,
}

impl NewUser {
    /// A passwordless, inactive user awaiting an invite.
    pub fn pending(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password_hash: None,
            is_super_admin: false,
        }
    }

    /// An active user with a known password hash.
    pub fn active(email: impl Into<String>, password_hash: String, is_super_admin: bool) -> Self {
        Self {
            email: email.into(),
            password_hash: Some(password_hash),
            is_super_admin,
        }
    }

    /// The row is active exactly when a password hash is supplied.
    pub fn is_active(&self) -> bool {
        self.password_hash.is_some()
    }
}

/// Normalizes an email for comparison.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
