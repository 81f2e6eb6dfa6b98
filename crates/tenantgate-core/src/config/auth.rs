//! Session credential and password policy configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Floor for the configurable minimum password length.
pub const PASSWORD_MIN_LENGTH_FLOOR: usize = 8;

/// Signing algorithms accepted for session tokens.
pub const SUPPORTED_JWT_ALGORITHMS: &[&str] = &["HS256", "HS384", "HS512"];

/// Authentication and credential configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for session token signing.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Signing algorithm name (`HS256`, `HS384`, `HS512`).
    #[serde(default = "default_jwt_algorithm")]
    pub jwt_algorithm: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: u64,
    /// Minimum password length, enforced when a password is set.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Maximum password length.
    #[serde(default = "default_password_max")]
    pub password_max_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_algorithm: default_jwt_algorithm(),
            access_ttl_minutes: default_access_ttl(),
            password_min_length: default_password_min(),
            password_max_length: default_password_max(),
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_algorithm", &self.jwt_algorithm)
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .field("password_min_length", &self.password_min_length)
            .field("password_max_length", &self.password_max_length)
            .finish()
    }
}

impl AuthConfig {
    /// Checks invariants the deserializer cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.jwt_secret.is_empty() {
            return Err(AppError::configuration("auth.jwt_secret must not be empty"));
        }
        if !SUPPORTED_JWT_ALGORITHMS.contains(&self.jwt_algorithm.as_str()) {
            return Err(AppError::configuration(format!(
                "auth.jwt_algorithm '{}' is not supported; expected one of {:?}",
                self.jwt_algorithm, SUPPORTED_JWT_ALGORITHMS
            )));
        }
        if self.access_ttl_minutes == 0 {
            return Err(AppError::configuration(
                "auth.access_ttl_minutes must be greater than zero",
            ));
        }
        if self.password_min_length < PASSWORD_MIN_LENGTH_FLOOR {
            return Err(AppError::configuration(format!(
                "auth.password_min_length must be at least {PASSWORD_MIN_LENGTH_FLOOR}"
            )));
        }
        if self.password_max_length < self.password_min_length {
            return Err(AppError::configuration(
                "auth.password_max_length must not be below auth.password_min_length",
            ));
        }
        Ok(())
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_jwt_algorithm() -> String {
    "HS256".to_string()
}

fn default_access_ttl() -> u64 {
    15
}

fn default_password_min() -> usize {
    PASSWORD_MIN_LENGTH_FLOOR
}

fn default_password_max() -> usize {
    256
}
