//! Session token validation.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, Validation, decode};
use tracing::debug;

use tenantgate_core::config::AuthConfig;
use tenantgate_core::error::AppError;

use super::claims::Claims;
use super::parse_algorithm;

/// Verifies signature, algorithm and expiry of session tokens.
///
/// Every failure is reported as the same `InvalidOrExpired` error.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        let mut validation = Validation::new(parse_algorithm(&config.jwt_algorithm)?);
        validation.validate_exp = true;
        validation.leeway = 0;

        Ok(Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        })
    }

    /// Decodes and validates a session token.
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                debug!(reason = ?e.kind(), "Session token rejected");
                AppError::invalid_or_expired()
            })?
            .claims;

        // The library accepts `exp == now`; a token is dead at its expiry second.
        if claims.exp <= Utc::now().timestamp() {
            return Err(AppError::invalid_or_expired());
        }

        Ok(claims)
    }
}
