//! Session token creation.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};

use tenantgate_core::config::AuthConfig;
use tenantgate_core::error::AppError;
use tenantgate_entity::membership::Membership;
use tenantgate_entity::user::User;

use super::claims::Claims;
use super::parse_algorithm;

/// A freshly signed session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    /// Compact JWS.
    pub token: String,
    /// When the token stops being accepted.
    pub expires_at: DateTime<Utc>,
}

/// Signs session claims with the configured HMAC algorithm.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
    header: Header,
    access_ttl: Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("algorithm", &self.header.alg)
            .field("access_ttl", &self.access_ttl)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        let algorithm = parse_algorithm(&config.jwt_algorithm)?;
        let ttl_minutes = i64::try_from(config.access_ttl_minutes)
            .map_err(|_| AppError::configuration("auth.access_ttl_minutes is too large"))?;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            header: Header::new(algorithm),
            access_ttl: Duration::minutes(ttl_minutes),
        })
    }

    /// Issue a token for `user` carrying all of `memberships`.
    pub fn issue(&self, user: &User, memberships: &[Membership]) -> Result<AccessToken, AppError> {
        self.issue_at(user, memberships, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        user: &User,
        memberships: &[Membership],
        now: DateTime<Utc>,
    ) -> Result<AccessToken, AppError> {
        let claims = Claims::for_user(user, memberships, now, self.access_ttl);
        let token = self.sign(&claims)?;
        Ok(AccessToken {
            token,
            expires_at: claims.expires_at(),
        })
    }

    /// Sign arbitrary claims.
    pub fn sign(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&self.header, claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode session token: {e}")))
    }
}
