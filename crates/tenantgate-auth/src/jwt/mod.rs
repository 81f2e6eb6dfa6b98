//! Session token encoding, decoding, and claims.

pub mod claims;
pub mod decoder;
pub mod encoder;

use std::str::FromStr;

use jsonwebtoken::Algorithm;

use tenantgate_core::config::auth::SUPPORTED_JWT_ALGORITHMS;
use tenantgate_core::error::AppError;

pub use claims::{Claims, OrgClaim};
pub use decoder::JwtDecoder;
pub use encoder::{AccessToken, JwtEncoder};

/// Resolve a configured algorithm name to an HMAC algorithm.
pub(crate) fn parse_algorithm(name: &str) -> Result<Algorithm, AppError> {
    if !SUPPORTED_JWT_ALGORITHMS.contains(&name) {
        return Err(AppError::configuration(format!(
            "Unsupported session token algorithm '{name}'"
        )));
    }
    Algorithm::from_str(name)
        .map_err(|e| AppError::configuration(format!("Invalid algorithm '{name}': {e}")))
}
