//! Raw invite token generation and keyed hashing.
//!
//! The raw token only ever exists in memory and in the delivered link;
//! storage holds the HMAC-SHA256 digest.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::Sha256;

use tenantgate_core::error::AppError;

/// Random bytes per raw token.
pub const RAW_TOKEN_BYTES: usize = 32;

/// A raw invite token. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct RawInviteToken(String);

impl RawInviteToken {
    /// Wrap a token received from a client.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The token text, for hashing or building the delivered link.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for RawInviteToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RawInviteToken(<redacted>)")
    }
}

/// 32 bytes from the OS CSPRNG, base64url without padding.
pub fn generate_raw_token() -> RawInviteToken {
    let mut bytes = [0u8; RAW_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    RawInviteToken(URL_SAFE_NO_PAD.encode(bytes))
}

/// Deterministic HMAC-SHA256 over raw tokens.
#[derive(Clone)]
pub struct InviteTokenHasher {
    mac: Hmac<Sha256>,
}

impl std::fmt::Debug for InviteTokenHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InviteTokenHasher").finish_non_exhaustive()
    }
}

impl InviteTokenHasher {
    /// Key the hasher with `secret`.
    pub fn new(secret: &str) -> Result<Self, AppError> {
        let mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .map_err(|e| AppError::configuration(format!("Invalid invite HMAC key: {e}")))?;
        Ok(Self { mac })
    }

    /// Lowercase hex digest of `raw`.
    pub fn hash(&self, raw: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(raw.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_tokens_are_url_safe_and_unique() {
        let a = generate_raw_token();
        let b = generate_raw_token();

        assert_eq!(a.expose().len(), 43);
        assert!(
            a.expose()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
        assert_ne!(a, b);
        assert!(!format!("{a:?}").contains(a.expose()));
    }

    #[test]
    fn test_hash_is_deterministic_and_keyed() {
        let hasher = InviteTokenHasher::new("invite-secret").unwrap();
        let other = InviteTokenHasher::new("different-secret").unwrap();

        let digest = hasher.hash("raw-token");
        assert_eq!(digest, hasher.hash("raw-token"));
        assert_eq!(digest.len(), 64);
        assert_ne!(digest, hasher.hash("raw-token2"));
        assert_ne!(digest, other.hash("raw-token"));
    }

    #[test]
    fn test_known_vector() {
        // RFC 4231 test case 2.
        let hasher = InviteTokenHasher::new("Jefe").unwrap();
        assert_eq!(
            hasher.hash("what do ya want for nothing?"),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }
}
