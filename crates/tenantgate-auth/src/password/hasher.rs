//! Argon2id password hashing with legacy bcrypt verification.

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use tenantgate_core::error::AppError;

/// Digest families this hasher can verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scheme {
    Argon2,
    Bcrypt,
}

impl Scheme {
    fn detect(digest: &str) -> Option<Self> {
        if digest.starts_with("$argon2") {
            Some(Self::Argon2)
        } else if ["$2a$", "$2b$", "$2y$"]
            .iter()
            .any(|prefix| digest.starts_with(prefix))
        {
            Some(Self::Bcrypt)
        } else {
            None
        }
    }
}

/// Hashes new passwords with Argon2id and verifies both Argon2 and legacy
/// bcrypt digests. New bcrypt digests are never produced.
#[derive(Debug, Clone)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Creates a new password hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hashes a plaintext password using Argon2id with a random salt.
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Checks a plaintext password against a stored digest.
    ///
    /// Malformed or unrecognised digests never match.
    pub fn verify_password(&self, password: &str, digest: &str) -> bool {
        match Scheme::detect(digest) {
            Some(Scheme::Argon2) => match PasswordHash::new(digest) {
                Ok(parsed) => Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok(),
                Err(_) => false,
            },
            Some(Scheme::Bcrypt) => bcrypt::verify(password, digest).unwrap_or(false),
            None => false,
        }
    }

    /// Whether a digest should be replaced by a fresh Argon2id hash after the
    /// next successful verification.
    pub fn needs_rehash(&self, digest: &str) -> bool {
        match Scheme::detect(digest) {
            Some(Scheme::Bcrypt) => true,
            Some(Scheme::Argon2) => !digest.starts_with("$argon2id$"),
            None => false,
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
