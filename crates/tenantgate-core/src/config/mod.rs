//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from a
//! TOML file overlaid with `TENANTGATE__*` environment variables. The loaded
//! [`AppConfig`] is constructed once at startup and handed to component
//! constructors; nothing reads configuration ambiently.

pub mod app;
pub mod auth;
pub mod database;
pub mod invite;
pub mod logging;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::database::DatabaseConfig;
pub use self::invite::{InviteConfig, SmtpConfig};
pub use self::logging::LoggingConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Session token and password settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Invitation settings.
    #[serde(default)]
    pub invite: InviteConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file plus the environment.
    ///
    /// The file is optional; environment variables prefixed with
    /// `TENANTGATE__` (e.g. `TENANTGATE__AUTH__JWT_SECRET`) take precedence.
    pub fn load(config_path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("TENANTGATE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Validate cross-field invariants of every section.
    pub fn validate(&self) -> Result<(), AppError> {
        self.auth.validate()?;
        if self.invite.ttl_hours == 0 {
            return Err(AppError::configuration(
                "invite.ttl_hours must be greater than zero",
            ));
        }
        Ok(())
    }

    /// The HMAC key used for invite token hashes.
    pub fn invite_secret(&self) -> &str {
        self.invite.effective_secret(&self.auth.jwt_secret)
    }
}
