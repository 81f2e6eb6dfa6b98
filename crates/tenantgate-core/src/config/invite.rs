//! Invitation token configuration.

use serde::{Deserialize, Serialize};

/// Invite issuance and delivery configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct InviteConfig {
    /// Dedicated HMAC key for invite token hashes. Falls back to
    /// `auth.jwt_secret` when unset or empty.
    #[serde(default)]
    pub token_secret: Option<String>,
    /// Invite lifetime in hours.
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: u64,
    /// Base URL used to build the link delivered to the invitee.
    #[serde(default = "default_link_base_url")]
    pub link_base_url: String,
    /// Sender shown on delivered invitations.
    #[serde(default = "default_email_from")]
    pub email_from: String,
    /// Mail relay for invite links. Links are only logged without the
    /// token while this is unset or incomplete.
    #[serde(default)]
    pub smtp: Option<SmtpConfig>,
}

/// SMTP relay settings for invite delivery.
#[derive(Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    /// Relay host name.
    #[serde(default)]
    pub host: String,
    /// Relay port; 465 for implicit TLS, 587 with `starttls`.
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    /// Login user.
    #[serde(default)]
    pub username: String,
    /// Login password.
    #[serde(default)]
    pub password: String,
    /// Upgrade a plain connection with STARTTLS instead of implicit TLS.
    #[serde(default)]
    pub starttls: bool,
}

impl SmtpConfig {
    /// Host and credentials are all present.
    pub fn is_configured(&self) -> bool {
        !self.host.trim().is_empty() && !self.username.is_empty() && !self.password.is_empty()
    }
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("starttls", &self.starttls)
            .finish()
    }
}

impl Default for InviteConfig {
    fn default() -> Self {
        Self {
            token_secret: None,
            ttl_hours: default_ttl_hours(),
            link_base_url: default_link_base_url(),
            email_from: default_email_from(),
            smtp: None,
        }
    }
}

impl std::fmt::Debug for InviteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InviteConfig")
            .field(
                "token_secret",
                &self.token_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("ttl_hours", &self.ttl_hours)
            .field("link_base_url", &self.link_base_url)
            .field("email_from", &self.email_from)
            .field("smtp", &self.smtp)
            .finish()
    }
}

impl InviteConfig {
    /// The relay to deliver through, if one is fully configured.
    pub fn smtp_relay(&self) -> Option<&SmtpConfig> {
        self.smtp.as_ref().filter(|smtp| smtp.is_configured())
    }

    /// Returns the HMAC key for invite hashes, falling back to the session secret.
    pub fn effective_secret<'a>(&'a self, session_secret: &'a str) -> &'a str {
        match self.token_secret.as_deref() {
            Some(secret) if !secret.is_empty() => secret,
            _ => session_secret,
        }
    }
}

fn default_ttl_hours() -> u64 {
    48
}

fn default_link_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_smtp_port() -> u16 {
    465
}

fn default_email_from() -> String {
    "TenantGate <no-reply@example.com>".to_string()
}
