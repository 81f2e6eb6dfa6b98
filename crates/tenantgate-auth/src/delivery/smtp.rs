//! Invite delivery over an SMTP relay.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use tenantgate_core::config::SmtpConfig;
use tenantgate_core::error::{AppError, ErrorKind};
use tenantgate_core::result::AppResult;

use super::InviteDelivery;

const SUBJECT: &str = "You have been invited to TenantGate";

/// Sends invite links as plain-text mail through a relay.
#[derive(Clone)]
pub struct SmtpDelivery {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl std::fmt::Debug for SmtpDelivery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpDelivery")
            .field("from", &self.from.to_string())
            .finish_non_exhaustive()
    }
}

impl SmtpDelivery {
    /// Build a transport for `config` sending as `from`. No connection is
    /// made until the first delivery.
    pub fn new(config: &SmtpConfig, from: &str) -> AppResult<Self> {
        let from: Mailbox = from.parse().map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Invalid invite sender address '{from}'"),
                e,
            )
        })?;

        let host = config.host.trim();
        let relay = if config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)
        };
        let builder = relay.map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Invalid SMTP relay '{host}'"),
                e,
            )
        })?;

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self { transport, from })
    }

    /// Compose the invitation mail.
    pub fn message(&self, to: &str, link: &str) -> AppResult<Message> {
        let to: Mailbox = to.parse().map_err(|e| {
            AppError::with_source(ErrorKind::Validation, "Invalid recipient address", e)
        })?;

        let body = format!(
            "You have been invited to join TenantGate.\n\n\
             Set your password here:\n{link}\n\n\
             The link can be used once and expires soon. \
             If you were not expecting this, ignore this message.\n"
        );

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to build invite mail", e))
    }
}

#[async_trait]
impl InviteDelivery for SmtpDelivery {
    async fn deliver(&self, to: &str, link: &str) -> AppResult<()> {
        let message = self.message(to, link)?;
        self.transport.send(message).await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "SMTP delivery failed", e)
        })?;

        info!(to = %to, "Invite mail sent");
        Ok(())
    }
}
