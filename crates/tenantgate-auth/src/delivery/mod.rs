//! Outbound channel for invite links.
//!
//! Delivery runs after the invite is committed and its failure never
//! affects the invite itself; an admin can resend.

pub mod smtp;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{info, warn};

use tenantgate_core::config::InviteConfig;
use tenantgate_core::result::AppResult;

pub use smtp::SmtpDelivery;

/// Sends an invite link to a recipient.
#[async_trait]
pub trait InviteDelivery: Send + Sync + std::fmt::Debug {
    /// Deliver `link` to `to`.
    async fn deliver(&self, to: &str, link: &str) -> AppResult<()>;
}

/// Pick the transport for `config`: SMTP when a relay is configured,
/// otherwise the log.
pub fn delivery_from_config(config: &InviteConfig) -> AppResult<Arc<dyn InviteDelivery>> {
    match config.smtp_relay() {
        Some(relay) => {
            info!(host = %relay.host, port = relay.port, "Invite delivery via SMTP");
            Ok(Arc::new(SmtpDelivery::new(relay, &config.email_from)?))
        }
        None => {
            warn!("No SMTP relay configured; invite links will not leave this process");
            Ok(Arc::new(LogDelivery::new(config.email_from.clone())))
        }
    }
}

/// Build the link the invitee follows: `{base}/invite/accept?token=<raw>`.
pub fn invite_link(base_url: &str, raw_token: &str) -> String {
    format!(
        "{}/invite/accept?token={raw_token}",
        base_url.trim_end_matches('/')
    )
}

/// Records deliveries in the log without the link, which carries the raw
/// token. Suitable when no mail transport is configured.
#[derive(Debug, Clone)]
pub struct LogDelivery {
    from: String,
}

impl LogDelivery {
    /// Creates a log-only delivery with the configured sender.
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

#[async_trait]
impl InviteDelivery for LogDelivery {
    async fn deliver(&self, to: &str, _link: &str) -> AppResult<()> {
        info!(to = %to, from = %self.from, "Invite link ready for delivery");
        Ok(())
    }
}

/// A delivered message captured by [`MemoryDelivery`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveredInvite {
    /// Recipient.
    pub to: String,
    /// Link sent.
    pub link: String,
}

/// Keeps delivered links in memory, for tests and local tooling.
#[derive(Debug, Clone, Default)]
pub struct MemoryDelivery {
    sent: Arc<Mutex<Vec<DeliveredInvite>>>,
}

impl MemoryDelivery {
    /// Creates an empty outbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything delivered so far.
    pub async fn sent(&self) -> Vec<DeliveredInvite> {
        self.sent.lock().await.clone()
    }

    /// Number of messages delivered to `to`.
    pub async fn count_for(&self, to: &str) -> usize {
        self.sent.lock().await.iter().filter(|d| d.to == to).count()
    }

    /// Wait until `to` has received at least `count` messages and return the
    /// raw token of the latest one. Gives up after `timeout`.
    pub async fn wait_for_token(&self, to: &str, count: usize, timeout: Duration) -> Option<String> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            {
                let sent = self.sent.lock().await;
                let mine: Vec<&DeliveredInvite> = sent.iter().filter(|d| d.to == to).collect();
                if mine.len() >= count {
                    return mine.last().and_then(|d| token_from_link(&d.link));
                }
            }
            if tokio::time::Instant::now() >= deadline {
                return None;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

#[async_trait]
impl InviteDelivery for MemoryDelivery {
    async fn deliver(&self, to: &str, link: &str) -> AppResult<()> {
        self.sent.lock().await.push(DeliveredInvite {
            to: to.to_string(),
            link: link.to_string(),
        });
        Ok(())
    }
}

/// Extract the `token` query parameter from an invite link.
pub fn token_from_link(link: &str) -> Option<String> {
    let (_, query) = link.split_once('?')?;
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("token="))
        .map(str::to_string)
}
