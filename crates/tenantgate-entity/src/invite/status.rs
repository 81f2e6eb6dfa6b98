//! Invite lifecycle status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of an invite. Never stored; derived from `used_at` and
/// `expires_at`. Revocation is expressed as expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InviteStatus {
    /// Unused and not yet expired.
    Pending,
    /// Unused but past its expiry (or revoked).
    Expired,
    /// Redeemed. Terminal.
    Used,
}

impl InviteStatus {
    /// Derive the status. `expires_at == now` counts as expired.
    pub fn derive(
        used_at: Option<DateTime<Utc>>,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        if used_at.is_some() {
            Self::Used
        } else if expires_at > now {
            Self::Pending
        } else {
            Self::Expired
        }
    }
}
