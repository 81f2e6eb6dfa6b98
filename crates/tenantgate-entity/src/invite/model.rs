//! Invite entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::status::InviteStatus;

/// What redeeming an invite does. Only password setup exists today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvitePurpose {
    /// Set the initial password and activate the account.
    SetPassword,
}

impl InvitePurpose {
    /// Return the purpose as its storage string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SetPassword => "SET_PASSWORD",
        }
    }
}

/// A stored invitation. Only the keyed hash of the raw token is persisted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Invite {
    /// Numeric primary key.
    pub invite_id: i64,
    /// Invited user.
    pub user_id: i64,
    /// Hex HMAC-SHA256 of the raw token.
    #[serde(skip_serializing)]
    pub token_hash: String,
    /// Storage form of [`InvitePurpose`].
    pub purpose: String,
    /// Hard expiry.
    pub expires_at: DateTime<Utc>,
    /// Set once, at redemption.
    pub used_at: Option<DateTime<Utc>>,
    /// When the invite was issued.
    pub created_at: DateTime<Utc>,
    /// Issuing user, if any.
    pub created_by_user_id: Option<i64>,
}

impl Invite {
    /// Lifecycle state of this invite at `now`.
    pub fn status_at(&self, now: DateTime<Utc>) -> InviteStatus {
        InviteStatus::derive(self.used_at, self.expires_at, now)
    }

    /// Whether this invite can still be redeemed at `now`.
    pub fn is_redeemable_at(&self, now: DateTime<Utc>) -> bool {
        self.status_at(now) == InviteStatus::Pending
    }
}

/// Data required to insert an invite row.
#[derive(Debug, Clone)]
pub struct NewInvite {
    /// Invited user.
    pub user_id: i64,
    /// Hex HMAC-SHA256 of the raw token.
    pub token_hash: String,
    /// Purpose of the invite.
    pub purpose: InvitePurpose,
    /// Hard expiry.
    pub expires_at: DateTime<Utc>,
    /// Issuing user, if any.
    pub created_by_user_id: Option<i64>,
}
