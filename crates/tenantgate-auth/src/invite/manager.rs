//! Invite issuance, verification and redemption.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{info, warn};

use tenantgate_core::config::InviteConfig;
use tenantgate_core::error::AppError;
use tenantgate_core::result::AppResult;
use tenantgate_database::store::IdentityStore;
use tenantgate_entity::invite::{Invite, InvitePurpose, NewInvite};

use super::token::{InviteTokenHasher, RawInviteToken, generate_raw_token};

/// Outcome of a successful issuance. The raw token is meant for delivery
/// only and must not be persisted or logged.
#[derive(Debug, Clone)]
pub struct IssuedInvite {
    /// Stored invite id.
    pub invite_id: i64,
    /// Invited user.
    pub user_id: i64,
    /// Hard expiry.
    pub expires_at: DateTime<Utc>,
    /// The one copy of the raw token.
    pub raw_token: RawInviteToken,
}

/// Answer to "is this token usable?". Unknown, used and expired tokens are
/// indistinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum InviteVerdict {
    /// The token can be redeemed until `expires_at`.
    Valid {
        /// Hard expiry.
        expires_at: DateTime<Utc>,
    },
    /// The token cannot be redeemed.
    Invalid,
}

/// Owns the lifecycle of one-time invites: generate, hash, revoke, store,
/// look up and consume.
#[derive(Debug, Clone)]
pub struct InviteManager {
    store: Arc<dyn IdentityStore>,
    hasher: InviteTokenHasher,
    ttl: Duration,
}

impl InviteManager {
    /// Build a manager whose token hashes are keyed with `secret`.
    pub fn new(
        store: Arc<dyn IdentityStore>,
        config: &InviteConfig,
        secret: &str,
    ) -> AppResult<Self> {
        let hours = i64::try_from(config.ttl_hours)
            .map_err(|_| AppError::configuration("invite.ttl_hours is too large"))?;
        Ok(Self {
            store,
            hasher: InviteTokenHasher::new(secret)?,
            ttl: Duration::hours(hours),
        })
    }

    /// Invite lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a fresh invite, revoking any open one for the same user and
    /// purpose in the same step.
    pub async fn issue(
        &self,
        user_id: i64,
        purpose: InvitePurpose,
        created_by_user_id: Option<i64>,
    ) -> AppResult<IssuedInvite> {
        let raw_token = generate_raw_token();
        let new_invite = NewInvite {
            user_id,
            token_hash: self.hasher.hash(raw_token.expose()),
            purpose,
            expires_at: Utc::now() + self.ttl,
            created_by_user_id,
        };

        let invite = self.store.issue_invite(&new_invite).await?;

        info!(
            invite_id = invite.invite_id,
            user_id = user_id,
            purpose = purpose.as_str(),
            expires_at = %invite.expires_at,
            "Invite issued"
        );

        Ok(IssuedInvite {
            invite_id: invite.invite_id,
            user_id,
            expires_at: invite.expires_at,
            raw_token,
        })
    }

    /// Report whether a raw token is currently redeemable.
    pub async fn verify(&self, raw_token: &str) -> AppResult<InviteVerdict> {
        Ok(match self.lookup(raw_token).await? {
            Some(invite) if invite.is_redeemable_at(Utc::now()) => InviteVerdict::Valid {
                expires_at: invite.expires_at,
            },
            _ => InviteVerdict::Invalid,
        })
    }

    /// The stored invite for a raw token, if it is still redeemable.
    pub async fn redeemable(&self, raw_token: &str) -> AppResult<Invite> {
        match self.lookup(raw_token).await? {
            Some(invite) if invite.is_redeemable_at(Utc::now()) => Ok(invite),
            _ => Err(AppError::invalid_or_expired()),
        }
    }

    /// Consume `invite` and activate its user with `password_hash`.
    ///
    /// The store's conditional update decides: if another redemption won,
    /// or the invite expired in the meantime, this fails and nothing changes.
    pub async fn consume(&self, invite: &Invite, password_hash: &str) -> AppResult<()> {
        if self
            .store
            .redeem_invite(invite.invite_id, password_hash)
            .await?
        {
            info!(
                invite_id = invite.invite_id,
                user_id = invite.user_id,
                "Invite redeemed, account activated"
            );
            Ok(())
        } else {
            warn!(invite_id = invite.invite_id, "Invite redemption lost a race");
            Err(AppError::invalid_or_expired())
        }
    }

    /// Look up and consume in one call. Returns the activated user's id.
    pub async fn redeem(&self, raw_token: &str, password_hash: &str) -> AppResult<i64> {
        let invite = self.redeemable(raw_token).await?;
        self.consume(&invite, password_hash).await?;
        Ok(invite.user_id)
    }

    async fn lookup(&self, raw_token: &str) -> AppResult<Option<Invite>> {
        if raw_token.is_empty() {
            return Ok(None);
        }
        let token_hash = self.hasher.hash(raw_token);
        self.store
            .find_invite_by_hash(&token_hash, InvitePurpose::SetPassword)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tenantgate_core::error::ErrorKind;
    use tenantgate_database::store::MemoryIdentityStore;
    use tenantgate_entity::membership::OrgRole;
    use tenantgate_entity::user::NewUser;

    async fn setup(ttl_hours: u64) -> (MemoryIdentityStore, InviteManager, i64) {
        let store = MemoryIdentityStore::new();
        let org = store
            .create_organization("Acme", &json!({}))
            .await
            .unwrap();
        let (user, _) = store
            .create_member(&NewUser::pending("invitee@example.com"), org.org_id, OrgRole::User)
            .await
            .unwrap();

        let config = InviteConfig {
            ttl_hours,
            ..InviteConfig::default()
        };
        let manager = InviteManager::new(Arc::new(store.clone()), &config, "secret").unwrap();
        (store, manager, user.user_id)
    }

    #[tokio::test]
    async fn test_issue_then_verify() {
        let (_, manager, user_id) = setup(48).await;
        let issued = manager
            .issue(user_id, InvitePurpose::SetPassword, None)
            .await
            .unwrap();

        let verdict = manager.verify(issued.raw_token.expose()).await.unwrap();
        assert_eq!(
            verdict,
            InviteVerdict::Valid {
                expires_at: issued.expires_at
            }
        );
        assert_eq!(
            manager.verify("unknown").await.unwrap(),
            InviteVerdict::Invalid
        );
        assert_eq!(manager.verify("").await.unwrap(), InviteVerdict::Invalid);
    }

    #[tokio::test]
    async fn test_second_redemption_fails() {
        let (store, manager, user_id) = setup(48).await;
        let issued = manager
            .issue(user_id, InvitePurpose::SetPassword, None)
            .await
            .unwrap();

        assert_eq!(
            manager
                .redeem(issued.raw_token.expose(), "hash-a")
                .await
                .unwrap(),
            user_id
        );
        let err = manager
            .redeem(issued.raw_token.expose(), "hash-b")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidOrExpired);

        let user = store.find_user_by_id(user_id).await.unwrap().unwrap();
        assert_eq!(user.password_hash.as_deref(), Some("hash-a"));
        assert!(user.is_active);
    }

    #[tokio::test]
    async fn test_concurrent_redemption_has_one_winner() {
        let (_, manager, user_id) = setup(48).await;
        let issued = manager
            .issue(user_id, InvitePurpose::SetPassword, None)
            .await
            .unwrap();

        let mut handles = Vec::new();
        for i in 0..8 {
            let manager = manager.clone();
            let raw = issued.raw_token.expose().to_string();
            handles.push(tokio::spawn(async move {
                manager.redeem(&raw, &format!("hash-{i}")).await
            }));
        }

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }
        assert_eq!(successes, 1);
    }

    #[tokio::test]
    async fn test_reissue_invalidates_previous_token() {
        let (store, manager, user_id) = setup(48).await;
        let first = manager
            .issue(user_id, InvitePurpose::SetPassword, None)
            .await
            .unwrap();
        let second = manager
            .issue(user_id, InvitePurpose::SetPassword, Some(1))
            .await
            .unwrap();

        assert_eq!(
            manager.verify(first.raw_token.expose()).await.unwrap(),
            InviteVerdict::Invalid
        );
        assert!(manager.redeem(first.raw_token.expose(), "h").await.is_err());
        assert!(manager.redeem(second.raw_token.expose(), "h").await.is_ok());

        let now = Utc::now();
        let open = store
            .invites_for_user(user_id)
            .await
            .into_iter()
            .filter(|i| i.is_redeemable_at(now))
            .count();
        assert_eq!(open, 0);
    }

    #[tokio::test]
    async fn test_concurrent_issuance_leaves_one_open_invite() {
        let (store, manager, user_id) = setup(48).await;

        let mut handles = Vec::new();
        for _ in 0..6 {
            let manager = manager.clone();
            handles.push(tokio::spawn(async move {
                manager
                    .issue(user_id, InvitePurpose::SetPassword, None)
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let now = Utc::now();
        let open = store
            .invites_for_user(user_id)
            .await
            .into_iter()
            .filter(|i| i.is_redeemable_at(now))
            .count();
        assert_eq!(open, 1);
    }

    #[tokio::test]
    async fn test_expired_invite_cannot_activate() {
        let (store, manager, user_id) = setup(0).await;
        let issued = manager
            .issue(user_id, InvitePurpose::SetPassword, None)
            .await
            .unwrap();

        assert_eq!(
            manager.verify(issued.raw_token.expose()).await.unwrap(),
            InviteVerdict::Invalid
        );
        let err = manager
            .redeem(issued.raw_token.expose(), "hash")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidOrExpired);

        let user = store.find_user_by_id(user_id).await.unwrap().unwrap();
        assert!(!user.is_active);
        assert!(user.password_hash.is_none());
    }

    #[tokio::test]
    async fn test_store_holds_only_the_hash() {
        let (store, manager, user_id) = setup(48).await;
        let issued = manager
            .issue(user_id, InvitePurpose::SetPassword, None)
            .await
            .unwrap();

        let stored = store.invites_for_user(user_id).await;
        assert_eq!(stored.len(), 1);
        assert_ne!(stored[0].token_hash, issued.raw_token.expose());
        assert_eq!(stored[0].token_hash.len(), 64);
    }
}
