//! Authentication, invitation and authorization operations.

use std::sync::Arc;

use tracing::{info, warn};

use tenantgate_auth::delivery::{InviteDelivery, invite_link};
use tenantgate_auth::invite::{InviteManager, InviteVerdict, IssuedInvite};
use tenantgate_auth::jwt::{AccessToken, JwtDecoder, JwtEncoder};
use tenantgate_auth::password::{PasswordHasher, PasswordValidator};
use tenantgate_auth::rbac::{AccessControl, RoleRequirement};
use tenantgate_core::config::AppConfig;
use tenantgate_core::error::AppError;
use tenantgate_core::result::AppResult;
use tenantgate_database::store::IdentityStore;
use tenantgate_entity::invite::InvitePurpose;
use tenantgate_entity::user::{NewUser, User};

use crate::context::Principal;

/// The identity core: login, session decoding, invite lifecycle and
/// organization-scoped authorization.
#[derive(Debug, Clone)]
pub struct IdentityService {
    /// Identity store.
    store: Arc<dyn IdentityStore>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Password policy.
    validator: Arc<PasswordValidator>,
    /// Session token signer.
    encoder: Arc<JwtEncoder>,
    /// Session token verifier.
    decoder: Arc<JwtDecoder>,
    /// Invite lifecycle.
    invites: Arc<InviteManager>,
    /// Outbound invite channel.
    delivery: Arc<dyn InviteDelivery>,
    /// Access evaluator.
    access: AccessControl,
    /// Base URL for invite links.
    link_base_url: String,
}

impl IdentityService {
    /// Wire the service from configuration.
    pub fn new(
        config: &AppConfig,
        store: Arc<dyn IdentityStore>,
        delivery: Arc<dyn InviteDelivery>,
    ) -> AppResult<Self> {
        Ok(Self {
            hasher: Arc::new(PasswordHasher::new()),
            validator: Arc::new(PasswordValidator::new(&config.auth)),
            encoder: Arc::new(JwtEncoder::new(&config.auth)?),
            decoder: Arc::new(JwtDecoder::new(&config.auth)?),
            invites: Arc::new(InviteManager::new(
                Arc::clone(&store),
                &config.invite,
                config.invite_secret(),
            )?),
            store,
            delivery,
            access: AccessControl::new(),
            link_base_url: config.invite.link_base_url.clone(),
        })
    }

    /// The identity store this service writes to.
    pub fn store(&self) -> &Arc<dyn IdentityStore> {
        &self.store
    }

    /// The access evaluator.
    pub fn access(&self) -> &AccessControl {
        &self.access
    }

    // ── Authentication ──

    /// Verify email and password and mint a session token carrying every
    /// membership. All failures collapse to `InvalidCredentials`.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<AccessToken> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AppError::invalid_credentials());
        }

        let Some(user) = self.store.find_user_by_email(email).await? else {
            info!(outcome = "unknown_email", "Login rejected");
            return Err(AppError::invalid_credentials());
        };

        let Some(digest) = user.login_hash() else {
            info!(user_id = user.user_id, outcome = "inactive", "Login rejected");
            return Err(AppError::invalid_credentials());
        };

        if !self.hasher.verify_password(password, digest) {
            info!(user_id = user.user_id, outcome = "bad_password", "Login rejected");
            return Err(AppError::invalid_credentials());
        }

        if self.hasher.needs_rehash(digest) {
            self.upgrade_hash(&user, password).await;
        }

        let memberships = self.store.memberships_for_user(user.user_id).await?;
        let token = self.encoder.issue(&user, &memberships)?;

        info!(
            user_id = user.user_id,
            org_count = memberships.len(),
            is_super_admin = user.is_super_admin,
            "Login succeeded"
        );
        Ok(token)
    }

    /// Replace a legacy digest after a successful login. Failure only logs.
    async fn upgrade_hash(&self, user: &User, password: &str) {
        let result = match self.hasher.hash_password(password) {
            Ok(fresh) => self.store.update_password_hash(user.user_id, &fresh).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => info!(user_id = user.user_id, "Legacy password hash upgraded"),
            Err(e) => warn!(user_id = user.user_id, error = %e, "Password rehash failed"),
        }
    }

    /// Decode a bearer token into a principal.
    pub fn principal(&self, token: &str) -> AppResult<Principal> {
        self.decoder.decode(token).map(Principal::from_claims)
    }

    /// Decode `token` and require `requirement` in `org_id`.
    pub fn authorize(
        &self,
        token: &str,
        org_id: i64,
        requirement: RoleRequirement,
    ) -> AppResult<Principal> {
        let principal = self.principal(token)?;
        self.access.require(&principal, org_id, requirement)?;
        Ok(principal)
    }

    // ── Invitations ──

    /// Issue an invite for a pending user and hand the link to delivery
    /// once the invite is stored.
    pub async fn issue_invite(
        &self,
        target_user_id: i64,
        purpose: InvitePurpose,
        issuer_id: Option<i64>,
    ) -> AppResult<IssuedInvite> {
        let user = self
            .store
            .find_user_by_id(target_user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        if !user.is_pending() {
            return Err(AppError::conflict("User is not awaiting onboarding"));
        }

        let issued = self.invites.issue(user.user_id, purpose, issuer_id).await?;

        let link = invite_link(&self.link_base_url, issued.raw_token.expose());
        let delivery = Arc::clone(&self.delivery);
        let invite_id = issued.invite_id;
        let to = user.email;
        tokio::spawn(async move {
            if let Err(e) = delivery.deliver(&to, &link).await {
                warn!(invite_id = invite_id, error = %e, "Invite delivery failed");
            }
        });

        Ok(issued)
    }

    /// Whether a raw invite token can still be redeemed.
    pub async fn verify_invite(&self, raw_token: &str) -> AppResult<InviteVerdict> {
        self.invites.verify(raw_token).await
    }

    /// Set the first password and activate the account behind `raw_token`.
    pub async fn redeem_invite(&self, raw_token: &str, new_password: &str) -> AppResult<()> {
        self.validator.validate(new_password)?;
        let invite = self.invites.redeemable(raw_token).await?;
        let digest = self.hasher.hash_password(new_password)?;
        self.invites.consume(&invite, &digest).await
    }

    // ── Bootstrap ──

    /// Create an active super-admin with a known password.
    pub async fn bootstrap_super_admin(&self, email: &str, password: &str) -> AppResult<User> {
        let email = email.trim();
        if !email.contains('@') {
            return Err(AppError::validation("A valid email address is required"));
        }
        self.validator.validate(password)?;

        let digest = self.hasher.hash_password(password)?;
        let user = self
            .store
            .create_user(&NewUser::active(email, digest, true))
            .await?;

        info!(user_id = user.user_id, "Super admin created");
        Ok(user)
    }
}
