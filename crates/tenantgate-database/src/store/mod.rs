//! The storage seam the identity services are written against.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use tenantgate_core::result::AppResult;
use tenantgate_entity::invite::{Invite, InvitePurpose, NewInvite};
use tenantgate_entity::membership::{Membership, OrgMember, OrgRole};
use tenantgate_entity::organization::Organization;
use tenantgate_entity::project::Project;
use tenantgate_entity::user::{NewUser, User};

pub use memory::MemoryIdentityStore;
pub use postgres::PgIdentityStore;

/// Persistence for users, organizations, memberships, projects and invites.
///
/// Implementations must be thread-safe. Operations that touch more than
/// one row (`create_member`, `issue_invite`, `redeem_invite`) are atomic.
#[async_trait]
pub trait IdentityStore: Send + Sync + std::fmt::Debug {
    // ── Users ──

    /// Find a user by email, case-insensitively.
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find a user by primary key.
    async fn find_user_by_id(&self, user_id: i64) -> AppResult<Option<User>>;

    /// Find a user by external identifier.
    async fn find_user_by_uuid(&self, user_uuid: Uuid) -> AppResult<Option<User>>;

    /// Insert a user. Fails with a conflict if the email is taken.
    async fn create_user(&self, data: &NewUser) -> AppResult<User>;

    /// Insert a user and its first membership together.
    async fn create_member(
        &self,
        data: &NewUser,
        org_id: i64,
        role: OrgRole,
    ) -> AppResult<(User, Membership)>;

    /// Replace a user's password hash.
    async fn update_password_hash(&self, user_id: i64, password_hash: &str) -> AppResult<()>;

    /// Mark a user inactive. Returns `false` if the user does not exist.
    async fn deactivate_user(&self, user_id: i64) -> AppResult<bool>;

    // ── Memberships ──

    /// All memberships of a user.
    async fn memberships_for_user(&self, user_id: i64) -> AppResult<Vec<Membership>>;

    /// The membership of a user in one organization.
    async fn find_membership(&self, user_id: i64, org_id: i64) -> AppResult<Option<Membership>>;

    /// Add an existing user to an organization.
    async fn add_membership(&self, user_id: i64, org_id: i64, role: OrgRole)
    -> AppResult<Membership>;

    /// Remove a membership. Returns `false` if there was none.
    async fn remove_membership(&self, user_id: i64, org_id: i64) -> AppResult<bool>;

    /// Members of an organization.
    async fn list_org_members(&self, org_id: i64) -> AppResult<Vec<OrgMember>>;

    // ── Organizations ──

    /// Create an organization. Fails with a conflict if the name is taken.
    async fn create_organization(
        &self,
        name: &str,
        metadata: &serde_json::Value,
    ) -> AppResult<Organization>;

    /// Find an organization by primary key.
    async fn find_organization(&self, org_id: i64) -> AppResult<Option<Organization>>;

    /// List organizations, optionally restricted to `only`.
    async fn list_organizations(&self, only: Option<&[i64]>) -> AppResult<Vec<Organization>>;

    /// Replace an organization's metadata.
    async fn update_organization_metadata(
        &self,
        org_id: i64,
        metadata: &serde_json::Value,
    ) -> AppResult<Option<Organization>>;

    // ── Projects ──

    /// The organization owning a project.
    async fn project_org_id(&self, project_id: i64) -> AppResult<Option<i64>>;

    /// Create a project under `org_id`.
    async fn create_project(&self, org_id: i64, name: &str) -> AppResult<Project>;

    /// Projects of an organization, ordered by name.
    async fn list_projects(&self, org_id: i64) -> AppResult<Vec<Project>>;

    // ── Invites ──

    /// Expire every open invite for the same user and purpose, then insert
    /// `data`, as one step. Concurrent issuance for one user is serialized
    /// so at most one invite stays open.
    async fn issue_invite(&self, data: &NewInvite) -> AppResult<Invite>;

    /// Look an invite up by token hash.
    async fn find_invite_by_hash(
        &self,
        token_hash: &str,
        purpose: InvitePurpose,
    ) -> AppResult<Option<Invite>>;

    /// Consume a redeemable invite and activate its user with
    /// `password_hash`, as one step. Returns `false` if the invite was
    /// already used or has expired; nothing changes in that case.
    async fn redeem_invite(&self, invite_id: i64, password_hash: &str) -> AppResult<bool>;
}
