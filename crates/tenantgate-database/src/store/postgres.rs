//! PostgreSQL-backed identity store.

use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use tracing::debug;
use uuid::Uuid;

use tenantgate_core::error::{AppError, ErrorKind};
use tenantgate_core::result::AppResult;
use tenantgate_entity::invite::{Invite, InvitePurpose, NewInvite};
use tenantgate_entity::membership::{Membership, OrgMember, OrgRole};
use tenantgate_entity::organization::Organization;
use tenantgate_entity::project::Project;
use tenantgate_entity::user::{NewUser, User};

use super::IdentityStore;
use crate::connection::DatabasePool;
use crate::repositories::{
    InviteRepository, MembershipRepository, OrganizationRepository, ProjectRepository,
    UserRepository,
};

/// Identity store over the repositories in this crate.
#[derive(Debug, Clone)]
pub struct PgIdentityStore {
    db: DatabasePool,
    users: UserRepository,
    organizations: OrganizationRepository,
    memberships: MembershipRepository,
    projects: ProjectRepository,
    invites: InviteRepository,
}

impl PgIdentityStore {
    /// Build the store and its repositories on one pool.
    pub fn new(db: DatabasePool) -> Self {
        let pool = db.pool().clone();
        Self {
            users: UserRepository::new(pool.clone()),
            organizations: OrganizationRepository::new(pool.clone()),
            memberships: MembershipRepository::new(pool.clone()),
            projects: ProjectRepository::new(pool.clone()),
            invites: InviteRepository::new(pool),
            db,
        }
    }
}

fn commit_error(e: sqlx::Error) -> AppError {
    AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
}

async fn rollback(tx: Transaction<'static, Postgres>) -> AppResult<()> {
    tx.rollback().await.map_err(|e| {
        AppError::with_source(ErrorKind::Database, "Failed to roll back transaction", e)
    })
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.users.find_by_email(email).await
    }

    async fn find_user_by_id(&self, user_id: i64) -> AppResult<Option<User>> {
        self.users.find_by_id(user_id).await
    }

    async fn find_user_by_uuid(&self, user_uuid: Uuid) -> AppResult<Option<User>> {
        self.users.find_by_uuid(user_uuid).await
    }

    async fn create_user(&self, data: &NewUser) -> AppResult<User> {
        let mut tx = self.db.begin().await?;
        let user = UserRepository::create(&mut tx, data).await?;
        tx.commit().await.map_err(commit_error)?;
        Ok(user)
    }

    async fn create_member(
        &self,
        data: &NewUser,
        org_id: i64,
        role: OrgRole,
    ) -> AppResult<(User, Membership)> {
        let mut tx = self.db.begin().await?;
        let user = UserRepository::create(&mut tx, data).await?;
        let membership = MembershipRepository::create(&mut tx, user.user_id, org_id, role).await?;
        tx.commit().await.map_err(commit_error)?;
        Ok((user, membership))
    }

    async fn update_password_hash(&self, user_id: i64, password_hash: &str) -> AppResult<()> {
        self.users.update_password_hash(user_id, password_hash).await
    }

    async fn deactivate_user(&self, user_id: i64) -> AppResult<bool> {
        let mut tx = self.db.begin().await?;
        if !UserRepository::deactivate(&mut tx, user_id).await? {
            rollback(tx).await?;
            return Ok(false);
        }
        let revoked = InviteRepository::revoke_all_open(&mut tx, user_id).await?;
        tx.commit().await.map_err(commit_error)?;

        debug!(user_id = user_id, revoked = revoked, "User deactivated");
        Ok(true)
    }

    async fn memberships_for_user(&self, user_id: i64) -> AppResult<Vec<Membership>> {
        self.memberships.find_by_user(user_id).await
    }

    async fn find_membership(&self, user_id: i64, org_id: i64) -> AppResult<Option<Membership>> {
        self.memberships.find(user_id, org_id).await
    }

    async fn add_membership(
        &self,
        user_id: i64,
        org_id: i64,
        role: OrgRole,
    ) -> AppResult<Membership> {
        let mut conn = self.db.pool().acquire().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to acquire connection", e)
        })?;
        MembershipRepository::create(&mut conn, user_id, org_id, role).await
    }

    async fn remove_membership(&self, user_id: i64, org_id: i64) -> AppResult<bool> {
        self.memberships.delete(user_id, org_id).await
    }

    async fn list_org_members(&self, org_id: i64) -> AppResult<Vec<OrgMember>> {
        self.memberships.list_members(org_id).await
    }

    async fn create_organization(
        &self,
        name: &str,
        metadata: &serde_json::Value,
    ) -> AppResult<Organization> {
        self.organizations.create(name, metadata).await
    }

    async fn find_organization(&self, org_id: i64) -> AppResult<Option<Organization>> {
        self.organizations.find_by_id(org_id).await
    }

    async fn list_organizations(&self, only: Option<&[i64]>) -> AppResult<Vec<Organization>> {
        self.organizations.list(only).await
    }

    async fn update_organization_metadata(
        &self,
        org_id: i64,
        metadata: &serde_json::Value,
    ) -> AppResult<Option<Organization>> {
        self.organizations.update_metadata(org_id, metadata).await
    }

    async fn project_org_id(&self, project_id: i64) -> AppResult<Option<i64>> {
        self.projects.find_org_id(project_id).await
    }

    async fn create_project(&self, org_id: i64, name: &str) -> AppResult<Project> {
        self.projects.create(org_id, name).await
    }

    async fn list_projects(&self, org_id: i64) -> AppResult<Vec<Project>> {
        self.projects.list_by_org(org_id).await
    }

    async fn issue_invite(&self, data: &NewInvite) -> AppResult<Invite> {
        let mut tx = self.db.begin().await?;
        InviteRepository::lock_issuance(&mut tx, data.user_id, data.purpose).await?;
        let revoked = InviteRepository::revoke_open(&mut tx, data.user_id, data.purpose).await?;
        let invite = InviteRepository::create(&mut tx, data).await?;
        tx.commit().await.map_err(commit_error)?;

        debug!(
            user_id = data.user_id,
            invite_id = invite.invite_id,
            revoked = revoked,
            "Invite stored"
        );
        Ok(invite)
    }

    async fn find_invite_by_hash(
        &self,
        token_hash: &str,
        purpose: InvitePurpose,
    ) -> AppResult<Option<Invite>> {
        self.invites.find_by_hash(token_hash, purpose).await
    }

    async fn redeem_invite(&self, invite_id: i64, password_hash: &str) -> AppResult<bool> {
        let mut tx = self.db.begin().await?;
        let Some(user_id) = InviteRepository::consume(&mut tx, invite_id).await? else {
            rollback(tx).await?;
            return Ok(false);
        };
        if !UserRepository::activate_with_password(&mut tx, user_id, password_hash).await? {
            rollback(tx).await?;
            return Ok(false);
        }
        tx.commit().await.map_err(commit_error)?;
        Ok(true)
    }
}
