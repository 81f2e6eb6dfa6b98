//! Tenant administration: organizations, their users, and onboarding.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use tenantgate_auth::rbac::{AccessControl, RoleRequirement};
use tenantgate_core::error::AppError;
use tenantgate_core::result::AppResult;
use tenantgate_database::store::IdentityStore;
use tenantgate_entity::invite::InvitePurpose;
use tenantgate_entity::membership::{Membership, OrgMember, OrgRole};
use tenantgate_entity::organization::Organization;
use tenantgate_entity::project::Project;
use tenantgate_entity::user::{NewUser, User};

use crate::context::Principal;
use crate::identity::IdentityService;

/// A user created inside an organization and sent an invite.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionedUser {
    /// The new, still inactive user.
    pub user: User,
    /// Its membership in the target organization.
    pub membership: Membership,
    /// Expiry of the delivered invite.
    pub invite_expires_at: DateTime<Utc>,
}

/// Organization and membership management on behalf of a principal.
#[derive(Debug, Clone)]
pub struct OrganizationService {
    /// Identity store.
    store: Arc<dyn IdentityStore>,
    /// Invite issuance.
    identity: Arc<IdentityService>,
    /// Access evaluator.
    access: AccessControl,
}

impl OrganizationService {
    /// Creates a new organization service.
    pub fn new(identity: Arc<IdentityService>) -> Self {
        Self {
            store: Arc::clone(identity.store()),
            access: *identity.access(),
            identity,
        }
    }

    /// Create an organization (super-admin).
    pub async fn create_org(
        &self,
        ctx: &Principal,
        name: &str,
        metadata: Option<serde_json::Value>,
    ) -> AppResult<Organization> {
        self.access.require_super_admin(ctx)?;

        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Organization name must not be empty"));
        }
        let metadata = metadata.unwrap_or_else(|| serde_json::json!({}));
        ensure_object(&metadata)?;

        let org = self.store.create_organization(name, &metadata).await?;
        info!(org_id = org.org_id, name = %org.name, actor = ctx.user_id, "Organization created");
        Ok(org)
    }

    /// Organizations visible to `ctx`: all for a super-admin, otherwise the
    /// ones the principal belongs to.
    pub async fn list_orgs(&self, ctx: &Principal) -> AppResult<Vec<Organization>> {
        if ctx.is_super_admin {
            return self.store.list_organizations(None).await;
        }
        let ids = self.access.org_ids(ctx);
        self.store.list_organizations(Some(&ids)).await
    }

    /// Replace an organization's metadata (org admin).
    pub async fn update_metadata(
        &self,
        ctx: &Principal,
        org_id: i64,
        metadata: serde_json::Value,
    ) -> AppResult<Organization> {
        self.access.require(ctx, org_id, RoleRequirement::Admin)?;
        ensure_object(&metadata)?;

        let org = self
            .store
            .update_organization_metadata(org_id, &metadata)
            .await?
            .ok_or_else(|| AppError::not_found("Organization not found"))?;

        info!(org_id = org_id, actor = ctx.user_id, "Organization metadata updated");
        Ok(org)
    }

    /// Members of an organization (org admin).
    pub async fn list_org_users(&self, ctx: &Principal, org_id: i64) -> AppResult<Vec<OrgMember>> {
        self.access.require(ctx, org_id, RoleRequirement::Admin)?;
        self.require_org(org_id).await?;
        self.store.list_org_members(org_id).await
    }

    /// Create an inactive user in `org_id` and send a password-setup invite.
    ///
    /// Creating an org `ADMIN` needs a super-admin; creating a `USER` needs
    /// an admin of that organization.
    pub async fn provision_user(
        &self,
        ctx: &Principal,
        org_id: i64,
        email: &str,
        role: OrgRole,
    ) -> AppResult<ProvisionedUser> {
        match role {
            OrgRole::Admin => self.access.require_super_admin(ctx)?,
            OrgRole::User => self.access.require(ctx, org_id, RoleRequirement::Admin)?,
        }

        let email = email.trim();
        if !email.contains('@') {
            return Err(AppError::validation("A valid email address is required"));
        }
        self.require_org(org_id).await?;

        let (user, membership) = self
            .store
            .create_member(&NewUser::pending(email), org_id, role)
            .await?;

        info!(
            user_id = user.user_id,
            org_id = org_id,
            role = %role,
            actor = ctx.user_id,
            "User provisioned"
        );

        let issued = self
            .identity
            .issue_invite(user.user_id, InvitePurpose::SetPassword, Some(ctx.user_id))
            .await?;

        Ok(ProvisionedUser {
            user,
            membership,
            invite_expires_at: issued.expires_at,
        })
    }

    /// Remove a user from an organization (org admin, never oneself).
    pub async fn remove_user(&self, ctx: &Principal, org_id: i64, user_id: i64) -> AppResult<()> {
        self.access.require(ctx, org_id, RoleRequirement::Admin)?;
        if user_id == ctx.user_id {
            return Err(AppError::validation(
                "You cannot remove yourself from an organization",
            ));
        }

        if !self.store.remove_membership(user_id, org_id).await? {
            return Err(AppError::not_found("User is not a member of this organization"));
        }

        info!(user_id = user_id, org_id = org_id, actor = ctx.user_id, "Member removed");
        Ok(())
    }

    /// Re-send the onboarding invite of a still inactive member.
    pub async fn resend_invite(
        &self,
        ctx: &Principal,
        org_id: i64,
        user_id: i64,
    ) -> AppResult<DateTime<Utc>> {
        self.access.require(ctx, org_id, RoleRequirement::Admin)?;

        if self.store.find_membership(user_id, org_id).await?.is_none() {
            return Err(AppError::not_found("User is not a member of this organization"));
        }

        let issued = self
            .identity
            .issue_invite(user_id, InvitePurpose::SetPassword, Some(ctx.user_id))
            .await?;
        Ok(issued.expires_at)
    }

    /// Deactivate a user (super-admin). The row and its hash are kept.
    pub async fn deactivate_user(&self, ctx: &Principal, user_id: i64) -> AppResult<()> {
        self.access.require_super_admin(ctx)?;
        if user_id == ctx.user_id {
            return Err(AppError::validation("You cannot deactivate yourself"));
        }

        if !self.store.deactivate_user(user_id).await? {
            return Err(AppError::not_found("User not found"));
        }

        info!(user_id = user_id, actor = ctx.user_id, "User deactivated");
        Ok(())
    }

    /// Projects of an organization (any member).
    pub async fn list_projects(&self, ctx: &Principal, org_id: i64) -> AppResult<Vec<Project>> {
        self.access.require(ctx, org_id, RoleRequirement::AnyMembership)?;
        self.require_org(org_id).await?;
        self.store.list_projects(org_id).await
    }

    /// Create a project in an organization (org admin).
    pub async fn create_project(
        &self,
        ctx: &Principal,
        org_id: i64,
        name: &str,
    ) -> AppResult<Project> {
        self.access.require(ctx, org_id, RoleRequirement::Admin)?;

        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Project name must not be empty"));
        }
        self.require_org(org_id).await?;

        let project = self.store.create_project(org_id, name).await?;
        info!(
            project_id = project.project_id,
            org_id = org_id,
            actor = ctx.user_id,
            "Project created"
        );
        Ok(project)
    }

    /// Require `ctx` to hold `requirement` in the organization owning
    /// `project_id`. Returns that organization's id.
    pub async fn authorize_project(
        &self,
        ctx: &Principal,
        project_id: i64,
        requirement: RoleRequirement,
    ) -> AppResult<i64> {
        let org_id = self
            .store
            .project_org_id(project_id)
            .await?
            .ok_or_else(|| AppError::not_found("Project not found"))?;
        self.access.require(ctx, org_id, requirement)?;
        Ok(org_id)
    }

    async fn require_org(&self, org_id: i64) -> AppResult<Organization> {
        self.store
            .find_organization(org_id)
            .await?
            .ok_or_else(|| AppError::not_found("Organization not found"))
    }
}

fn ensure_object(metadata: &serde_json::Value) -> AppResult<()> {
    if metadata.is_object() {
        Ok(())
    } else {
        Err(AppError::validation("Organization metadata must be a JSON object"))
    }
}
