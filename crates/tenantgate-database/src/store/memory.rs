//! In-memory identity store using a Tokio mutex.
//!
//! Backs unit and integration tests and single-process tooling. Every
//! operation takes the one lock, so multi-row steps are trivially atomic.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use tenantgate_core::error::AppError;
use tenantgate_core::result::AppResult;
use tenantgate_entity::invite::{Invite, InvitePurpose, NewInvite};
use tenantgate_entity::membership::{Membership, OrgMember, OrgRole};
use tenantgate_entity::organization::Organization;
use tenantgate_entity::project::Project;
use tenantgate_entity::user::{NewUser, User, normalize_email};

use super::IdentityStore;

#[derive(Debug, Default)]
struct InnerState {
    users: Vec<User>,
    organizations: Vec<Organization>,
    memberships: Vec<Membership>,
    projects: Vec<Project>,
    invites: Vec<Invite>,
    next_id: i64,
}

impl InnerState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn user_mut(&mut self, user_id: i64) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.user_id == user_id)
    }

    fn insert_user(&mut self, data: &NewUser) -> AppResult<User> {
        let email = data.email.trim();
        let key = normalize_email(email);
        if self.users.iter().any(|u| normalize_email(&u.email) == key) {
            return Err(AppError::conflict(format!(
                "Email '{email}' is already registered"
            )));
        }

        let user = User {
            user_id: self.next_id(),
            user_uuid: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: data.password_hash.clone(),
            is_super_admin: data.is_super_admin,
            is_active: data.is_active(),
            created_at: Utc::now(),
        };
        self.users.push(user.clone());
        Ok(user)
    }

    fn insert_membership(&mut self, user_id: i64, org_id: i64, role: OrgRole) -> AppResult<Membership> {
        if !self.organizations.iter().any(|o| o.org_id == org_id) {
            return Err(AppError::not_found("Organization not found"));
        }
        if self
            .memberships
            .iter()
            .any(|m| m.user_id == user_id && m.org_id == org_id)
        {
            return Err(AppError::conflict(
                "User is already a member of this organization",
            ));
        }

        let membership = Membership {
            membership_id: self.next_id(),
            user_id,
            org_id,
            role,
        };
        self.memberships.push(membership.clone());
        Ok(membership)
    }
}

/// Identity store held entirely in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryIdentityStore {
    state: Arc<Mutex<InnerState>>,
}

impl MemoryIdentityStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every invite ever issued to a user, oldest first.
    pub async fn invites_for_user(&self, user_id: i64) -> Vec<Invite> {
        let state = self.state.lock().await;
        state
            .invites
            .iter()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let key = normalize_email(email);
        let state = self.state.lock().await;
        Ok(state
            .users
            .iter()
            .find(|u| normalize_email(&u.email) == key)
            .cloned())
    }

    async fn find_user_by_id(&self, user_id: i64) -> AppResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.iter().find(|u| u.user_id == user_id).cloned())
    }

    async fn find_user_by_uuid(&self, user_uuid: Uuid) -> AppResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.iter().find(|u| u.user_uuid == user_uuid).cloned())
    }

    async fn create_user(&self, data: &NewUser) -> AppResult<User> {
        let mut state = self.state.lock().await;
        state.insert_user(data)
    }

    async fn create_member(
        &self,
        data: &NewUser,
        org_id: i64,
        role: OrgRole,
    ) -> AppResult<(User, Membership)> {
        let mut state = self.state.lock().await;
        if !state.organizations.iter().any(|o| o.org_id == org_id) {
            return Err(AppError::not_found("Organization not found"));
        }
        let user = state.insert_user(data)?;
        let membership = state.insert_membership(user.user_id, org_id, role)?;
        Ok((user, membership))
    }

    async fn update_password_hash(&self, user_id: i64, password_hash: &str) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if let Some(user) = state.user_mut(user_id) {
            user.password_hash = Some(password_hash.to_string());
        }
        Ok(())
    }

    async fn deactivate_user(&self, user_id: i64) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let Some(user) = state.user_mut(user_id) else {
            return Ok(false);
        };
        user.is_active = false;

        let now = Utc::now();
        for open in state
            .invites
            .iter_mut()
            .filter(|i| i.user_id == user_id && i.is_redeemable_at(now))
        {
            open.expires_at = now;
        }
        Ok(true)
    }

    async fn memberships_for_user(&self, user_id: i64) -> AppResult<Vec<Membership>> {
        let state = self.state.lock().await;
        let mut memberships: Vec<Membership> = state
            .memberships
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect();
        memberships.sort_by_key(|m| m.org_id);
        Ok(memberships)
    }

    async fn find_membership(&self, user_id: i64, org_id: i64) -> AppResult<Option<Membership>> {
        let state = self.state.lock().await;
        Ok(state
            .memberships
            .iter()
            .find(|m| m.user_id == user_id && m.org_id == org_id)
            .cloned())
    }

    async fn add_membership(
        &self,
        user_id: i64,
        org_id: i64,
        role: OrgRole,
    ) -> AppResult<Membership> {
        let mut state = self.state.lock().await;
        if !state.users.iter().any(|u| u.user_id == user_id) {
            return Err(AppError::not_found("User not found"));
        }
        state.insert_membership(user_id, org_id, role)
    }

    async fn remove_membership(&self, user_id: i64, org_id: i64) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let before = state.memberships.len();
        state
            .memberships
            .retain(|m| !(m.user_id == user_id && m.org_id == org_id));
        Ok(state.memberships.len() < before)
    }

    async fn list_org_members(&self, org_id: i64) -> AppResult<Vec<OrgMember>> {
        let state = self.state.lock().await;
        let mut members: Vec<OrgMember> = state
            .memberships
            .iter()
            .filter(|m| m.org_id == org_id)
            .filter_map(|m| {
                state
                    .users
                    .iter()
                    .find(|u| u.user_id == m.user_id)
                    .map(|u| OrgMember {
                        user_id: u.user_id,
                        user_uuid: u.user_uuid,
                        email: u.email.clone(),
                        is_active: u.is_active,
                        role: m.role,
                    })
            })
            .collect();
        members.sort_by_key(|m| m.user_id);
        Ok(members)
    }

    async fn create_organization(
        &self,
        name: &str,
        metadata: &serde_json::Value,
    ) -> AppResult<Organization> {
        let mut state = self.state.lock().await;
        if state.organizations.iter().any(|o| o.name == name) {
            return Err(AppError::conflict(format!(
                "Organization '{name}' already exists"
            )));
        }
        let org = Organization {
            org_id: state.next_id(),
            org_uuid: Uuid::new_v4(),
            name: name.to_string(),
            metadata: metadata.clone(),
            created_at: Utc::now(),
        };
        state.organizations.push(org.clone());
        Ok(org)
    }

    async fn find_organization(&self, org_id: i64) -> AppResult<Option<Organization>> {
        let state = self.state.lock().await;
        Ok(state
            .organizations
            .iter()
            .find(|o| o.org_id == org_id)
            .cloned())
    }

    async fn list_organizations(&self, only: Option<&[i64]>) -> AppResult<Vec<Organization>> {
        let state = self.state.lock().await;
        Ok(state
            .organizations
            .iter()
            .filter(|o| only.is_none_or(|ids| ids.contains(&o.org_id)))
            .cloned()
            .collect())
    }

    async fn update_organization_metadata(
        &self,
        org_id: i64,
        metadata: &serde_json::Value,
    ) -> AppResult<Option<Organization>> {
        let mut state = self.state.lock().await;
        Ok(state
            .organizations
            .iter_mut()
            .find(|o| o.org_id == org_id)
            .map(|org| {
                org.metadata = metadata.clone();
                org.clone()
            }))
    }

    async fn project_org_id(&self, project_id: i64) -> AppResult<Option<i64>> {
        let state = self.state.lock().await;
        Ok(state
            .projects
            .iter()
            .find(|p| p.project_id == project_id)
            .map(|p| p.project_org_id))
    }

    async fn create_project(&self, org_id: i64, name: &str) -> AppResult<Project> {
        let mut state = self.state.lock().await;
        if !state.organizations.iter().any(|o| o.org_id == org_id) {
            return Err(AppError::not_found("Organization not found"));
        }
        let project = Project {
            project_id: state.next_id(),
            project_name: name.to_string(),
            project_org_id: org_id,
            created_at: Utc::now(),
        };
        state.projects.push(project.clone());
        Ok(project)
    }

    async fn list_projects(&self, org_id: i64) -> AppResult<Vec<Project>> {
        let state = self.state.lock().await;
        let mut projects: Vec<Project> = state
            .projects
            .iter()
            .filter(|p| p.project_org_id == org_id)
            .cloned()
            .collect();
        projects.sort_by(|a, b| {
            a.project_name
                .cmp(&b.project_name)
                .then(a.project_id.cmp(&b.project_id))
        });
        Ok(projects)
    }

    async fn issue_invite(&self, data: &NewInvite) -> AppResult<Invite> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let purpose = data.purpose.as_str();

        for open in state.invites.iter_mut().filter(|i| {
            i.user_id == data.user_id && i.purpose == purpose && i.is_redeemable_at(now)
        }) {
            open.expires_at = now;
        }

        let invite = Invite {
            invite_id: state.next_id(),
            user_id: data.user_id,
            token_hash: data.token_hash.clone(),
            purpose: purpose.to_string(),
            expires_at: data.expires_at,
            used_at: None,
            created_at: now,
            created_by_user_id: data.created_by_user_id,
        };
        state.invites.push(invite.clone());
        Ok(invite)
    }

    async fn find_invite_by_hash(
        &self,
        token_hash: &str,
        purpose: InvitePurpose,
    ) -> AppResult<Option<Invite>> {
        let state = self.state.lock().await;
        Ok(state
            .invites
            .iter()
            .find(|i| i.token_hash == token_hash && i.purpose == purpose.as_str())
            .cloned())
    }

    async fn redeem_invite(&self, invite_id: i64, password_hash: &str) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let now = Utc::now();

        let Some(user_id) = state
            .invites
            .iter()
            .find(|i| i.invite_id == invite_id && i.is_redeemable_at(now))
            .map(|i| i.user_id)
        else {
            return Ok(false);
        };
        let Some(user) = state.user_mut(user_id).filter(|u| u.is_pending()) else {
            return Ok(false);
        };
        user.password_hash = Some(password_hash.to_string());
        user.is_active = true;

        if let Some(invite) = state.invites.iter_mut().find(|i| i.invite_id == invite_id) {
            invite.used_at = Some(now);
        }
        Ok(true)
    }
}
