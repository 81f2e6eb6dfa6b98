//! Shared application state passed to all handlers.

use std::sync::Arc;
use std::time::Instant;

use tenantgate_auth::delivery::InviteDelivery;
use tenantgate_core::config::AppConfig;
use tenantgate_core::result::AppResult;
use tenantgate_database::store::IdentityStore;
use tenantgate_service::{IdentityService, OrganizationService};

/// Application state shared across all request handlers.
///
/// Cheap to clone; every field is behind an `Arc`.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ──
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// When the process started serving.
    pub started_at: Instant,

    // ── Infrastructure ──
    /// Identity store backing every service.
    pub store: Arc<dyn IdentityStore>,

    // ── Services ──
    /// Login, sessions and invitations.
    pub identity: Arc<IdentityService>,
    /// Organization administration.
    pub organizations: Arc<OrganizationService>,
}

impl AppState {
    /// Wire services over `store`, delivering invites through `delivery`.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn IdentityStore>,
        delivery: Arc<dyn InviteDelivery>,
    ) -> AppResult<Self> {
        let identity = Arc::new(IdentityService::new(
            &config,
            Arc::clone(&store),
            delivery,
        )?);
        let organizations = Arc::new(OrganizationService::new(Arc::clone(&identity)));

        Ok(Self {
            config: Arc::new(config),
            started_at: Instant::now(),
            store,
            identity,
            organizations,
        })
    }
}
