//! Shared test helpers for integration tests.
//!
//! The application runs against the in-memory identity store and an
//! in-memory invite outbox, so no database is needed.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use tenantgate_api::{AppState, build_app};
use tenantgate_auth::delivery::MemoryDelivery;
use tenantgate_auth::password::PasswordHasher;
use tenantgate_core::config::AppConfig;
use tenantgate_database::{IdentityStore, MemoryIdentityStore};
use tenantgate_entity::membership::OrgRole;
use tenantgate_entity::user::NewUser;

/// Password used for every seeded account.
pub const PASSWORD: &str = "correct-horse-battery";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state, for direct service calls
    pub state: AppState,
    /// Backing store, for direct seeding and inspection
    pub store: MemoryIdentityStore,
    /// Captured invite deliveries
    pub outbox: MemoryDelivery,
}

impl TestApp {
    /// Create a new test application
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Create a test application with a custom configuration
    pub fn with_config(config: AppConfig) -> Self {
        let store = MemoryIdentityStore::new();
        let outbox = MemoryDelivery::new();
        let state = AppState::new(
            config,
            Arc::new(store.clone()),
            Arc::new(outbox.clone()),
        )
        .expect("Failed to build state");

        Self {
            router: build_app(state.clone()),
            state,
            store,
            outbox,
        }
    }

    /// Seed an active super-admin and return their id
    pub async fn create_super_admin(&self, email: &str) -> i64 {
        self.state
            .identity
            .bootstrap_super_admin(email, PASSWORD)
            .await
            .expect("Failed to create super admin")
            .user_id
    }

    /// Seed an organization and return its id
    pub async fn create_org(&self, name: &str) -> i64 {
        self.store
            .create_organization(name, &serde_json::json!({}))
            .await
            .expect("Failed to create org")
            .org_id
    }

    /// Seed an active member of `org_id` and return their id
    pub async fn create_member(&self, email: &str, org_id: i64, role: OrgRole) -> i64 {
        let digest = PasswordHasher::new()
            .hash_password(PASSWORD)
            .expect("Failed to hash password");
        let user = self
            .store
            .create_user(&NewUser::active(email, digest, false))
            .await
            .expect("Failed to create user");
        self.store
            .add_membership(user.user_id, org_id, role)
            .await
            .expect("Failed to add membership");
        user.user_id
    }

    /// Log in and return the access token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/login",
                Some(serde_json::json!({ "email": email, "password": password })),
                None,
            )
            .await;

        assert_eq!(response.status, StatusCode::OK, "login failed: {:?}", response.body);
        response.data()["access_token"]
            .as_str()
            .expect("No access_token in response")
            .to_string()
    }

    /// Wait for the `count`-th invite sent to `email` and return its raw token
    pub async fn invite_token(&self, email: &str, count: usize) -> String {
        self.outbox
            .wait_for_token(email, count, Duration::from_secs(2))
            .await
            .expect("Invite was not delivered")
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Configuration shared by the integration tests
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.jwt_secret = "integration-test-secret".to_string();
    config.invite.link_base_url = "https://gate.test".to_string();
    config
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `data` member of a success envelope
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// The `error` code of an error body
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}
