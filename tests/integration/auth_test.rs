//! Integration tests for login and the request authentication gate.

mod helpers;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;

use helpers::{PASSWORD, TestApp};
use tenantgate_auth::jwt::JwtEncoder;
use tenantgate_database::IdentityStore;
use tenantgate_entity::membership::OrgRole;

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::new();
    let org = app.create_org("acme").await;
    app.create_member("alice@acme.test", org, OrgRole::User).await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "alice@acme.test", "password": PASSWORD })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert!(response.data()["access_token"].is_string());
    assert_eq!(response.data()["token_type"], "bearer");
    assert!(response.data()["expires_at"].is_string());
}

#[tokio::test]
async fn test_login_email_is_case_insensitive() {
    let app = TestApp::new();
    let org = app.create_org("acme").await;
    app.create_member("bob@acme.test", org, OrgRole::User).await;

    let token = app.login("  Bob@ACME.test ", PASSWORD).await;
    assert!(!token.is_empty());
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new();
    let org = app.create_org("acme").await;
    let carol = app.create_member("carol@acme.test", org, OrgRole::User).await;
    app.create_member("dave@acme.test", org, OrgRole::User).await;
    app.store.deactivate_user(carol).await.unwrap();

    let wrong_password = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "dave@acme.test", "password": "not-the-password" })),
            None,
        )
        .await;
    let unknown_email = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "nobody@acme.test", "password": PASSWORD })),
            None,
        )
        .await;
    let inactive = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "carol@acme.test", "password": PASSWORD })),
            None,
        )
        .await;

    for response in [&wrong_password, &unknown_email, &inactive] {
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    }
    assert_eq!(wrong_password.body, unknown_email.body);
    assert_eq!(wrong_password.body, inactive.body);
    assert_eq!(wrong_password.body["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_pending_user_cannot_log_in() {
    let app = TestApp::new();
    let org = app.create_org("acme").await;
    app.create_super_admin("root@gate.test").await;
    let root = app.login("root@gate.test", PASSWORD).await;

    let response = app
        .request(
            "POST",
            &format!("/api/orgs/{org}/admins"),
            Some(json!({ "email": "pending@acme.test" })),
            Some(&root),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "pending@acme.test", "password": "" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "pending@acme.test", "password": PASSWORD })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_returns_principal() {
    let app = TestApp::new();
    let org = app.create_org("acme").await;
    let erin = app.create_member("erin@acme.test", org, OrgRole::Admin).await;
    let token = app.login("erin@acme.test", PASSWORD).await;

    let response = app.request("GET", "/api/auth/me", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["user_id"], erin);
    assert_eq!(response.data()["is_super_admin"], false);
    assert_eq!(response.data()["orgs"][0]["org_id"], org);
    assert_eq!(response.data()["orgs"][0]["role"], "ADMIN");
}

#[tokio::test]
async fn test_me_rejects_missing_and_forged_tokens() {
    let app = TestApp::new();

    let missing = app.request("GET", "/api/auth/me", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);

    let garbage = app
        .request("GET", "/api/auth/me", None, Some("not.a.token"))
        .await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
    assert_eq!(garbage.body["message"], "Invalid or expired token");

    let org = app.create_org("acme").await;
    app.create_member("frank@acme.test", org, OrgRole::User).await;
    let user = app
        .store
        .find_user_by_email("frank@acme.test")
        .await
        .unwrap()
        .unwrap();

    let mut other = helpers::test_config();
    other.auth.jwt_secret = "some-other-secret".to_string();
    let forged = JwtEncoder::new(&other.auth)
        .unwrap()
        .issue(&user, &[])
        .unwrap();

    let response = app
        .request("GET", "/api/auth/me", None, Some(&forged.token))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body, garbage.body);
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let app = TestApp::new();
    let org = app.create_org("acme").await;
    app.create_member("gina@acme.test", org, OrgRole::User).await;
    let user = app
        .store
        .find_user_by_email("gina@acme.test")
        .await
        .unwrap()
        .unwrap();

    let encoder = JwtEncoder::new(&helpers::test_config().auth).unwrap();
    let stale = encoder
        .issue_at(&user, &[], Utc::now() - Duration::hours(1))
        .unwrap();

    let response = app
        .request("GET", "/api/auth/me", None, Some(&stale.token))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Invalid or expired token");
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "ok");
}
