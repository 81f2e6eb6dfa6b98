//! Integration tests for the invite lifecycle over HTTP.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::{PASSWORD, TestApp};

const NEW_PASSWORD: &str = "first-password-42";

/// Seed a super-admin and an org, provision an org admin, and return
/// (app, super-admin token, org id, new user id).
async fn provisioned_admin(email: &str) -> (TestApp, String, i64, i64) {
    let app = TestApp::new();
    app.create_super_admin("root@gate.test").await;
    let root = app.login("root@gate.test", PASSWORD).await;
    let org = app.create_org("acme").await;

    let response = app
        .request(
            "POST",
            &format!("/api/orgs/{org}/admins"),
            Some(json!({ "email": email })),
            Some(&root),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    let user_id = response.data()["user_id"].as_i64().unwrap();

    (app, root, org, user_id)
}

async fn verify(app: &TestApp, token: &str) -> serde_json::Value {
    let response = app
        .request("GET", &format!("/api/invites/verify?token={token}"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    response.data().clone()
}

async fn redeem(app: &TestApp, token: &str, password: &str) -> helpers::TestResponse {
    app.request(
        "POST",
        "/api/invites/redeem",
        Some(json!({ "token": token, "password": password })),
        None,
    )
    .await
}

#[tokio::test]
async fn test_onboarding_end_to_end() {
    let (app, _root, org, user_id) = provisioned_admin("hana@acme.test").await;

    let sent = app.outbox.sent().await;
    assert_eq!(sent.len(), 1);
    assert!(sent[0].link.starts_with("https://gate.test/invite/accept?token="));

    let token = app.invite_token("hana@acme.test", 1).await;
    let verdict = verify(&app, &token).await;
    assert_eq!(verdict["status"], "valid");
    assert!(verdict["expires_at"].is_string());

    let response = redeem(&app, &token, NEW_PASSWORD).await;
    assert_eq!(response.status, StatusCode::OK);

    let invites = app.store.invites_for_user(user_id).await;
    assert_eq!(invites.len(), 1);
    assert!(invites[0].used_at.is_some());
    assert_eq!(verify(&app, &token).await, json!({ "status": "invalid" }));

    let session = app.login("hana@acme.test", NEW_PASSWORD).await;
    let me = app.request("GET", "/api/auth/me", None, Some(&session)).await;
    assert_eq!(me.data()["user_id"], user_id);
    assert_eq!(me.data()["orgs"][0]["org_id"], org);
    assert_eq!(me.data()["orgs"][0]["role"], "ADMIN");
    assert_eq!(me.data()["admin_org_ids"], json!([org]));
}

#[tokio::test]
async fn test_deactivated_user_stays_deactivated() {
    let (app, root, org, user_id) = provisioned_admin("gone@acme.test").await;
    let token = app.invite_token("gone@acme.test", 1).await;
    assert_eq!(redeem(&app, &token, NEW_PASSWORD).await.status, StatusCode::OK);

    let deactivated = app
        .request(
            "POST",
            &format!("/api/users/{user_id}/deactivate"),
            None,
            Some(&root),
        )
        .await;
    assert_eq!(deactivated.status, StatusCode::OK);

    let resend = app
        .request(
            "POST",
            &format!("/api/orgs/{org}/users/{user_id}/invite"),
            None,
            Some(&root),
        )
        .await;
    assert_eq!(resend.status, StatusCode::CONFLICT);
    assert_eq!(app.store.invites_for_user(user_id).await.len(), 1);

    let login = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "gone@acme.test", "password": NEW_PASSWORD })),
            None,
        )
        .await;
    assert_eq!(login.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invite_is_single_use() {
    let (app, _root, _org, _user) = provisioned_admin("ivan@acme.test").await;
    let token = app.invite_token("ivan@acme.test", 1).await;

    assert_eq!(redeem(&app, &token, NEW_PASSWORD).await.status, StatusCode::OK);

    let second = redeem(&app, &token, "another-password-1").await;
    assert_eq!(second.status, StatusCode::UNAUTHORIZED);
    assert_eq!(second.body["message"], "Invalid or expired token");

    assert_eq!(verify(&app, &token).await["status"], "invalid");

    // The first password is still the one that works.
    app.login("ivan@acme.test", NEW_PASSWORD).await;
}

#[tokio::test]
async fn test_unknown_token_looks_like_used_token() {
    let (app, _root, _org, _user) = provisioned_admin("jane@acme.test").await;
    let token = app.invite_token("jane@acme.test", 1).await;
    redeem(&app, &token, NEW_PASSWORD).await;

    let used = verify(&app, &token).await;
    let unknown = verify(&app, "definitely-not-a-real-token").await;
    let empty = verify(&app, "").await;

    assert_eq!(used, unknown);
    assert_eq!(used, empty);
    assert_eq!(used, json!({ "status": "invalid" }));
}

#[tokio::test]
async fn test_weak_password_leaves_invite_usable() {
    let (app, _root, _org, _user) = provisioned_admin("kim@acme.test").await;
    let token = app.invite_token("kim@acme.test", 1).await;

    let response = redeem(&app, &token, "short").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");

    assert_eq!(verify(&app, &token).await["status"], "valid");
    assert_eq!(redeem(&app, &token, NEW_PASSWORD).await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_resend_revokes_previous_invite() {
    let (app, root, org, user_id) = provisioned_admin("leo@acme.test").await;
    let first = app.invite_token("leo@acme.test", 1).await;

    let response = app
        .request(
            "POST",
            &format!("/api/orgs/{org}/users/{user_id}/invite"),
            None,
            Some(&root),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.data()["user_id"], user_id);

    let second = app.invite_token("leo@acme.test", 2).await;
    assert_ne!(first, second);

    assert_eq!(verify(&app, &first).await["status"], "invalid");
    assert_eq!(verify(&app, &second).await["status"], "valid");
    assert_eq!(
        redeem(&app, &first, NEW_PASSWORD).await.status,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(redeem(&app, &second, NEW_PASSWORD).await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_resend_to_active_user_conflicts() {
    let (app, root, org, user_id) = provisioned_admin("mia@acme.test").await;
    let token = app.invite_token("mia@acme.test", 1).await;
    redeem(&app, &token, NEW_PASSWORD).await;

    let response = app
        .request(
            "POST",
            &format!("/api/orgs/{org}/users/{user_id}/invite"),
            None,
            Some(&root),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_only_token_hash_is_stored() {
    let (app, _root, _org, user_id) = provisioned_admin("noah@acme.test").await;
    let token = app.invite_token("noah@acme.test", 1).await;

    let invites = app.store.invites_for_user(user_id).await;
    assert_eq!(invites.len(), 1);
    assert_ne!(invites[0].token_hash, token);
    assert!(!invites[0].token_hash.contains(&token));
    assert_eq!(invites[0].purpose, "SET_PASSWORD");
}

#[tokio::test]
async fn test_concurrent_redeem_has_one_winner() {
    let (app, _root, _org, _user) = provisioned_admin("olga@acme.test").await;
    let token = app.invite_token("olga@acme.test", 1).await;

    let (a, b) = tokio::join!(
        redeem(&app, &token, "password-from-a-1"),
        redeem(&app, &token, "password-from-b-2"),
    );

    let mut statuses = [a.status, b.status];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::OK, StatusCode::UNAUTHORIZED]);
}
