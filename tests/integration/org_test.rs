//! Integration tests for organization administration and org-scoped
//! authorization.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::{PASSWORD, TestApp};
use tenantgate_database::IdentityStore;
use tenantgate_entity::membership::OrgRole;

/// Two organizations, each with one admin and one plain user.
struct Tenants {
    app: TestApp,
    root: String,
    org5: i64,
    org6: i64,
    admin5: String,
    admin5_id: i64,
    user5: String,
    user5_id: i64,
    admin6: String,
}

async fn tenants() -> Tenants {
    let app = TestApp::new();
    app.create_super_admin("root@gate.test").await;
    let org5 = app.create_org("org-five").await;
    let org6 = app.create_org("org-six").await;
    let admin5_id = app.create_member("admin@five.test", org5, OrgRole::Admin).await;
    let user5_id = app.create_member("user@five.test", org5, OrgRole::User).await;
    app.create_member("admin@six.test", org6, OrgRole::Admin).await;

    Tenants {
        root: app.login("root@gate.test", PASSWORD).await,
        admin5: app.login("admin@five.test", PASSWORD).await,
        user5: app.login("user@five.test", PASSWORD).await,
        admin6: app.login("admin@six.test", PASSWORD).await,
        app,
        org5,
        org6,
        admin5_id,
        user5_id,
    }
}

#[tokio::test]
async fn test_create_org_requires_super_admin() {
    let t = tenants().await;

    let response = t
        .app
        .request(
            "POST",
            "/api/orgs",
            Some(json!({ "name": "globex", "metadata": { "tier": "gold" } })),
            Some(&t.root),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.data()["name"], "globex");
    assert_eq!(response.data()["metadata"]["tier"], "gold");

    let duplicate = t
        .app
        .request("POST", "/api/orgs", Some(json!({ "name": "globex" })), Some(&t.root))
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let by_admin = t
        .app
        .request("POST", "/api/orgs", Some(json!({ "name": "initech" })), Some(&t.admin5))
        .await;
    assert_eq!(by_admin.status, StatusCode::FORBIDDEN);

    let anonymous = t
        .app
        .request("POST", "/api/orgs", Some(json!({ "name": "initech" })), None)
        .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_orgs_is_filtered_by_membership() {
    let t = tenants().await;

    let all = t.app.request("GET", "/api/orgs", None, Some(&t.root)).await;
    assert_eq!(all.status, StatusCode::OK);
    assert_eq!(all.data().as_array().unwrap().len(), 2);

    let mine = t.app.request("GET", "/api/orgs", None, Some(&t.user5)).await;
    let orgs = mine.data().as_array().unwrap();
    assert_eq!(orgs.len(), 1);
    assert_eq!(orgs[0]["org_id"], t.org5);
}

#[tokio::test]
async fn test_update_metadata_scoped_to_org_admin() {
    let t = tenants().await;
    let path = format!("/api/orgs/{}/metadata", t.org5);
    let body = json!({ "metadata": { "plan": "pro" } });

    let ok = t.app.request("PUT", &path, Some(body.clone()), Some(&t.admin5)).await;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(ok.data()["metadata"]["plan"], "pro");

    let by_root = t.app.request("PUT", &path, Some(body.clone()), Some(&t.root)).await;
    assert_eq!(by_root.status, StatusCode::OK);

    let by_user = t.app.request("PUT", &path, Some(body.clone()), Some(&t.user5)).await;
    assert_eq!(by_user.status, StatusCode::FORBIDDEN);

    let by_other_admin = t.app.request("PUT", &path, Some(body), Some(&t.admin6)).await;
    assert_eq!(by_other_admin.status, StatusCode::FORBIDDEN);

    let not_object = t
        .app
        .request("PUT", &path, Some(json!({ "metadata": [1, 2] })), Some(&t.admin5))
        .await;
    assert_eq!(not_object.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_org_users() {
    let t = tenants().await;
    let path = format!("/api/orgs/{}/users", t.org5);

    let response = t.app.request("GET", &path, None, Some(&t.admin5)).await;
    assert_eq!(response.status, StatusCode::OK);
    let members = response.data().as_array().unwrap();
    assert_eq!(members.len(), 2);
    assert!(members.iter().any(|m| m["email"] == "user@five.test" && m["role"] == "USER"));
    assert!(members.iter().all(|m| m.get("password_hash").is_none()));

    let by_user = t.app.request("GET", &path, None, Some(&t.user5)).await;
    assert_eq!(by_user.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_of_one_org_cannot_provision_into_another() {
    let t = tenants().await;

    let own = t
        .app
        .request(
            "POST",
            &format!("/api/orgs/{}/users", t.org5),
            Some(json!({ "email": "new@five.test" })),
            Some(&t.admin5),
        )
        .await;
    assert_eq!(own.status, StatusCode::CREATED, "{:?}", own.body);
    assert_eq!(own.data()["role"], "USER");
    assert_eq!(own.data()["org_id"], t.org5);
    assert_eq!(t.app.outbox.count_for("new@five.test").await, 1);

    let other = t
        .app
        .request(
            "POST",
            &format!("/api/orgs/{}/users", t.org6),
            Some(json!({ "email": "sneaky@six.test" })),
            Some(&t.admin5),
        )
        .await;
    assert_eq!(other.status, StatusCode::FORBIDDEN);
    assert!(t.app.store.find_user_by_email("sneaky@six.test").await.unwrap().is_none());

    let by_user = t
        .app
        .request(
            "POST",
            &format!("/api/orgs/{}/users", t.org5),
            Some(json!({ "email": "another@five.test" })),
            Some(&t.user5),
        )
        .await;
    assert_eq!(by_user.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_only_super_admin_creates_org_admins() {
    let t = tenants().await;
    let path = format!("/api/orgs/{}/admins", t.org5);

    let by_admin = t
        .app
        .request("POST", &path, Some(json!({ "email": "boss@five.test" })), Some(&t.admin5))
        .await;
    assert_eq!(by_admin.status, StatusCode::FORBIDDEN);

    let by_root = t
        .app
        .request("POST", &path, Some(json!({ "email": "boss@five.test" })), Some(&t.root))
        .await;
    assert_eq!(by_root.status, StatusCode::CREATED);
    assert_eq!(by_root.data()["role"], "ADMIN");
}

#[tokio::test]
async fn test_provision_rejects_duplicate_and_malformed_email() {
    let t = tenants().await;
    let path = format!("/api/orgs/{}/users", t.org5);

    let duplicate = t
        .app
        .request("POST", &path, Some(json!({ "email": "User@Five.test" })), Some(&t.admin5))
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let malformed = t
        .app
        .request("POST", &path, Some(json!({ "email": "not-an-email" })), Some(&t.admin5))
        .await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_provision_into_missing_org() {
    let t = tenants().await;

    let response = t
        .app
        .request(
            "POST",
            "/api/orgs/9999/admins",
            Some(json!({ "email": "ghost@nowhere.test" })),
            Some(&t.root),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_remove_user() {
    let t = tenants().await;

    let self_removal = t
        .app
        .request(
            "DELETE",
            &format!("/api/orgs/{}/users/{}", t.org5, t.admin5_id),
            None,
            Some(&t.admin5),
        )
        .await;
    assert_eq!(self_removal.status, StatusCode::BAD_REQUEST);

    let removed = t
        .app
        .request(
            "DELETE",
            &format!("/api/orgs/{}/users/{}", t.org5, t.user5_id),
            None,
            Some(&t.admin5),
        )
        .await;
    assert_eq!(removed.status, StatusCode::OK);
    assert!(t.app.store.find_membership(t.user5_id, t.org5).await.unwrap().is_none());

    let again = t
        .app
        .request(
            "DELETE",
            &format!("/api/orgs/{}/users/{}", t.org5, t.user5_id),
            None,
            Some(&t.admin5),
        )
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);

    // A fresh login no longer carries the removed membership.
    let token = t.app.login("user@five.test", PASSWORD).await;
    let me = t.app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(me.data()["orgs"], json!([]));
}

#[tokio::test]
async fn test_deactivate_user() {
    let t = tenants().await;
    let path = format!("/api/users/{}/deactivate", t.user5_id);

    let by_admin = t.app.request("POST", &path, None, Some(&t.admin5)).await;
    assert_eq!(by_admin.status, StatusCode::FORBIDDEN);

    let by_root = t.app.request("POST", &path, None, Some(&t.root)).await;
    assert_eq!(by_root.status, StatusCode::OK);

    let login = t
        .app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "user@five.test", "password": PASSWORD })),
            None,
        )
        .await;
    assert_eq!(login.status, StatusCode::UNAUTHORIZED);

    let user = t.app.store.find_user_by_id(t.user5_id).await.unwrap().unwrap();
    assert!(!user.is_active);
    assert!(user.password_hash.is_some());
}

#[tokio::test]
async fn test_projects_are_scoped_to_the_org() {
    let t = tenants().await;
    let path = format!("/api/orgs/{}/projects", t.org5);

    let created = t
        .app
        .request("POST", &path, Some(json!({ "project_name": "roadmap" })), Some(&t.admin5))
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.data()["project_name"], "roadmap");
    assert_eq!(created.data()["project_org_id"], t.org5);

    let by_user = t
        .app
        .request("POST", &path, Some(json!({ "project_name": "side" })), Some(&t.user5))
        .await;
    assert_eq!(by_user.status, StatusCode::FORBIDDEN);

    let cross_org = t
        .app
        .request("POST", &path, Some(json!({ "project_name": "side" })), Some(&t.admin6))
        .await;
    assert_eq!(cross_org.status, StatusCode::FORBIDDEN);

    let blank = t
        .app
        .request("POST", &path, Some(json!({ "project_name": "" })), Some(&t.admin5))
        .await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);

    let listed = t.app.request("GET", &path, None, Some(&t.user5)).await;
    assert_eq!(listed.status, StatusCode::OK);
    let names: Vec<&str> = listed
        .data()
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["project_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["roadmap"]);

    let outsider = t.app.request("GET", &path, None, Some(&t.admin6)).await;
    assert_eq!(outsider.status, StatusCode::FORBIDDEN);

    let anonymous = t.app.request("GET", &path, None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let missing = t
        .app
        .request("GET", "/api/orgs/424242/projects", None, Some(&t.root))
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_project_access() {
    let t = tenants().await;
    let created = t
        .app
        .request(
            "POST",
            &format!("/api/orgs/{}/projects", t.org5),
            Some(json!({ "project_name": "roadmap" })),
            Some(&t.admin5),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let project_id = created.data()["project_id"].as_i64().unwrap();
    let path = format!("/api/projects/{project_id}/access");

    let member = t.app.request("GET", &path, None, Some(&t.user5)).await;
    assert_eq!(member.status, StatusCode::OK);
    assert_eq!(member.data()["org_id"], t.org5);
    assert_eq!(member.data()["role"], "USER");

    let outsider = t.app.request("GET", &path, None, Some(&t.admin6)).await;
    assert_eq!(outsider.status, StatusCode::FORBIDDEN);

    let root = t.app.request("GET", &path, None, Some(&t.root)).await;
    assert_eq!(root.status, StatusCode::OK);
    assert_eq!(root.data()["is_super_admin"], true);
    assert!(root.data()["role"].is_null());

    let missing = t
        .app
        .request("GET", "/api/projects/424242/access", None, Some(&t.user5))
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let anonymous = t.app.request("GET", &path, None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_numeric_path_id_is_rejected() {
    let t = tenants().await;

    let response = t
        .app
        .request("GET", "/api/orgs/abc/users", None, Some(&t.admin5))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let anonymous = t.app.request("GET", "/api/orgs/abc/users", None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}
