// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # HTTP Integration Tests
//!
//! The console router end to end over a mock backend.

use std::time::Duration;

use estate_core::{MenuError, MenuRecord};
use estate_tests::prelude::*;
use serde_json::json;

// =============================================================================
// Login and Logout
// =============================================================================

#[tokio::test]
async fn test_login_sets_session_and_returns_user() {
    let harness = TestHarness::new();

    let response = harness
        .post_json(
            "/api/auth/login",
            json!({ "email": "max@example.com", "password": "secret" }),
            None,
        )
        .await;
    response.assert_status(StatusCode::OK);

    let cookies = response.set_cookies();
    assert_eq!(cookies.len(), 2);

    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["role"], "manager");
    assert_eq!(body["data"]["displayName"], "Max Manager");
    assert_eq!(harness.backend().login_count(), 1);
}

#[tokio::test]
async fn test_login_wrong_password_is_unauthorized() {
    let harness = TestHarness::new();

    let response = harness
        .post_json(
            "/api/auth/login",
            json!({ "email": "max@example.com", "password": "nope" }),
            None,
        )
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert!(response.set_cookies().is_empty());
}

#[tokio::test]
async fn test_login_blank_fields_are_rejected_locally() {
    let harness = TestHarness::new();

    let response = harness
        .post_json("/api/auth/login", json!({ "email": " ", "password": "" }), None)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(harness.backend().login_count(), 0);
}

#[tokio::test]
async fn test_login_view_reports_existing_session() {
    let harness = TestHarness::new();
    let cookie = harness.login("ada@example.com", "secret").await;

    let response = harness.get("/login", Some(&cookie)).await;
    response.assert_status(StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["view"], "login");
    assert_eq!(body["signedInAs"]["role"], "admin");
}

#[tokio::test]
async fn test_logout_redirects_and_clears_session() {
    let harness = TestHarness::new();
    let cookie = harness.login("ada@example.com", "secret").await;

    let response = harness.post_json("/api/auth/logout", json!({}), Some(&cookie)).await;
    response.assert_redirect_to("/login");
    let cookies = response.set_cookies();
    assert_eq!(cookies.len(), 2);
    assert!(cookies.iter().all(|c| c.contains("Max-Age=0")));
    assert!(cookie_header_from(&cookies).is_empty());

    harness.get("/dashboard", None).await.assert_redirect_to("/login");
}

// =============================================================================
// Route Guards
// =============================================================================

#[tokio::test]
async fn test_page_without_session_redirects_to_login() {
    let harness = TestHarness::new();

    for path in ["/dashboard", "/properties", "/admin/role-permissions"] {
        harness.get(path, None).await.assert_redirect_to("/login");
    }
}

#[tokio::test]
async fn test_page_with_corrupted_session_redirects_and_cleans_up() {
    let harness = TestHarness::new();
    let cookie = CookieHeaderBuilder::new()
        .raw(estate_core::session::IDENTITY_KEY, "undefined")
        .raw(estate_core::session::TOKEN_KEY, "tok")
        .build();

    let response = harness.get("/dashboard", Some(&cookie)).await;
    response.assert_redirect_to("/login");
    assert_eq!(response.set_cookies().len(), 2);
}

#[tokio::test]
async fn test_forged_admin_identity_redirects_to_login() {
    let harness = TestHarness::new();
    let cookie = SessionBuilder::admin().token("anything").unsigned_cookie_header();

    let response = harness.get("/admin/role-permissions", Some(&cookie)).await;
    response.assert_redirect_to("/login");

    let cookies = response.set_cookies();
    assert_eq!(cookies.len(), 2);
    assert!(cookies.iter().all(|c| c.contains("Max-Age=0")));
    assert_eq!(harness.backend().login_count(), 0);
}

#[tokio::test]
async fn test_identity_paired_with_other_token_redirects_to_login() {
    let harness = TestHarness::new();
    let manager = harness.login("max@example.com", "secret").await;
    let admin = SessionBuilder::admin().token("admin-token").cookie_header();

    // Manager's signed identity with someone else's token cookie.
    let identity = manager
        .split("; ")
        .find(|c| c.starts_with("estate.identity="))
        .unwrap();
    let token = admin
        .split("; ")
        .find(|c| c.starts_with("estate.token="))
        .unwrap();

    let response = harness
        .get("/properties", Some(&format!("{}; {}", identity, token)))
        .await;
    response.assert_redirect_to("/login");
}

#[tokio::test]
async fn test_identity_signed_with_other_secret_redirects_to_login() {
    let harness = TestHarness::new();
    let foreign = estate_api::CookieConfig {
        secret: "secret-of-another-deployment-000000".to_string(),
        ..estate_api::CookieConfig::default()
    };
    let cookie = SessionBuilder::admin().cookie_header_with(&foreign);

    harness
        .get("/admin/users", Some(&cookie))
        .await
        .assert_redirect_to("/login");
}

#[tokio::test]
async fn test_admin_renders_role_permissions_page() {
    let harness = TestHarness::new();
    let cookie = SessionBuilder::admin().cookie_header();

    let response = harness.get("/admin/role-permissions", Some(&cookie)).await;
    response.assert_status(StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["view"], "page");
    assert_eq!(body["path"], "/admin/role-permissions");
    assert_eq!(body["user"]["role"], "admin");
    assert!(body.get("navigation").is_none());
    assert_eq!(harness.backend().menu_count(), 0);
}

#[tokio::test]
async fn test_manager_sees_access_denied_in_place() {
    let harness = TestHarness::new();
    let cookie = SessionBuilder::manager().cookie_header();

    let response = harness.get("/admin/role-permissions", Some(&cookie)).await;
    response.assert_status(StatusCode::FORBIDDEN);
    response.assert_no_redirect();

    let body = json_body(response).await;
    assert_eq!(body["view"], "access-denied");
    assert_eq!(body["path"], "/admin/role-permissions");
    assert_eq!(body["role"], "manager");
}

#[tokio::test]
async fn test_query_string_does_not_bypass_role_gate() {
    let harness = TestHarness::new();
    let cookie = SessionBuilder::user().cookie_header();

    harness
        .get("/admin/users?tab=all", Some(&cookie))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_role_case_does_not_matter() {
    let harness = TestHarness::new();
    let cookie = SessionBuilder::new(IdentityFixtures::with_role("MANAGER")).cookie_header();

    harness
        .get("/properties", Some(&cookie))
        .await
        .assert_status(StatusCode::OK);
}

#[tokio::test]
async fn test_open_page_admits_unknown_role() {
    let harness = TestHarness::new();
    let cookie = SessionBuilder::new(IdentityFixtures::with_role("auditor")).cookie_header();

    harness
        .get("/community", Some(&cookie))
        .await
        .assert_status(StatusCode::OK);
    harness
        .get("/units", Some(&cookie))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_full_login_flow_for_manager() {
    let harness = TestHarness::new();
    let cookie = harness.login("max@example.com", "secret").await;

    harness.get("/properties", Some(&cookie)).await.assert_status(StatusCode::OK);
    harness.get("/admin/menus", Some(&cookie)).await.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(harness.backend().last_menu_token().as_deref(), Some("mock-token-1"));
}

// =============================================================================
// Navigation
// =============================================================================

#[tokio::test]
async fn test_navigation_requires_session() {
    let harness = TestHarness::new();

    harness
        .get("/api/navigation", None)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(harness.backend().menu_count(), 0);
}

#[tokio::test]
async fn test_navigation_returns_tree() {
    let harness = TestHarness::new();
    let cookie = SessionBuilder::manager().token("tok-nav").cookie_header();

    let response = harness.get("/api/navigation", Some(&cookie)).await;
    response.assert_status(StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "ready");
    assert_eq!(body["items"][0]["label"], "Community");
    assert_eq!(body["items"][1]["children"][1]["isAccessible"], false);
    assert_eq!(harness.backend().last_menu_token().as_deref(), Some("tok-nav"));
}

#[tokio::test]
async fn test_navigation_failure_keeps_status_ok() {
    let harness = TestHarness::new();
    harness.backend().fail_menu(MenuError::Rejected);
    let cookie = SessionBuilder::admin().cookie_header();

    let response = harness.get("/api/navigation", Some(&cookie)).await;
    response.assert_status(StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["items"], json!([]));
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_duplicate_menu_ids_render_empty_navigation() {
    let harness = TestHarness::new();
    harness.backend().set_menu(vec![
        MenuRecord::root(7, "Community", "/community"),
        MenuRecord::root(7, "Units", "/units"),
    ]);
    let cookie = SessionBuilder::admin().cookie_header();

    harness
        .get("/dashboard", Some(&cookie))
        .await
        .assert_status(StatusCode::OK);

    let body = json_body(harness.get("/api/navigation", Some(&cookie)).await).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["items"], json!([]));
}

#[tokio::test]
async fn test_overly_deep_menu_renders_empty_navigation() {
    let harness = TestHarness::new();
    let mut records = vec![MenuRecord::root(1, "Level 1", "/community")];
    records.extend((2..=100_000).map(|id| MenuRecord::child(id, id - 1, "Level", "/community")));
    harness.backend().set_menu(records);
    let cookie = SessionBuilder::admin().cookie_header();

    let response = harness.get("/api/navigation", Some(&cookie)).await;
    response.assert_status(StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["items"], json!([]));
}

#[tokio::test]
async fn test_slow_menu_does_not_block_page() {
    let harness = TestHarness::builder()
        .menu_timeout(Duration::from_secs(30))
        .build();
    harness.backend().set_menu_latency(Duration::from_secs(10));
    let cookie = SessionBuilder::manager().cookie_header();

    // Start the sidebar fetch and leave it waiting on the backend.
    let navigation = harness.get("/api/navigation", Some(&cookie));
    tokio::pin!(navigation);
    tokio::select! {
        biased;
        _ = &mut navigation => panic!("menu fetch finished before the backend answered"),
        _ = tokio::time::sleep(Duration::from_millis(50)) => {}
    }
    assert_eq!(harness.backend().menu_count(), 1);

    let response = tokio::time::timeout(
        Duration::from_millis(500),
        harness.get("/properties", Some(&cookie)),
    )
    .await
    .expect("page waited for the menu");
    response.assert_status(StatusCode::OK);
    assert_eq!(json_body(response).await["view"], "page");
    assert_eq!(harness.backend().menu_count(), 1);
}

#[tokio::test]
async fn test_menu_timeout_gives_error_navigation() {
    let harness = TestHarness::builder()
        .menu_timeout(Duration::from_millis(50))
        .build();
    harness.backend().set_menu_latency(Duration::from_secs(2));
    let cookie = SessionBuilder::manager().cookie_header();

    let response = harness.get("/api/navigation", Some(&cookie)).await;
    response.assert_status(StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Menu is temporarily unavailable");
}

// =============================================================================
// Session Endpoint and Health
// =============================================================================

#[tokio::test]
async fn test_me_returns_current_user() {
    let harness = TestHarness::new();
    let cookie = SessionBuilder::user().cookie_header();

    let response = harness.get("/api/auth/me", Some(&cookie)).await;
    response.assert_status(StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["email"], "uma@example.com");
}

#[tokio::test]
async fn test_every_response_carries_request_id() {
    let harness = TestHarness::new();
    let cookie = SessionBuilder::admin().cookie_header();

    let response = harness.get("/dashboard", Some(&cookie)).await;
    assert!(response.headers().get(estate_api::REQUEST_ID_HEADER).is_some());
}

#[tokio::test]
async fn test_ready_reports_components() {
    let harness = TestHarness::new();

    let response = harness.get("/ready", None).await;
    response.assert_status(StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["ready"], true);
    assert_eq!(body["components"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn test_ready_with_empty_table_and_open_pages() {
    let catalog = estate_core::RouteCatalog::new(vec![
        estate_core::RouteSpec::open("/dashboard", "Dashboard"),
        estate_core::RouteSpec::open("/community", "Community"),
    ])
    .unwrap();
    let harness = TestHarness::builder()
        .table(std::sync::Arc::new(estate_core::PermissionTable::empty()))
        .catalog(catalog)
        .build();

    let response = harness.get("/ready", None).await;
    response.assert_status(StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["ready"], true);
    let table = body["components"]
        .as_array()
        .and_then(|c| c.iter().find(|c| c["name"] == "permission_table"))
        .cloned()
        .unwrap();
    assert_eq!(table["healthy"], true);
    assert_eq!(table["message"], "0 entries");
}

#[test]
fn test_unmapped_restricted_page_refuses_to_build() {
    let result = estate_api::ApiServerBuilder::new()
        .backend(std::sync::Arc::new(MockBackend::new()))
        .permission_table(TableFixtures::small())
        .build();

    let err = result.err().expect("build should fail");
    assert!(err.to_string().contains("/units"));
}
