// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Backend Client Integration Tests
//!
//! The reqwest client against a real local HTTP server.

use std::sync::Arc;
use std::time::Duration;

use estate_api::{BackendError, ConsoleBackend, LoginCredentials};
use estate_core::{MenuError, SessionToken};
use estate_tests::prelude::*;
use serde_json::json;

fn token(raw: &str) -> SessionToken {
    SessionToken::new(raw).unwrap()
}

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_login_success() {
    let server = FakeBackendServer::start().await;
    server.respond_login(
        StatusCode::OK,
        json!({
            "success": true,
            "data": {
                "token": "jwt-abc",
                "user": { "role": "Manager", "displayName": "Max Manager", "email": "max@example.com" }
            }
        }),
    );

    let session = server
        .client(Duration::from_secs(2))
        .login(&LoginCredentials::new("max@example.com", "secret"))
        .await
        .unwrap();

    assert_eq!(session.token.expose(), "jwt-abc");
    assert_eq!(session.role().as_str(), "Manager");
    assert_eq!(
        server.last_login_body(),
        Some(json!({ "email": "max@example.com", "password": "secret" }))
    );
}

#[tokio::test]
async fn test_login_unauthorized_is_rejected() {
    let server = FakeBackendServer::start().await;
    server.respond_login(StatusCode::UNAUTHORIZED, json!({ "success": false }));

    let result = server
        .client(Duration::from_secs(2))
        .login(&LoginCredentials::new("max@example.com", "wrong"))
        .await;

    assert!(matches!(result, Err(BackendError::Rejected { .. })));
}

#[tokio::test]
async fn test_login_refusal_carries_message() {
    let server = FakeBackendServer::start().await;
    server.respond_login(
        StatusCode::OK,
        json!({ "success": false, "message": "account locked" }),
    );

    let err = server
        .client(Duration::from_secs(2))
        .login(&LoginCredentials::new("max@example.com", "secret"))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("account locked"));
}

#[tokio::test]
async fn test_login_without_data_is_malformed() {
    let server = FakeBackendServer::start().await;
    server.respond_login(StatusCode::OK, json!({ "success": true }));

    let result = server
        .client(Duration::from_secs(2))
        .login(&LoginCredentials::new("max@example.com", "secret"))
        .await;

    assert!(matches!(result, Err(BackendError::Malformed { .. })));
}

#[tokio::test]
async fn test_login_server_error_is_unavailable() {
    let server = FakeBackendServer::start().await;
    server.respond_login(StatusCode::INTERNAL_SERVER_ERROR, json!({}));

    let result = server
        .client(Duration::from_secs(2))
        .login(&LoginCredentials::new("max@example.com", "secret"))
        .await;

    assert!(matches!(result, Err(BackendError::Unavailable { .. })));
}

// =============================================================================
// Menu
// =============================================================================

#[tokio::test]
async fn test_menu_sends_bearer_token() {
    let server = FakeBackendServer::start().await;
    server.respond_menu(
        StatusCode::OK,
        MenuBodyBuilder::records(&MenuFixtures::console()).build(),
    );

    let records = server
        .client(Duration::from_secs(2))
        .fetch_menu(&token("jwt-xyz"))
        .await
        .unwrap();

    assert_eq!(records.len(), 6);
    assert_eq!(server.last_authorization().as_deref(), Some("Bearer jwt-xyz"));
}

#[tokio::test]
async fn test_menu_revoked_token_is_rejected() {
    let server = FakeBackendServer::start().await;
    server.respond_menu(StatusCode::UNAUTHORIZED, "{}");

    let result = server
        .client(Duration::from_secs(2))
        .fetch_menu(&token("stale"))
        .await;

    assert_eq!(result, Err(MenuError::Rejected));
}

#[tokio::test]
async fn test_menu_success_false_is_rejected() {
    let server = FakeBackendServer::start().await;
    server.respond_menu(StatusCode::OK, MenuBodyBuilder::failure().build());

    let result = server
        .client(Duration::from_secs(2))
        .fetch_menu(&token("jwt"))
        .await;

    assert_eq!(result, Err(MenuError::Rejected));
}

#[tokio::test]
async fn test_menu_bad_gateway_is_unavailable() {
    let server = FakeBackendServer::start().await;
    server.respond_menu(StatusCode::BAD_GATEWAY, "upstream down");

    let result = server
        .client(Duration::from_secs(2))
        .fetch_menu(&token("jwt"))
        .await;

    assert!(matches!(result, Err(MenuError::Unavailable { .. })));
}

#[tokio::test]
async fn test_menu_client_timeout_is_unavailable() {
    let server = FakeBackendServer::start().await;
    server.delay_menu(Duration::from_secs(2));

    let result = server
        .client(Duration::from_millis(100))
        .fetch_menu(&token("jwt"))
        .await;

    assert!(matches!(result, Err(MenuError::Unavailable { .. })));
}

#[tokio::test]
async fn test_unreachable_backend_is_unavailable() {
    let server = FakeBackendServer::start().await;
    let client = server.client(Duration::from_secs(1));
    drop(server);
    tokio::time::sleep(Duration::from_millis(50)).await;

    let result = client
        .login(&LoginCredentials::new("max@example.com", "secret"))
        .await;
    assert!(result.is_err());
}

// =============================================================================
// Through the Console
// =============================================================================

#[tokio::test]
async fn test_console_renders_page_with_http_backend() {
    let server = FakeBackendServer::start().await;
    server.respond_menu(
        StatusCode::OK,
        MenuBodyBuilder::records(&MenuFixtures::children_first()).build(),
    );

    let console = estate_api::ApiServerBuilder::new()
        .backend(Arc::new(server.client(Duration::from_secs(2))))
        .build()
        .unwrap();
    let cookie = SessionBuilder::manager().token("jwt-page").cookie_header();

    let get = |uri: &str| {
        axum::http::Request::builder()
            .uri(uri)
            .header(axum::http::header::COOKIE, cookie.as_str())
            .body(axum::body::Body::empty())
            .unwrap()
    };

    let response = tower::ServiceExt::oneshot(console.router(), get("/properties")).await.unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(json_body(response).await["title"], "Properties");
    assert_eq!(server.last_authorization(), None);

    let response = tower::ServiceExt::oneshot(console.router(), get("/api/navigation"))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["items"][0]["children"][0]["label"], "Properties");
    assert_eq!(server.last_authorization().as_deref(), Some("Bearer jwt-page"));
}
