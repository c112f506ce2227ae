// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Harness
//!
//! [`TestHarness`] drives the console router in process with a
//! [`MockBackend`]. [`FakeBackendServer`] is a real HTTP server on a local
//! port that plays the REST backend for [`estate_api::HttpBackend`].

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Method, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use estate_api::{ApiConfig, ApiServerBuilder, AppState, HttpBackend, HttpBackendConfig};
use estate_core::{PermissionTable, RouteCatalog};
use tokio::task::JoinHandle;
use tower::ServiceExt;

use super::assertions::{cookie_header_from, ResponseAssertions};
use super::mocks::MockBackend;

// =============================================================================
// TestHarness
// =============================================================================

/// The console router over a mock backend.
pub struct TestHarness {
    router: Router,
    state: AppState,
    backend: Arc<MockBackend>,
}

impl TestHarness {
    /// A harness with defaults: packaged table, console catalog and a
    /// backend holding one account per shipped role.
    pub fn new() -> Self {
        TestHarnessBuilder::new().build()
    }

    /// Starts a builder.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Returns the mock backend.
    pub fn backend(&self) -> &MockBackend {
        &self.backend
    }

    /// Returns the application state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Sends a request through the router.
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    /// Sends a GET, optionally with a `Cookie` header.
    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder().method(Method::GET).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).expect("valid request"))
            .await
    }

    /// Sends a POST with a JSON body.
    pub async fn post_json(
        &self,
        uri: &str,
        body: serde_json::Value,
        cookie: Option<&str>,
    ) -> Response {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body.to_string())).expect("valid request"))
            .await
    }

    /// Logs in and returns the `Cookie` header for the new session.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .post_json(
                "/api/auth/login",
                serde_json::json!({ "email": email, "password": password }),
                None,
            )
            .await;
        response.assert_status(StatusCode::OK);
        cookie_header_from(&response.set_cookies())
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`TestHarness`].
pub struct TestHarnessBuilder {
    config: ApiConfig,
    table: Option<Arc<PermissionTable>>,
    catalog: Option<RouteCatalog>,
    backend: Arc<MockBackend>,
}

impl TestHarnessBuilder {
    /// Creates a builder with defaults.
    pub fn new() -> Self {
        Self {
            config: ApiConfig::default(),
            table: None,
            catalog: None,
            backend: Arc::new(MockBackend::with_console_accounts()),
        }
    }

    /// Sets the server configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the menu timeout.
    pub fn menu_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_menu_timeout(timeout);
        self
    }

    /// Sets the permission table.
    pub fn table(mut self, table: Arc<PermissionTable>) -> Self {
        self.table = Some(table);
        self
    }

    /// Sets the route catalog.
    pub fn catalog(mut self, catalog: RouteCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Sets the backend.
    pub fn backend(mut self, backend: MockBackend) -> Self {
        self.backend = Arc::new(backend);
        self
    }

    /// Builds the harness.
    pub fn build(self) -> TestHarness {
        let mut builder = ApiServerBuilder::new()
            .config(self.config)
            .backend(self.backend.clone());
        if let Some(table) = self.table {
            builder = builder.permission_table(table);
        }
        if let Some(catalog) = self.catalog {
            builder = builder.catalog(catalog);
        }

        let server = builder.build().expect("server builds");
        TestHarness {
            router: server.router(),
            state: server.state().clone(),
            backend: self.backend,
        }
    }
}

impl Default for TestHarnessBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// FakeBackendServer
// =============================================================================

#[derive(Debug)]
struct FakeBackendState {
    login: Mutex<(StatusCode, String)>,
    menu: Mutex<(StatusCode, String)>,
    menu_delay: Mutex<Duration>,
    last_authorization: Mutex<Option<String>>,
    last_login_body: Mutex<Option<serde_json::Value>>,
}

/// A REST backend served on a local port.
///
/// Serves `POST /api/auth/login` and `GET /api/menus/me` with configurable
/// status and body. Stops when dropped.
pub struct FakeBackendServer {
    addr: SocketAddr,
    state: Arc<FakeBackendState>,
    handle: JoinHandle<()>,
}

impl FakeBackendServer {
    /// Starts the server.
    pub async fn start() -> Self {
        let state = Arc::new(FakeBackendState {
            login: Mutex::new((StatusCode::OK, String::new())),
            menu: Mutex::new((StatusCode::OK, r#"{"success":true,"data":[]}"#.to_string())),
            menu_delay: Mutex::new(Duration::ZERO),
            last_authorization: Mutex::new(None),
            last_login_body: Mutex::new(None),
        });

        let router = Router::new()
            .route("/api/auth/login", post(fake_login))
            .route("/api/menus/me", get(fake_menu))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind local port");
        let addr = listener.local_addr().expect("local address");
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    /// Base URL to configure the client with.
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// An [`HttpBackend`] pointed at this server.
    pub fn client(&self, timeout: Duration) -> HttpBackend {
        HttpBackend::new(HttpBackendConfig {
            base_url: self.base_url(),
            timeout,
            ..HttpBackendConfig::default()
        })
        .expect("client builds")
    }

    /// Sets the login response.
    pub fn respond_login(&self, status: StatusCode, body: serde_json::Value) {
        *self.state.login.lock().unwrap() = (status, body.to_string());
    }

    /// Sets the menu response.
    pub fn respond_menu(&self, status: StatusCode, body: impl Into<String>) {
        *self.state.menu.lock().unwrap() = (status, body.into());
    }

    /// Delays menu responses.
    pub fn delay_menu(&self, delay: Duration) {
        *self.state.menu_delay.lock().unwrap() = delay;
    }

    /// The `Authorization` header of the last menu request.
    pub fn last_authorization(&self) -> Option<String> {
        self.state.last_authorization.lock().unwrap().clone()
    }

    /// The JSON body of the last login request.
    pub fn last_login_body(&self) -> Option<serde_json::Value> {
        self.state.last_login_body.lock().unwrap().clone()
    }
}

impl Drop for FakeBackendServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn fake_login(State(state): State<Arc<FakeBackendState>>, body: String) -> Response {
    *state.last_login_body.lock().unwrap() = serde_json::from_str(&body).ok();
    let (status, body) = state.login.lock().unwrap().clone();
    json_response(status, body)
}

async fn fake_menu(State(state): State<Arc<FakeBackendState>>, headers: HeaderMap) -> Response {
    *state.last_authorization.lock().unwrap() = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let delay = *state.menu_delay.lock().unwrap();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let (status, body) = state.menu.lock().unwrap().clone();
    json_response(status, body)
}

fn json_response(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}
