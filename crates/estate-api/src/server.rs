// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Console server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    routing::{get, post},
    Router,
};
use estate_core::{PermissionTable, RouteCatalog};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::backend::ConsoleBackend;
use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::handlers;
use crate::middleware::{AuthGateLayer, RoleGateLayer};
use crate::state::{AppState, AppStateBuilder};

/// Paths served outside the page catalog.
const RESERVED_PATHS: &[&str] = &[
    "/health",
    "/ready",
    "/api/auth/login",
    "/api/auth/logout",
    "/api/auth/me",
    "/api/navigation",
];

// =============================================================================
// ApiServer
// =============================================================================

/// The console server.
pub struct ApiServer {
    state: AppState,
    config: Arc<ApiConfig>,
}

impl ApiServer {
    /// Creates a server over `state`.
    pub fn new(state: AppState) -> Self {
        let config = state.config.clone();
        Self { state, config }
    }

    /// Returns the shared state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Creates the router with all routes and middleware.
    ///
    /// Catalog pages sit behind the authentication gate (page mode) and the
    /// role gate. `/api/auth/me` and `/api/navigation` sit behind the
    /// authentication gate only (API mode). Everything else is public.
    pub fn router(&self) -> Router {
        let cors = create_cors_layer(&self.config);
        let cookies = self.config.cookies.clone();
        let auth_gate = self.state.guard.auth_gate().clone();
        let role_gate = self.state.guard.role_gate().clone();

        let middleware_stack = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new())
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                self.config.request_timeout,
            ))
            .layer(cors);

        let login_path = self.state.login_path().to_string();
        let mut pages = Router::new();
        let mut page_count = 0;
        for route in self.state.catalog.routes() {
            if RESERVED_PATHS.contains(&route.path.as_str()) || route.path == login_path {
                warn!(path = %route.path, "Catalog page shadows a built-in route, skipping");
                continue;
            }
            pages = pages.route(&route.path, get(handlers::page));
            page_count += 1;
        }
        if page_count > 0 {
            // Last layer added runs first: authentication, then role.
            pages = pages
                .route_layer(RoleGateLayer::new(role_gate))
                .route_layer(AuthGateLayer::page(auth_gate.clone(), cookies.clone()));
        }

        let protected_api = Router::new()
            .route("/api/auth/me", get(handlers::me))
            .route("/api/navigation", get(handlers::navigation))
            .route_layer(AuthGateLayer::api(auth_gate, cookies));

        Router::new()
            // Health endpoints (public)
            .route("/health", get(handlers::health))
            .route("/ready", get(handlers::ready))
            // Login view and session endpoints (public)
            .route(&login_path, get(handlers::login_page))
            .route("/api/auth/login", post(handlers::login))
            .route("/api/auth/logout", post(handlers::logout))
            .merge(protected_api)
            .merge(pages)
            .layer(middleware_stack)
            .with_state(self.state.clone())
    }

    /// Runs the server.
    pub async fn run(self) -> ApiResult<()> {
        self.run_with_shutdown(std::future::pending()).await
    }

    /// Runs the server until `shutdown_signal` resolves.
    pub async fn run_with_shutdown(
        self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        let addr = self.config.socket_addr();
        let router = self.router();

        info!(addr = %addr, pages = self.state.catalog.len(), "Starting console server");

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to bind {}: {}", addr, e)))?;

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| ApiError::internal(format!("Server error: {}", e)))?;

        info!("Console server shutdown complete");

        Ok(())
    }

    /// Returns the server address.
    pub fn addr(&self) -> SocketAddr {
        self.config.socket_addr()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Creates the CORS layer from configuration.
///
/// With credentials enabled a wildcard origin mirrors the request origin,
/// and wildcard headers fall back to an explicit list.
fn create_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = &config.cors;
    let wildcard = |values: &[String]| values.iter().any(|v| v == "*");

    let mut layer = CorsLayer::new().max_age(Duration::from_secs(cors.max_age));

    // Origins
    if wildcard(&cors.allowed_origins) {
        layer = if cors.allow_credentials {
            layer.allow_origin(AllowOrigin::mirror_request())
        } else {
            layer.allow_origin(Any)
        };
    } else {
        let origins: Vec<HeaderValue> = cors
            .allowed_origins
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %o, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        layer = layer.allow_origin(origins);
    }

    // Methods
    let methods: Vec<Method> = cors
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    layer = layer.allow_methods(methods);

    // Headers
    if wildcard(&cors.allowed_headers) && !cors.allow_credentials {
        layer = layer.allow_headers(Any);
    } else {
        layer = layer.allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::COOKIE]);
    }

    // Credentials
    if cors.allow_credentials {
        layer = layer.allow_credentials(true);
    }

    layer
}

// =============================================================================
// Server Builder
// =============================================================================

/// Builder for the console server.
pub struct ApiServerBuilder {
    state_builder: AppStateBuilder,
}

impl ApiServerBuilder {
    /// Creates a new server builder.
    pub fn new() -> Self {
        Self {
            state_builder: AppState::builder(),
        }
    }

    /// Sets the configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.state_builder = self.state_builder.config(config);
        self
    }

    /// Sets the permission table.
    pub fn permission_table(mut self, table: Arc<PermissionTable>) -> Self {
        self.state_builder = self.state_builder.permission_table(table);
        self
    }

    /// Sets the route catalog.
    pub fn catalog(mut self, catalog: RouteCatalog) -> Self {
        self.state_builder = self.state_builder.catalog(catalog);
        self
    }

    /// Sets the backend.
    pub fn backend(mut self, backend: Arc<dyn ConsoleBackend>) -> Self {
        self.state_builder = self.state_builder.backend(backend);
        self
    }

    /// Builds the server.
    pub fn build(self) -> ApiResult<ApiServer> {
        let state = self.state_builder.build()?;
        Ok(ApiServer::new(state))
    }
}

impl Default for ApiServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
