// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Application state shared across handlers.

use std::sync::Arc;

use estate_core::{
    AccessEvaluator, AuthGate, CoverageReport, PermissionTable, RoleGate, RouteCatalog, RouteGuard,
};
use tracing::info;

use crate::backend::ConsoleBackend;
use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};

// =============================================================================
// AppState
// =============================================================================

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ApiConfig>,
    /// Route guard: authentication gate then role gate.
    pub guard: Arc<RouteGuard>,
    /// Console pages.
    pub catalog: Arc<RouteCatalog>,
    /// Catalog coverage computed at startup.
    pub coverage: Arc<CoverageReport>,
    /// REST backend.
    pub backend: Arc<dyn ConsoleBackend>,
}

impl AppState {
    /// Creates a new app state builder.
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }

    /// Returns the access evaluator.
    pub fn evaluator(&self) -> &AccessEvaluator {
        self.guard.role_gate().evaluator()
    }

    /// Returns the backend.
    pub fn backend(&self) -> &dyn ConsoleBackend {
        self.backend.as_ref()
    }

    /// Returns the login path.
    pub fn login_path(&self) -> &str {
        self.guard.auth_gate().login_path()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("catalog", &self.catalog.len())
            .field("backend", &self.backend.name())
            .finish()
    }
}

// =============================================================================
// AppStateBuilder
// =============================================================================

/// Builder for constructing AppState.
pub struct AppStateBuilder {
    config: Option<ApiConfig>,
    table: Option<Arc<PermissionTable>>,
    catalog: Option<RouteCatalog>,
    backend: Option<Arc<dyn ConsoleBackend>>,
}

impl AppStateBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            config: None,
            table: None,
            catalog: None,
            backend: None,
        }
    }

    /// Sets the configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the permission table. Defaults to the packaged table.
    pub fn permission_table(mut self, table: Arc<PermissionTable>) -> Self {
        self.table = Some(table);
        self
    }

    /// Sets the route catalog. Defaults to the shipped catalog.
    pub fn catalog(mut self, catalog: RouteCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Sets the backend.
    pub fn backend(mut self, backend: Arc<dyn ConsoleBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Builds the AppState.
    ///
    /// Fails when no backend is set or when a restricted page has no
    /// permission table entry.
    pub fn build(self) -> ApiResult<AppState> {
        let config = self.config.unwrap_or_default();
        let backend = self
            .backend
            .ok_or_else(|| ApiError::internal("no console backend configured"))?;

        let table = match self.table {
            Some(table) => table,
            None => Arc::new(PermissionTable::packaged()?),
        };
        let catalog = self.catalog.unwrap_or_else(RouteCatalog::console);

        let coverage = catalog.coverage(&table).into_result()?;
        info!(
            entries = table.len(),
            pages = catalog.len(),
            fail_open = coverage.fail_open.len(),
            "Access control ready"
        );

        let guard = RouteGuard::new(
            AuthGate::new(config.login_path.clone()),
            RoleGate::new(AccessEvaluator::new(table)),
        );

        Ok(AppState {
            config: Arc::new(config),
            guard: Arc::new(guard),
            catalog: Arc::new(catalog),
            coverage: Arc::new(coverage),
            backend,
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// FromRef implementations for extracting parts of state
// =============================================================================

impl axum::extract::FromRef<AppState> for Arc<ApiConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl axum::extract::FromRef<AppState> for Arc<RouteCatalog> {
    fn from_ref(state: &AppState) -> Self {
        state.catalog.clone()
    }
}

// =============================================================================
// Tests
// =============================================================================
