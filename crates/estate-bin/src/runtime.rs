// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Console runtime.
//!
//! Turns an [`EstateConfig`] into a running server: loads the permission
//! table and route catalog, refuses to start on unmapped restricted pages,
//! builds the HTTP backend and serves until shutdown.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use estate_api::{
    ephemeral_secret, ApiConfig, ApiServer, ApiServerBuilder, CookieConfig, CorsConfig,
    HttpBackend, HttpBackendConfig, SameSitePolicy,
};
use estate_config::{load_config, BackendConfig, EstateConfig, SameSite};
use tracing::{info, warn};

use crate::error::{BinError, BinResult};
use crate::shutdown::ShutdownCoordinator;

// =============================================================================
// ConsoleRuntime
// =============================================================================

/// The console runtime.
pub struct ConsoleRuntime {
    config: Arc<EstateConfig>,
    shutdown: ShutdownCoordinator,
}

impl ConsoleRuntime {
    /// Creates a runtime for `config`.
    pub fn new(config: EstateConfig) -> Self {
        Self {
            config: Arc::new(config),
            shutdown: ShutdownCoordinator::new(),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &EstateConfig {
        &self.config
    }

    /// Returns the shutdown coordinator.
    pub fn shutdown(&self) -> &ShutdownCoordinator {
        &self.shutdown
    }

    /// Builds the server without starting it.
    pub fn build_server(&self) -> BinResult<ApiServer> {
        let table = self.config.permission_table()?;
        let catalog = self.config.route_catalog()?;
        let coverage = catalog.coverage(&table).into_result()?;
        info!(
            mapped = coverage.mapped.len(),
            fail_open = coverage.fail_open.len(),
            "Route catalog checked against permission table"
        );

        for lint in table.lint() {
            warn!(problem = %lint, "Permission table entry can never match");
        }

        if self.config.session.secret.is_none() {
            warn!("No session.secret configured; sessions will not survive a restart");
        }

        let backend = HttpBackend::new(backend_config(&self.config.backend))?;

        let server = ApiServerBuilder::new()
            .config(api_config(&self.config))
            .permission_table(Arc::new(table))
            .catalog(catalog)
            .backend(Arc::new(backend))
            .build()?;

        Ok(server)
    }

    /// Serves until SIGINT or SIGTERM.
    pub async fn run(self) -> BinResult<()> {
        info!(version = estate_core::VERSION, "Starting estate console");

        let server = self.build_server()?;
        info!(
            addr = %server.addr(),
            backend = %self.config.backend.base_url,
            "Console is ready"
        );

        self.shutdown.listen_for_signals();
        server
            .run_with_shutdown(self.shutdown.shutdown_signal())
            .await?;

        info!("Estate console shutdown complete");
        Ok(())
    }
}

// =============================================================================
// Config Mapping
// =============================================================================

/// Maps the file configuration onto the server configuration.
pub fn api_config(config: &EstateConfig) -> ApiConfig {
    let console = &config.console;
    let session = &config.session;

    ApiConfig {
        host: console.bind_address,
        port: console.port,
        login_path: console.login_path.clone(),
        cors: CorsConfig {
            allowed_origins: console.cors.allowed_origins.clone(),
            allowed_methods: console.cors.allowed_methods.clone(),
            allowed_headers: console.cors.allowed_headers.clone(),
            allow_credentials: console.cors.allow_credentials,
            max_age: console.cors.max_age_secs,
        },
        cookies: CookieConfig {
            secure: session.secure,
            max_age_secs: session.max_age_secs,
            same_site: match session.same_site {
                SameSite::Strict => SameSitePolicy::Strict,
                SameSite::Lax => SameSitePolicy::Lax,
                SameSite::None => SameSitePolicy::None,
            },
            secret: session
                .secret
                .clone()
                .unwrap_or_else(|| ephemeral_secret().to_string()),
        },
        request_timeout: Duration::from_secs(console.request_timeout_secs),
        menu_timeout: Duration::from_millis(config.backend.menu_timeout_ms),
    }
}

/// Maps the backend section onto the HTTP client configuration.
pub fn backend_config(backend: &BackendConfig) -> HttpBackendConfig {
    HttpBackendConfig {
        base_url: backend.base_url.clone(),
        login_endpoint: backend.login_endpoint.clone(),
        menu_endpoint: backend.menu_endpoint.clone(),
        timeout: Duration::from_secs(backend.timeout_secs),
    }
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for the console runtime.
pub struct RuntimeBuilder {
    config_path: Option<PathBuf>,
    config: Option<EstateConfig>,
}

impl RuntimeBuilder {
    /// Creates a new runtime builder.
    pub fn new() -> Self {
        Self {
            config_path: None,
            config: None,
        }
    }

    /// Sets the configuration file path.
    pub fn config_path(mut self, path: Option<impl AsRef<Path>>) -> Self {
        self.config_path = path.map(|p| p.as_ref().to_path_buf());
        self
    }

    /// Sets the configuration directly.
    pub fn config(mut self, config: EstateConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the runtime. Without a config file the defaults are used.
    pub fn build(self) -> BinResult<ConsoleRuntime> {
        let config = match (self.config, self.config_path) {
            (Some(config), _) => config,
            (None, Some(path)) => load_config(&path).map_err(|e| {
                BinError::Config(e).with_context(format!("loading {}", path.display()))
            })?,
            (None, None) => {
                info!("No configuration file, using defaults");
                EstateConfig::default()
            }
        };

        Ok(ConsoleRuntime::new(config))
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
