// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration schema definitions for the estate console.
//!
//! # Schema Structure
//!
//! ```text
//! EstateConfig
//! ├── console: ConsoleConfig   (listener, login path, CORS)
//! ├── session: SessionConfig   (session cookie attributes)
//! ├── backend: BackendConfig   (REST backend endpoints and timeouts)
//! ├── access:  AccessConfig    (permission table file, route catalog)
//! └── logging: LoggingConfig
//! ```
//!
//! Every section is optional. An empty file yields the defaults.

use std::fs;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use estate_core::{path, PermissionTable, RouteCatalog, RouteSpec};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// Constants
// =============================================================================

/// Default console port.
pub const DEFAULT_CONSOLE_PORT: u16 = 8080;

/// Default login path.
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default session cookie lifetime (400 days, the longest browsers keep).
pub const DEFAULT_SESSION_MAX_AGE_SECS: u64 = 400 * 24 * 60 * 60;

/// Default backend request timeout in seconds.
pub const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 10;

/// Default menu fetch timeout in milliseconds.
pub const DEFAULT_MENU_TIMEOUT_MS: u64 = 3000;

// =============================================================================
// Top-Level Configuration
// =============================================================================

/// The root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EstateConfig {
    /// Console server configuration.
    #[serde(default)]
    pub console: ConsoleConfig,

    /// Session cookie configuration.
    #[serde(default)]
    pub session: SessionConfig,

    /// REST backend configuration.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Access-control configuration.
    #[serde(default)]
    pub access: AccessConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EstateConfig {
    /// Validates the entire configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.console.validate()?;
        self.session.validate()?;
        self.backend.validate()?;
        self.access.validate()?;
        Ok(())
    }

    /// Returns the route catalog in effect.
    pub fn route_catalog(&self) -> ConfigResult<RouteCatalog> {
        self.access.route_catalog()
    }

    /// Loads the permission table in effect.
    pub fn permission_table(&self) -> ConfigResult<PermissionTable> {
        self.access.permission_table()
    }
}

// =============================================================================
// Console Configuration
// =============================================================================

/// Console HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsoleConfig {
    /// Bind address.
    #[serde(default = "default_bind_address")]
    pub bind_address: IpAddr,

    /// Listen port.
    #[serde(default = "default_console_port")]
    pub port: u16,

    /// Where unauthenticated page requests are redirected.
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// CORS configuration.
    #[serde(default)]
    pub cors: CorsConfig,
}

fn default_bind_address() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0))
}

fn default_console_port() -> u16 {
    DEFAULT_CONSOLE_PORT
}

fn default_login_path() -> String {
    DEFAULT_LOGIN_PATH.to_string()
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl ConsoleConfig {
    /// Validates the console configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.port == 0 {
            return Err(ConfigError::validation("console.port", "cannot be 0"));
        }
        if !self.login_path.starts_with('/') || !path::is_normalized(&self.login_path) {
            return Err(ConfigError::validation(
                "console.login_path",
                "must be a normalized absolute path",
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::validation(
                "console.request_timeout_secs",
                "must be greater than 0",
            ));
        }
        Ok(())
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_console_port(),
            login_path: default_login_path(),
            request_timeout_secs: default_request_timeout(),
            cors: CorsConfig::default(),
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins.
    #[serde(default = "default_cors_origins")]
    pub allowed_origins: Vec<String>,

    /// Allowed methods.
    #[serde(default = "default_cors_methods")]
    pub allowed_methods: Vec<String>,

    /// Allowed headers.
    #[serde(default = "default_cors_headers")]
    pub allowed_headers: Vec<String>,

    /// Allow credentials (cookies).
    #[serde(default)]
    pub allow_credentials: bool,

    /// Max age for preflight cache in seconds.
    #[serde(default = "default_cors_max_age")]
    pub max_age_secs: u64,
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_cors_methods() -> Vec<String> {
    vec!["GET".to_string(), "POST".to_string(), "OPTIONS".to_string()]
}

fn default_cors_headers() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_cors_max_age() -> u64 {
    3600
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_cors_origins(),
            allowed_methods: default_cors_methods(),
            allowed_headers: default_cors_headers(),
            allow_credentials: false,
            max_age_secs: default_cors_max_age(),
        }
    }
}

// =============================================================================
// Session Configuration
// =============================================================================

/// Attributes of the two session cookies.
#[derive(Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Send cookies only over HTTPS.
    #[serde(default)]
    pub secure: bool,

    /// Cookie lifetime in seconds. `None` makes them browser-session cookies.
    #[serde(default = "default_session_max_age")]
    pub max_age_secs: Option<u64>,

    /// SameSite attribute.
    #[serde(default)]
    pub same_site: SameSite,

    /// HMAC secret signing the identity cookie. Without it a random secret
    /// is generated at startup and sessions end on restart.
    #[serde(default, skip_serializing)]
    pub secret: Option<String>,
}

/// Shorter secrets are accepted with a warning.
const RECOMMENDED_SECRET_LEN: usize = 32;

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secure", &self.secure)
            .field("max_age_secs", &self.max_age_secs)
            .field("same_site", &self.same_site)
            .field("secret", &self.secret.as_ref().map(|_| "***"))
            .finish()
    }
}

fn default_session_max_age() -> Option<u64> {
    Some(DEFAULT_SESSION_MAX_AGE_SECS)
}

impl SessionConfig {
    /// Validates the session configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.same_site == SameSite::None && !self.secure {
            return Err(ConfigError::validation(
                "session.same_site",
                "'none' requires session.secure = true",
            ));
        }
        if self.max_age_secs == Some(0) {
            return Err(ConfigError::validation(
                "session.max_age_secs",
                "must be greater than 0 when set",
            ));
        }
        match self.secret.as_deref().map(str::trim) {
            Some("") => {
                return Err(ConfigError::validation("session.secret", "must not be blank"));
            }
            Some(secret) if secret.len() < RECOMMENDED_SECRET_LEN => {
                warn!(
                    recommended = RECOMMENDED_SECRET_LEN,
                    "session.secret is shorter than recommended"
                );
            }
            _ => {}
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secure: false,
            max_age_secs: default_session_max_age(),
            same_site: SameSite::default(),
            secret: None,
        }
    }
}

/// Cookie SameSite attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    /// `SameSite=Strict`.
    Strict,
    /// `SameSite=Lax`.
    #[default]
    Lax,
    /// `SameSite=None`.
    None,
}

impl SameSite {
    /// Returns the attribute value.
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

// =============================================================================
// Backend Configuration
// =============================================================================

/// REST backend the console is layered over.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Base URL, without trailing slash.
    #[serde(default = "default_backend_url")]
    pub base_url: String,

    /// Login endpoint, relative to the base URL.
    #[serde(default = "default_login_endpoint")]
    pub login_endpoint: String,

    /// Menu endpoint, relative to the base URL.
    #[serde(default = "default_menu_endpoint")]
    pub menu_endpoint: String,

    /// Request timeout in seconds.
    #[serde(default = "default_backend_timeout")]
    pub timeout_secs: u64,

    /// Menu fetch timeout in milliseconds. Pages render without a menu
    /// once this elapses.
    #[serde(default = "default_menu_timeout")]
    pub menu_timeout_ms: u64,
}

fn default_backend_url() -> String {
    "http://127.0.0.1:3000/api".to_string()
}

fn default_login_endpoint() -> String {
    "/auth/login".to_string()
}

fn default_menu_endpoint() -> String {
    "/menus/me".to_string()
}

fn default_backend_timeout() -> u64 {
    DEFAULT_BACKEND_TIMEOUT_SECS
}

fn default_menu_timeout() -> u64 {
    DEFAULT_MENU_TIMEOUT_MS
}

impl BackendConfig {
    /// Validates the backend configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::validation(
                "backend.base_url",
                "must start with http:// or https://",
            ));
        }
        for (field, endpoint) in [
            ("backend.login_endpoint", &self.login_endpoint),
            ("backend.menu_endpoint", &self.menu_endpoint),
        ] {
            if !endpoint.starts_with('/') {
                return Err(ConfigError::validation(field, "must start with '/'"));
            }
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::validation("backend.timeout_secs", "must be greater than 0"));
        }
        if self.menu_timeout_ms == 0 {
            return Err(ConfigError::validation(
                "backend.menu_timeout_ms",
                "must be greater than 0",
            ));
        }
        Ok(())
    }

    /// Joins `endpoint` onto the base URL.
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), endpoint)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            login_endpoint: default_login_endpoint(),
            menu_endpoint: default_menu_endpoint(),
            timeout_secs: default_backend_timeout(),
            menu_timeout_ms: default_menu_timeout(),
        }
    }
}

// =============================================================================
// Access Configuration
// =============================================================================

/// Access-control configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccessConfig {
    /// Permission table file. The packaged table is used when unset.
    #[serde(default)]
    pub permission_table: Option<PathBuf>,

    /// Replaces the shipped route catalog.
    #[serde(default)]
    pub routes: Option<Vec<RouteSpec>>,
}

impl AccessConfig {
    /// Validates the access configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.route_catalog().map(|_| ())
    }

    /// Returns the route catalog in effect.
    pub fn route_catalog(&self) -> ConfigResult<RouteCatalog> {
        match &self.routes {
            Some(routes) => Ok(RouteCatalog::new(routes.clone())?),
            None => Ok(RouteCatalog::console()),
        }
    }

    /// Loads the permission table in effect.
    pub fn permission_table(&self) -> ConfigResult<PermissionTable> {
        match &self.permission_table {
            Some(path) => load_permission_table(path),
            None => Ok(PermissionTable::packaged()?),
        }
    }
}

/// Loads a permission table from a JSON mapping file.
pub fn load_permission_table(path: impl AsRef<std::path::Path>) -> ConfigResult<PermissionTable> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ConfigError::file_not_found(path));
    }

    let content = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    let table = PermissionTable::from_json(&content)
        .map_err(|e| ConfigError::parse(path, e.to_string()))?;

    info!(path = %path.display(), entries = table.len(), "Permission table loaded");
    Ok(table)
}

// =============================================================================
// Logging Configuration
// =============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Log format.
    #[serde(default)]
    pub format: LogFormat,
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Returns the level as a filter directive.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Compact single-line text.
    Compact,
    /// JSON for log aggregation.
    Json,
}

// =============================================================================
// Tests
// =============================================================================
