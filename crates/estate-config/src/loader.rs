// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration loading.
//!
//! # Loading Pipeline
//!
//! 1. Read the file and pick the format from its extension
//! 2. Substitute `${VAR}` / `${VAR:default}` placeholders
//! 3. Parse into [`EstateConfig`]
//! 4. Apply `ESTATE_*` environment overrides
//! 5. Resolve the permission table path against the config directory
//! 6. Validate
//!
//! # Environment Variable Override
//!
//! ```text
//! ESTATE_CONSOLE_PORT=9090
//! ESTATE_CONSOLE_BIND_ADDRESS=127.0.0.1
//! ESTATE_BACKEND_URL=https://api.example.com
//! ESTATE_SESSION_SECURE=true
//! ESTATE_SESSION_SECRET=change-me-to-32-or-more-characters
//! ESTATE_LOG_LEVEL=debug
//! ESTATE_LOG_FORMAT=json
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::schema::{EstateConfig, LogFormat, LogLevel};

// =============================================================================
// ConfigLoader
// =============================================================================

/// Configuration loader for the estate console.
///
/// ```no_run
/// use estate_config::loader::ConfigLoader;
///
/// let config = ConfigLoader::new().load("estate.yaml").unwrap();
/// println!("listening on port {}", config.console.port);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Directory a relative `access.permission_table` is joined onto.
    /// Defaults to the config file's directory.
    base_path: Option<PathBuf>,
    /// Placeholders and `ESTATE_*` overrides.
    resolve_env_vars: bool,
}

const ENV_PREFIX: &str = "ESTATE";

impl ConfigLoader {
    /// Creates a loader with default settings.
    pub fn new() -> Self {
        Self {
            base_path: None,
            resolve_env_vars: true,
        }
    }

    /// Overrides the directory relative table paths resolve against.
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Tests turn this off to stay independent of the process environment.
    pub fn with_env_vars(mut self, enabled: bool) -> Self {
        self.resolve_env_vars = enabled;
        self
    }

    /// Loads configuration from a `.yaml`, `.yml`, `.toml` or `.json` file.
    pub fn load(&self, path: impl AsRef<Path>) -> ConfigResult<EstateConfig> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading console configuration");

        let base_path = self.base_path.clone().unwrap_or_else(|| {
            path.parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."))
        });

        let content = self.read_file(path)?;
        let format = ConfigFormat::from_path(path)?;
        let mut config = self.parse_content(&content, format, path)?;

        if self.resolve_env_vars {
            self.apply_env_overrides(&mut config)?;
        }

        self.resolve_relative_paths(&mut config, &base_path);

        config.validate()?;

        info!("Console configuration loaded");
        debug!(
            port = config.console.port,
            backend = %config.backend.base_url,
            custom_table = config.access.permission_table.is_some(),
            custom_routes = config.access.routes.is_some(),
            "Effective configuration"
        );

        Ok(config)
    }

    /// Loads configuration from a string.
    pub fn load_from_str(&self, content: &str, format: ConfigFormat) -> ConfigResult<EstateConfig> {
        let content = if self.resolve_env_vars {
            self.resolve_env_placeholders(content)?
        } else {
            content.to_string()
        };

        let mut config = parse_str(&content, format)?;

        if self.resolve_env_vars {
            self.apply_env_overrides(&mut config)?;
        }

        if let Some(base_path) = &self.base_path {
            self.resolve_relative_paths(&mut config, base_path);
        }

        config.validate()?;
        Ok(config)
    }

    fn read_file(&self, path: &Path) -> ConfigResult<String> {
        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))
    }

    fn parse_content(
        &self,
        content: &str,
        format: ConfigFormat,
        path: &Path,
    ) -> ConfigResult<EstateConfig> {
        let content = if self.resolve_env_vars {
            self.resolve_env_placeholders(content)?
        } else {
            content.to_string()
        };

        parse_str(&content, format).map_err(|e| e.at(path))
    }

    /// Substitutes `${VAR}` and `${VAR:default}` placeholders.
    ///
    /// Unset variables without a default are left in place.
    fn resolve_env_placeholders(&self, content: &str) -> ConfigResult<String> {
        let mut result = String::with_capacity(content.len());
        let mut rest = content;

        while let Some(start) = rest.find("${") {
            result.push_str(&rest[..start]);
            let after = &rest[start + 2..];

            let Some(end) = after.find('}') else {
                result.push_str(&rest[start..]);
                return Ok(result);
            };

            let inner = &after[..end];
            let (name, default) = match inner.split_once(':') {
                Some((name, default)) => (name, Some(default)),
                None => (inner, None),
            };

            match (env::var(name), default) {
                (Ok(value), _) => result.push_str(&value),
                (Err(_), Some(default)) => result.push_str(default),
                (Err(_), None) => {
                    warn!("Environment variable '{}' not found", name);
                    result.push_str(&rest[start..start + 2 + end + 1]);
                }
            }

            rest = &after[end + 1..];
        }

        result.push_str(rest);
        Ok(result)
    }

    fn env_name(&self, suffix: &str) -> String {
        format!("{}_{}", ENV_PREFIX, suffix)
    }

    fn apply_env_overrides(&self, config: &mut EstateConfig) -> ConfigResult<()> {
        let name = self.env_name("CONSOLE_PORT");
        if let Ok(value) = env::var(&name) {
            config.console.port = value
                .parse()
                .map_err(|_| ConfigError::env_var(&name, "expected valid port number"))?;
        }

        let name = self.env_name("CONSOLE_BIND_ADDRESS");
        if let Ok(value) = env::var(&name) {
            config.console.bind_address = value
                .parse()
                .map_err(|_| ConfigError::env_var(&name, "expected an IP address"))?;
        }

        if let Ok(value) = env::var(self.env_name("BACKEND_URL")) {
            config.backend.base_url = value;
        }

        if let Ok(value) = env::var(self.env_name("SESSION_SECURE")) {
            config.session.secure = parse_bool(&value);
        }

        if let Ok(value) = env::var(self.env_name("SESSION_SECRET")) {
            config.session.secret = Some(value);
        }

        let name = self.env_name("LOG_LEVEL");
        if let Ok(value) = env::var(&name) {
            config.logging.level = parse_log_level(&value)
                .ok_or_else(|| ConfigError::env_var(&name, "expected a log level"))?;
        }

        let name = self.env_name("LOG_FORMAT");
        if let Ok(value) = env::var(&name) {
            config.logging.format = parse_log_format(&value)
                .ok_or_else(|| ConfigError::env_var(&name, "expected text, compact or json"))?;
        }

        if let Ok(value) = env::var(self.env_name("PERMISSION_TABLE")) {
            config.access.permission_table = Some(PathBuf::from(value));
        }

        Ok(())
    }

    fn resolve_relative_paths(&self, config: &mut EstateConfig, base_path: &Path) {
        if let Some(table) = config.access.permission_table.as_mut() {
            if table.is_relative() {
                *table = base_path.join(&*table);
            }
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// ConfigFormat
// =============================================================================

/// File formats the loader reads, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.yaml` / `.yml`, parsed through the `config` crate.
    Yaml,
    /// `.toml`.
    Toml,
    /// `.json`.
    Json,
}

impl ConfigFormat {
    /// Picks the format from the extension, case-insensitively.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            Some(other) => Err(ConfigError::unsupported_format(other)),
            None => Err(ConfigError::unsupported_format("(no extension)")),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_str<T: DeserializeOwned>(content: &str, format: ConfigFormat) -> ConfigResult<T> {
    match format {
        ConfigFormat::Yaml => parse_yaml(content),
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(ConfigError::syntax)
        }
        ConfigFormat::Json => {
            serde_json::from_str(content).map_err(ConfigError::syntax)
        }
    }
}

/// YAML goes through the config crate.
fn parse_yaml<T: DeserializeOwned>(content: &str) -> ConfigResult<T> {
    let config = config::Config::builder()
        .add_source(config::File::from_str(content, config::FileFormat::Yaml))
        .build()
        .map_err(ConfigError::syntax)?;

    config
        .try_deserialize()
        .map_err(ConfigError::syntax)
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.to_lowercase().as_str(),
        "true" | "1" | "yes" | "on" | "enabled"
    )
}

fn parse_log_level(value: &str) -> Option<LogLevel> {
    match value.to_lowercase().as_str() {
        "trace" => Some(LogLevel::Trace),
        "debug" => Some(LogLevel::Debug),
        "info" => Some(LogLevel::Info),
        "warn" | "warning" => Some(LogLevel::Warn),
        "error" => Some(LogLevel::Error),
        _ => None,
    }
}

fn parse_log_format(value: &str) -> Option<LogFormat> {
    match value.to_lowercase().as_str() {
        "text" | "pretty" => Some(LogFormat::Text),
        "compact" => Some(LogFormat::Compact),
        "json" => Some(LogFormat::Json),
        _ => None,
    }
}

// =============================================================================
// Convenience Functions
// =============================================================================

/// Loads configuration from a file with default settings.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<EstateConfig> {
    ConfigLoader::new().load(path)
}

/// Loads configuration from a string with the specified format.
pub fn load_config_str(content: &str, format: ConfigFormat) -> ConfigResult<EstateConfig> {
    ConfigLoader::new().load_from_str(content, format)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_yaml() -> String {
        r#"
console:
  port: 9090
  login_path: /signin

session:
  secure: true
  same_site: strict

backend:
  base_url: https://api.example.com
  menu_timeout_ms: 1500

logging:
  level: debug
  format: json
"#
        .to_string()
    }

    #[test]
    fn test_load_yaml() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        file.write_all(create_test_yaml().as_bytes()).unwrap();

        let config = ConfigLoader::new().with_env_vars(false).load(file.path()).unwrap();

        assert_eq!(config.console.port, 9090);
        assert_eq!(config.console.login_path, "/signin");
        assert!(config.session.secure);
        assert_eq!(config.backend.base_url, "https://api.example.com");
        assert_eq!(config.backend.menu_timeout_ms, 1500);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_load_toml() {
        let toml = r#"
[console]
port = 8181

[access]
permission_table = "tables/permissions.json"
"#;
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        file.write_all(toml.as_bytes()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let tables = dir.path().join("tables");
        fs::create_dir_all(&tables).unwrap();
        fs::write(tables.join("permissions.json"), r#"{"/units":["admin"]}"#).unwrap();

        let config = ConfigLoader::new()
            .with_env_vars(false)
            .with_base_path(dir.path())
            .load(file.path())
            .unwrap();

        assert_eq!(config.console.port, 8181);
        let table_path = config.access.permission_table.clone().unwrap();
        assert_eq!(table_path, dir.path().join("tables/permissions.json"));

        let table = config.permission_table().unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.contains("/units"));
    }

    #[test]
    fn test_empty_document_yields_defaults() {
        let config = ConfigLoader::new()
            .with_env_vars(false)
            .load_from_str("{}", ConfigFormat::Json)
            .unwrap();
        assert_eq!(config.console.port, crate::schema::DEFAULT_CONSOLE_PORT);
        assert!(config.access.routes.is_none());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let result = ConfigLoader::new()
            .with_env_vars(false)
            .load_from_str("[console]\nprot = 1\n", ConfigFormat::Toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_routes_override() {
        let yaml = r#"
access:
  routes:
    - path: /dashboard
      title: Dashboard
      access: open
    - path: /reports
      title: Reports
      access: restricted
"#;
        let config = ConfigLoader::new()
            .with_env_vars(false)
            .load_from_str(yaml, ConfigFormat::Yaml)
            .unwrap();

        let catalog = config.route_catalog().unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.find("/reports").is_some());
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let result = ConfigLoader::new()
            .with_env_vars(false)
            .load_from_str("[backend]\nbase_url = \"localhost\"\n", ConfigFormat::Toml);
        assert!(matches!(result, Err(ConfigError::Validation { .. })));
    }

    #[test]
    fn test_config_format_from_path() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("estate.yml")).unwrap(),
            ConfigFormat::Yaml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("estate.toml")).unwrap(),
            ConfigFormat::Toml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("estate.JSON")).unwrap(),
            ConfigFormat::Json
        );
        assert!(ConfigFormat::from_path(Path::new("estate.ini")).is_err());
        assert!(ConfigFormat::from_path(Path::new("estate")).is_err());
    }

    #[test]
    fn test_env_placeholder_with_default() {
        let loader = ConfigLoader::new();
        let result = loader
            .resolve_env_placeholders("url: ${ESTATE_TEST_NONEXISTENT_VAR:http://fallback}/api")
            .unwrap();
        assert_eq!(result, "url: http://fallback/api");
    }

    #[test]
    fn test_env_placeholder_without_default_is_kept() {
        let loader = ConfigLoader::new();
        let result = loader
            .resolve_env_placeholders("a: ${ESTATE_TEST_NONEXISTENT_VAR} b: ${unterminated")
            .unwrap();
        assert_eq!(result, "a: ${ESTATE_TEST_NONEXISTENT_VAR} b: ${unterminated");
    }

    #[test]
    fn test_env_placeholder_resolution() {
        let loader = ConfigLoader::new();
        let result = loader.resolve_env_placeholders("value: ${PATH}").unwrap();
        assert!(result.starts_with("value: "));
        assert!(!result.contains("${PATH}") || env::var("PATH").is_err());
    }

    #[test]
    fn test_parse_helpers() {
        assert!(parse_bool("true"));
        assert!(parse_bool("On"));
        assert!(!parse_bool("off"));
        assert_eq!(parse_log_level("WARNING"), Some(LogLevel::Warn));
        assert_eq!(parse_log_level("loud"), None);
        assert_eq!(parse_log_format("json"), Some(LogFormat::Json));
        assert_eq!(parse_log_format("xml"), None);
    }

    #[test]
    fn test_file_not_found() {
        let result = ConfigLoader::new().load("/nonexistent/path/estate.yaml");
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }
}
