// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # estate-config
//!
//! Configuration management for the estate admin console.
//!
//! ## Features
//!
//! - **Multi-Format Support**: YAML, TOML, and JSON configuration files
//! - **Environment Overrides**: `ESTATE_*` variables and `${VAR:default}` placeholders
//! - **Access Data**: permission table files and route catalog overrides
//!
//! ## Quick Start
//!
//! ```no_run
//! use estate_config::loader::load_config;
//!
//! let config = load_config("estate.yaml").unwrap();
//! let table = config.permission_table().unwrap();
//! let catalog = config.route_catalog().unwrap();
//!
//! println!("{} table entries, {} pages", table.len(), catalog.len());
//! ```
//!
//! ## Configuration Schema
//!
//! - `console` - listener, login path, CORS
//! - `session` - session cookie attributes
//! - `backend` - REST backend endpoints and timeouts
//! - `access` - permission table file and route catalog
//! - `logging` - level and format

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod loader;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_config, load_config_str, ConfigFormat, ConfigLoader};
pub use schema::{
    load_permission_table, AccessConfig, BackendConfig, ConsoleConfig, CorsConfig, EstateConfig,
    LogFormat, LogLevel, LoggingConfig, SameSite, SessionConfig,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
