// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # estate-bin
//!
//! Command-line entry point for the estate admin console.
//!
//! ```text
//!   main.rs ──► cli.rs ──► commands ──► runtime ──► estate-api server
//!                              │            │
//!                              │            └──► shutdown (SIGINT/SIGTERM)
//!                              └──► estate-config / estate-core
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Serve the console (default command)
//! estate -c /etc/estate/estate.yaml
//!
//! # Check config, permission table and route coverage
//! estate validate --strict
//!
//! # List console pages and who may enter them
//! estate routes --format json
//!
//! # Explain a single access decision
//! estate check-access manager /admin/role-permissions
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod runtime;
pub mod shutdown;

// =============================================================================
// Re-exports
// =============================================================================

pub use cli::{Cli, Commands};
pub use error::{BinError, BinResult};
pub use logging::init_logging;
pub use runtime::{ConsoleRuntime, RuntimeBuilder};
pub use shutdown::ShutdownCoordinator;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
