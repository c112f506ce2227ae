// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types for the `estate` binary.
//!
//! | Exit code | Cause |
//! |---|---|
//! | 1 | configuration file or permission table could not be used |
//! | 2 | backend client could not be created |
//! | 3 | console server failed to start or stopped with an error |
//! | 4 | access control is inconsistent (e.g. unmapped restricted page) |
//! | 5 | `estate validate` found problems |
//! | 6 | I/O failure |
//! | 7 | any other runtime failure |

use estate_api::{ApiError, BackendError};
use estate_config::ConfigError;
use estate_core::CoreError;
use thiserror::Error;

/// Result type alias for estate-bin operations.
pub type BinResult<T> = Result<T, BinError>;

/// Errors surfaced by the `estate` binary.
#[derive(Debug, Error)]
pub enum BinError {
    /// The configuration could not be loaded or is invalid.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The HTTP client for the REST backend could not be built.
    #[error("Backend client could not be created: {0}")]
    BackendClient(#[from] BackendError),

    /// The console server failed.
    #[error("Console server failed: {0}")]
    Server(#[from] ApiError),

    /// Permission table and route catalog disagree.
    #[error("Access control is misconfigured: {0}")]
    AccessControl(#[from] CoreError),

    /// `estate validate` reported problems.
    #[error("Validation found {problems} problem(s){}", strict_suffix(.strict))]
    ValidationFailed {
        /// Number of problems counted.
        problems: usize,
        /// Whether warnings were counted as problems.
        strict: bool,
    },

    /// I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other failure at the binary boundary.
    #[error("{0}")]
    Runtime(String),

    /// An error with the step that produced it.
    #[error("{context}: {source}")]
    Context {
        /// What was being done.
        context: String,
        /// The underlying error.
        #[source]
        source: Box<BinError>,
    },
}

fn strict_suffix(strict: &bool) -> &'static str {
    if *strict { " in strict mode" } else { "" }
}

impl BinError {
    /// Wraps the error with the step that produced it.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 1,
            Self::BackendClient(_) => 2,
            Self::Server(_) => 3,
            Self::AccessControl(_) => 4,
            Self::ValidationFailed { .. } => 5,
            Self::Io(_) => 6,
            Self::Runtime(_) => 7,
            Self::Context { source, .. } => source.exit_code(),
        }
    }
}

impl From<anyhow::Error> for BinError {
    fn from(err: anyhow::Error) -> Self {
        Self::Runtime(format!("{:#}", err))
    }
}

// =============================================================================
// Error Reporting
// =============================================================================

/// Prints `error` and its causes to stderr.
pub fn report_error(error: &BinError) {
    eprintln!("estate: {}", error);

    let mut cause = std::error::Error::source(error);
    while let Some(err) = cause {
        eprintln!("  caused by: {}", err);
        cause = err.source();
    }
}

/// Prints `error` and exits with its code.
pub fn report_error_and_exit(error: BinError) -> ! {
    report_error(&error);
    std::process::exit(error.exit_code())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message() {
        let err = BinError::ValidationFailed {
            problems: 2,
            strict: true,
        };
        assert_eq!(err.to_string(), "Validation found 2 problem(s) in strict mode");
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn test_context_keeps_exit_code() {
        let err = BinError::from(ConfigError::file_not_found("/etc/estate.yaml"))
            .with_context("loading /etc/estate.yaml");
        assert!(err.to_string().starts_with("loading /etc/estate.yaml: "));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_unmapped_routes_exit_code() {
        let err = BinError::from(CoreError::UnmappedRoutes {
            paths: vec!["/billing".to_string()],
        });
        assert_eq!(err.exit_code(), 4);
        assert!(err.to_string().contains("/billing"));
    }

    #[test]
    fn test_backend_client_exit_code() {
        assert_eq!(BinError::from(BackendError::Timeout).exit_code(), 2);
    }

    #[test]
    fn test_anyhow_boundary() {
        let err: BinError = anyhow::anyhow!("listener closed").context("serving").into();
        assert_eq!(err.exit_code(), 7);
        assert_eq!(err.to_string(), "serving: listener closed");
    }
}
