// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types for the access-control core.
//!
//! Two families exist:
//!
//! ```text
//! CoreError  - authoring and construction problems (roles, paths, tables, routes)
//! MenuError  - a menu response that cannot be turned into a tree
//! ```
//!
//! Access decisions themselves never fail. Missing data degrades to the
//! documented default instead of producing an error.

use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// CoreError
// =============================================================================

/// Errors raised while constructing or validating access-control data.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A role string failed validation.
    #[error("Invalid role: {message}")]
    InvalidRole {
        /// Error message.
        message: String,
    },

    /// A session token failed validation.
    #[error("Invalid session token: {message}")]
    InvalidToken {
        /// Error message.
        message: String,
    },

    /// A path is not a normalized route path.
    #[error("Invalid path '{path}': {message}")]
    InvalidPath {
        /// The offending path.
        path: String,
        /// Error message.
        message: String,
    },

    /// The permission table could not be read.
    #[error("Invalid permission table: {message}")]
    PermissionTable {
        /// Error message.
        message: String,
    },

    /// Restricted routes have no permission table entry.
    #[error("Restricted routes missing from the permission table: {}", paths.join(", "))]
    UnmappedRoutes {
        /// The restricted routes without an entry.
        paths: Vec<String>,
    },

    /// A route catalog entry is invalid.
    #[error("Invalid route catalog: {message}")]
    RouteCatalog {
        /// Error message.
        message: String,
    },

    /// JSON serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// Creates an invalid role error.
    pub fn invalid_role(message: impl Into<String>) -> Self {
        Self::InvalidRole {
            message: message.into(),
        }
    }

    /// Creates an invalid token error.
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken {
            message: message.into(),
        }
    }

    /// Creates an invalid path error.
    pub fn invalid_path(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a permission table error.
    pub fn permission_table(message: impl Into<String>) -> Self {
        Self::PermissionTable {
            message: message.into(),
        }
    }

    /// Creates a route catalog error.
    pub fn route_catalog(message: impl Into<String>) -> Self {
        Self::RouteCatalog {
            message: message.into(),
        }
    }

    /// Returns the error type as a string for logging.
    pub fn error_type(&self) -> &'static str {
        match self {
            CoreError::InvalidRole { .. } => "invalid_role",
            CoreError::InvalidToken { .. } => "invalid_token",
            CoreError::InvalidPath { .. } => "invalid_path",
            CoreError::PermissionTable { .. } => "permission_table",
            CoreError::UnmappedRoutes { .. } => "unmapped_routes",
            CoreError::RouteCatalog { .. } => "route_catalog",
            CoreError::Serialization(_) => "serialization",
        }
    }
}

// =============================================================================
// MenuError
// =============================================================================

/// Errors produced while turning a menu response into a tree.
///
/// Every variant results in an empty menu plus a visible error state; a
/// partial tree is never produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MenuError {
    /// The backend reported failure (`success: false`).
    #[error("Menu request was rejected by the backend")]
    Rejected,

    /// The response does not have the expected shape.
    #[error("Malformed menu response: {message}")]
    Malformed {
        /// Error message.
        message: String,
    },

    /// Two records share the same identifier.
    #[error("Duplicate menu identifier: {id}")]
    DuplicateId {
        /// The duplicated identifier.
        id: u64,
    },

    /// The menu could not be fetched at all.
    #[error("Menu unavailable: {message}")]
    Unavailable {
        /// Error message.
        message: String,
    },
}

impl MenuError {
    /// Creates a malformed response error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Returns a message suitable for the navigation area.
    pub fn user_message(&self) -> String {
        match self {
            MenuError::Unavailable { .. } => "Menu is temporarily unavailable".to_string(),
            _ => "Menu could not be loaded".to_string(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
