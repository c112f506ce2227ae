// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # estate-core
//!
//! Access-control core for the estate admin console.
//!
//! The console is a browser shell over a REST backend. Everything that
//! decides *who may see what* lives here, free of HTTP concerns:
//!
//! - [`access`]: the static permission table and the access evaluator
//! - [`session`]: identity, token and the persisted session store
//! - [`guard`]: the authentication gate and the role gate
//! - [`navigation`]: menu records from the backend composed into a tree
//! - [`routes`]: the console's page catalog and its permission coverage
//!
//! ## Two sources of truth
//!
//! Route entry is decided by the [`PermissionTable`] through
//! [`AccessEvaluator::can_enter_route`]. Menu visibility is decided by the
//! backend's per-item flag through [`can_see_menu_item`]. The two are never
//! merged and may disagree.
//!
//! ```
//! use std::sync::Arc;
//! use estate_core::{AccessEvaluator, PermissionTable, Role};
//!
//! let table = PermissionTable::builder()
//!     .allow("/admin/role-permissions", ["admin"])
//!     .build();
//! let evaluator = AccessEvaluator::new(Arc::new(table));
//!
//! let manager = Role::new("Manager").unwrap();
//! assert!(!evaluator.has_access(Some(&manager), "/admin/role-permissions"));
//! assert!(evaluator.has_access(Some(&manager), "/community"));
//! assert!(!evaluator.has_access(None, "/community"));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod access;
pub mod error;
pub mod guard;
pub mod navigation;
pub mod path;
pub mod role;
pub mod routes;
pub mod session;

// =============================================================================
// Re-exports
// =============================================================================

pub use access::{AccessDecision, AccessEvaluator, DenyReason, GrantReason, PermissionTable, TableLint};
pub use error::{CoreError, CoreResult, MenuError};
pub use guard::{AuthDecision, AuthGate, GuardOutcome, RoleDecision, RoleGate, RouteGuard};
pub use navigation::{
    can_see_menu_item, MenuNode, MenuPayload, MenuRecord, MenuState, MenuTree, NavigationComposer,
    MAX_MENU_DEPTH,
};
pub use role::{KnownRole, Role};
pub use routes::{CoverageReport, RouteAccess, RouteCatalog, RouteSpec};
pub use session::{
    Identity, MemoryStorage, Session, SessionState, SessionStorage, SessionStore, SessionToken,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
