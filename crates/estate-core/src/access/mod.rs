// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Route-entry access control.
//!
//! - [`PermissionTable`]: static path to allowed-roles mapping
//! - [`AccessEvaluator`]: the pure `has_access(role, path)` decision
//!
//! # Defaults
//!
//! A missing *identity* is denied. A missing *mapping* is allowed. Any path
//! left out of the table is open to every authenticated role. Use
//! [`crate::RouteCatalog::coverage`] to catch restricted routes that were
//! never added to the table.

mod evaluator;
mod table;

pub use evaluator::{AccessDecision, AccessEvaluator, DenyReason, GrantReason};
pub use table::{PermissionTable, PermissionTableBuilder, TableLint};
