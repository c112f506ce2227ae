// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The access evaluator.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::PermissionTable;
use crate::path;
use crate::role::Role;

// =============================================================================
// AccessDecision
// =============================================================================

/// Why access was granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantReason {
    /// The path has no table entry, so every role may enter.
    Unmapped,
    /// The role is listed for the path.
    RoleListed,
}

/// Why access was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// There is no role to evaluate.
    NoIdentity,
    /// The path is mapped and the role is not listed.
    RoleNotListed,
}

/// The outcome of an access check, with its reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "reason", rename_all = "snake_case")]
pub enum AccessDecision {
    /// Entry is allowed.
    Granted(GrantReason),
    /// Entry is refused.
    Denied(DenyReason),
}

impl AccessDecision {
    /// Returns `true` if entry is allowed.
    pub fn is_granted(&self) -> bool {
        matches!(self, AccessDecision::Granted(_))
    }

    /// Returns `true` if the grant came from the unmapped-path default.
    pub fn is_fail_open(&self) -> bool {
        matches!(self, AccessDecision::Granted(GrantReason::Unmapped))
    }
}

impl fmt::Display for AccessDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessDecision::Granted(GrantReason::Unmapped) => {
                f.write_str("granted (path is unmapped, open to every role)")
            }
            AccessDecision::Granted(GrantReason::RoleListed) => {
                f.write_str("granted (role is listed for path)")
            }
            AccessDecision::Denied(DenyReason::NoIdentity) => f.write_str("denied (no role)"),
            AccessDecision::Denied(DenyReason::RoleNotListed) => {
                f.write_str("denied (role is not listed for path)")
            }
        }
    }
}

// =============================================================================
// AccessEvaluator
// =============================================================================

/// Decides whether a role may enter a path.
///
/// The evaluator is a pure function of `(role, path, table)`: it never
/// fails, has no side effects and caches nothing.
///
/// | role    | table entry for path | result                          |
/// |---------|----------------------|---------------------------------|
/// | absent  | any                  | denied                          |
/// | present | none                 | granted (fail-open)             |
/// | present | `{allowed}`          | `allowed` contains lowercase role |
#[derive(Debug, Clone)]
pub struct AccessEvaluator {
    table: Arc<PermissionTable>,
}

impl AccessEvaluator {
    /// Creates an evaluator over `table`.
    pub fn new(table: Arc<PermissionTable>) -> Self {
        Self { table }
    }

    /// Returns the underlying table.
    pub fn table(&self) -> &PermissionTable {
        &self.table
    }

    /// Returns the decision for `role` on `path`, with its reason.
    ///
    /// The path is normalized before lookup so that a trailing slash or a
    /// query string cannot step around a mapped entry.
    pub fn decide(&self, role: Option<&Role>, path: &str) -> AccessDecision {
        let Some(role) = role else {
            return AccessDecision::Denied(DenyReason::NoIdentity);
        };

        let path = path::normalize(path);
        match self.table.roles_for(&path) {
            None => AccessDecision::Granted(GrantReason::Unmapped),
            Some(allowed) if allowed.contains(role.normalized().as_str()) => {
                AccessDecision::Granted(GrantReason::RoleListed)
            }
            Some(_) => AccessDecision::Denied(DenyReason::RoleNotListed),
        }
    }

    /// Returns `true` if `role` may enter `path`.
    pub fn has_access(&self, role: Option<&Role>, path: &str) -> bool {
        self.decide(role, path).is_granted()
    }

    /// Route-entry capability.
    ///
    /// This is the permission-table side of access control. Menu visibility
    /// is a separate capability ([`crate::can_see_menu_item`]) driven by the
    /// backend and may disagree with this one.
    pub fn can_enter_route(&self, role: Option<&Role>, path: &str) -> bool {
        self.has_access(role, path)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluator() -> AccessEvaluator {
        let table = PermissionTable::builder()
            .allow("/admin/role-permissions", ["admin"])
            .allow("/properties", ["admin", "manager"])
            .allow("/legacy", ["Admin"])
            .build();
        AccessEvaluator::new(Arc::new(table))
    }

    fn role(s: &str) -> Role {
        Role::new(s).unwrap()
    }

    #[test]
    fn test_unmapped_path_is_open() {
        let ev = evaluator();
        assert_eq!(
            ev.decide(Some(&role("user")), "/community"),
            AccessDecision::Granted(GrantReason::Unmapped)
        );
        assert!(ev.has_access(Some(&role("auditor")), "/community"));
    }

    #[test]
    fn test_missing_role_is_denied_even_when_unmapped() {
        let ev = evaluator();
        assert_eq!(
            ev.decide(None, "/community"),
            AccessDecision::Denied(DenyReason::NoIdentity)
        );
        assert!(!ev.has_access(None, "/properties"));
    }

    #[test]
    fn test_role_is_lowercased_before_matching() {
        let ev = evaluator();
        assert!(!ev.has_access(Some(&role("Manager")), "/admin/role-permissions"));
        assert!(ev.has_access(Some(&role("Manager")), "/community"));
        assert!(ev.has_access(Some(&role("MANAGER")), "/properties"));
        assert!(ev.has_access(Some(&role("ADMIN")), "/admin/role-permissions"));
    }

    #[test]
    fn test_role_whitespace_is_not_trimmed() {
        let ev = evaluator();
        assert!(!ev.has_access(Some(&role(" admin")), "/admin/role-permissions"));
        assert!(!ev.has_access(Some(&role("manager ")), "/properties"));
    }

    #[test]
    fn test_table_entries_are_not_lowercased() {
        let ev = evaluator();
        assert!(!ev.has_access(Some(&role("admin")), "/legacy"));
        assert!(!ev.has_access(Some(&role("Admin")), "/legacy"));
    }

    #[test]
    fn test_mapped_path_cannot_be_bypassed_by_suffix() {
        let ev = evaluator();
        let user = role("user");
        assert!(!ev.has_access(Some(&user), "/properties/"));
        assert!(!ev.has_access(Some(&user), "/properties?tab=units"));
    }

    #[test]
    fn test_no_prefix_matching() {
        let ev = evaluator();
        // A child path of a mapped path is its own, unmapped path.
        assert!(ev.decide(Some(&role("user")), "/properties/12").is_fail_open());
    }

    #[test]
    fn test_can_enter_route_matches_has_access() {
        let ev = evaluator();
        for r in ["admin", "manager", "user"] {
            for p in ["/properties", "/community", "/admin/role-permissions"] {
                assert_eq!(
                    ev.can_enter_route(Some(&role(r)), p),
                    ev.has_access(Some(&role(r)), p)
                );
            }
        }
    }

    #[test]
    fn test_decision_serialization() {
        let granted = serde_json::to_value(AccessDecision::Granted(GrantReason::Unmapped)).unwrap();
        assert_eq!(granted["decision"], "granted");
        assert_eq!(granted["reason"], "unmapped");
    }
}
