// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! Pre-built identities, menus, permission tables and config files.

use std::sync::Arc;

use estate_core::{AccessEvaluator, Identity, KnownRole, MenuRecord, PermissionTable, Role};

// =============================================================================
// Identity Fixtures
// =============================================================================

/// Identities for the shipped roles.
pub struct IdentityFixtures;

impl IdentityFixtures {
    /// An administrator.
    pub fn admin() -> Identity {
        Identity::new(KnownRole::Admin.into(), "Ada Admin", "ada@example.com")
    }

    /// A property manager.
    pub fn manager() -> Identity {
        Identity::new(KnownRole::Manager.into(), "Max Manager", "max@example.com")
    }

    /// A resident.
    pub fn user() -> Identity {
        Identity::new(KnownRole::User.into(), "Uma User", "uma@example.com")
    }

    /// An identity with an arbitrary role label.
    pub fn with_role(role: &str) -> Identity {
        Identity::new(
            Role::new(role).expect("fixture role must not be blank"),
            "Test Person",
            "test@example.com",
        )
    }
}

// =============================================================================
// Permission Table Fixtures
// =============================================================================

/// Permission tables.
pub struct TableFixtures;

impl TableFixtures {
    /// The table packaged with the console.
    pub fn packaged() -> Arc<PermissionTable> {
        Arc::new(PermissionTable::packaged().expect("packaged table must parse"))
    }

    /// An evaluator over the packaged table.
    pub fn packaged_evaluator() -> AccessEvaluator {
        AccessEvaluator::new(Self::packaged())
    }

    /// A small table for focused tests.
    pub fn small() -> Arc<PermissionTable> {
        Arc::new(
            PermissionTable::builder()
                .allow("/admin/role-permissions", ["admin"])
                .allow("/properties", ["admin", "manager"])
                .build(),
        )
    }

    /// JSON text of a table covering every restricted console page.
    pub fn console_json() -> &'static str {
        r#"{
  "/admin/users": ["admin"],
  "/admin/roles": ["admin"],
  "/admin/role-permissions": ["admin"],
  "/admin/menus": ["admin"],
  "/properties": ["admin", "manager"],
  "/units": ["admin", "manager"]
}"#
    }
}

// =============================================================================
// Menu Fixtures
// =============================================================================

/// Menu records as the backend delivers them.
pub struct MenuFixtures;

impl MenuFixtures {
    /// Two groups with children, one item inaccessible.
    pub fn console() -> Vec<MenuRecord> {
        vec![
            MenuRecord::root(1, "Community", "/community").with_icon("home"),
            MenuRecord::root(2, "Administration", "/admin").with_icon("settings"),
            MenuRecord::child(10, 1, "Properties", "/properties"),
            MenuRecord::child(11, 1, "Units", "/units"),
            MenuRecord::child(20, 2, "Users", "/admin/users"),
            MenuRecord::child(21, 2, "Role Permissions", "/admin/role-permissions").accessible(false),
        ]
    }

    /// Children listed before their parents.
    pub fn children_first() -> Vec<MenuRecord> {
        vec![
            MenuRecord::child(10, 1, "Properties", "/properties"),
            MenuRecord::child(11, 1, "Units", "/units"),
            MenuRecord::root(1, "Community", "/community"),
        ]
    }

    /// One orphan and a two-record cycle next to a valid root.
    pub fn broken_links() -> Vec<MenuRecord> {
        vec![
            MenuRecord::root(1, "Community", "/community"),
            MenuRecord::child(2, 99, "Orphan", "/orphan"),
            MenuRecord::child(3, 4, "Loop A", "/loop-a"),
            MenuRecord::child(4, 3, "Loop B", "/loop-b"),
        ]
    }

    /// Two records sharing an identifier.
    pub fn duplicate_ids() -> Vec<MenuRecord> {
        vec![
            MenuRecord::root(1, "Community", "/community"),
            MenuRecord::root(1, "Again", "/again"),
        ]
    }
}

// =============================================================================
// Config Fixtures
// =============================================================================

/// Config file contents.
pub struct ConfigFixtures;

impl ConfigFixtures {
    /// A complete YAML configuration.
    pub fn yaml() -> &'static str {
        r#"
console:
  bind_address: 127.0.0.1
  port: 9443
  login_path: /signin
  request_timeout_secs: 15
session:
  secure: true
  same_site: strict
backend:
  base_url: https://api.example.com/v1
  menu_timeout_ms: 1500
logging:
  level: debug
  format: json
"#
    }

    /// A minimal TOML configuration pointing at `permissions.json`.
    pub fn toml_with_table() -> &'static str {
        r#"
[console]
port = 8181

[access]
permission_table = "permissions.json"
"#
    }
}
