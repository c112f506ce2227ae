// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The permission table.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::path;

/// The table shipped with the console, in the on-disk mapping format.
const PACKAGED_TABLE: &str = include_str!("../../permissions.json");

// =============================================================================
// PermissionTable
// =============================================================================

/// Immutable mapping from route path to the roles allowed to enter it.
///
/// The on-disk format is a JSON object of path to an array of lowercase
/// role strings:
///
/// ```json
/// { "/admin/users": ["admin"], "/properties": ["admin", "manager"] }
/// ```
///
/// Role entries are stored exactly as authored. Only the *requesting* role
/// is lower-cased during evaluation, so entries that are not lowercase can
/// never match (see [`PermissionTable::lint`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PermissionTable {
    entries: BTreeMap<String, BTreeSet<String>>,
}

impl PermissionTable {
    /// Creates an empty table. Every path is unmapped.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a builder.
    pub fn builder() -> PermissionTableBuilder {
        PermissionTableBuilder::new()
    }

    /// Parses a table from its JSON mapping format.
    pub fn from_json(content: &str) -> CoreResult<Self> {
        let raw: BTreeMap<String, Vec<String>> = serde_json::from_str(content)
            .map_err(|e| CoreError::permission_table(e.to_string()))?;

        let entries = raw
            .into_iter()
            .map(|(path, roles)| (path, roles.into_iter().collect()))
            .collect();

        Ok(Self { entries })
    }

    /// Returns the table packaged with the console.
    pub fn packaged() -> CoreResult<Self> {
        Self::from_json(PACKAGED_TABLE)
    }

    /// Looks up the roles allowed on `path`.
    ///
    /// `None` means the path is unmapped, which callers must treat as
    /// "no restriction".
    pub fn roles_for(&self, path: &str) -> Option<&BTreeSet<String>> {
        self.entries.get(path)
    }

    /// Returns `true` if `path` has an entry.
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Iterates over the mapped paths in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterates over all entries in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.entries.iter().map(|(path, roles)| (path.as_str(), roles))
    }

    /// Returns the number of mapped paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no path is mapped.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reports authoring problems.
    ///
    /// Linting never changes evaluation. A path with a lint still behaves
    /// exactly as written.
    pub fn lint(&self) -> Vec<TableLint> {
        let mut lints = Vec::new();

        for (path, roles) in &self.entries {
            if !path::is_normalized(path) {
                lints.push(TableLint::UnnormalizedPath { path: path.clone() });
            }
            if roles.is_empty() {
                lints.push(TableLint::EmptyRoleSet { path: path.clone() });
            }
            for role in roles {
                if *role != role.to_lowercase() || role.trim() != role {
                    lints.push(TableLint::NonLowercaseRole {
                        path: path.clone(),
                        role: role.clone(),
                    });
                }
            }
        }

        lints
    }
}

// =============================================================================
// TableLint
// =============================================================================

/// An authoring problem found in a permission table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableLint {
    /// The key is not a normalized path, so no request path will ever equal it.
    UnnormalizedPath {
        /// The key as authored.
        path: String,
    },
    /// A role entry is not lowercase, so no role will ever match it.
    NonLowercaseRole {
        /// The path carrying the entry.
        path: String,
        /// The entry as authored.
        role: String,
    },
    /// The path denies every role.
    EmptyRoleSet {
        /// The path with no roles.
        path: String,
    },
}

impl fmt::Display for TableLint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableLint::UnnormalizedPath { path } => {
                write!(f, "'{}' is not a normalized path and can never match", path)
            }
            TableLint::NonLowercaseRole { path, role } => {
                write!(f, "role '{}' on '{}' is not lowercase and can never match", role, path)
            }
            TableLint::EmptyRoleSet { path } => {
                write!(f, "'{}' lists no roles and denies everyone", path)
            }
        }
    }
}

// =============================================================================
// PermissionTableBuilder
// =============================================================================

/// Builder for [`PermissionTable`].
#[derive(Debug, Default)]
pub struct PermissionTableBuilder {
    entries: BTreeMap<String, BTreeSet<String>>,
}

impl PermissionTableBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allows `roles` on `path`, adding to any roles already listed.
    pub fn allow<I, R>(mut self, path: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        self.entries
            .entry(path.into())
            .or_default()
            .extend(roles.into_iter().map(Into::into));
        self
    }

    /// Builds the table.
    pub fn build(self) -> PermissionTable {
        PermissionTable {
            entries: self.entries,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packaged_table_parses() {
        let table = PermissionTable::packaged().unwrap();
        assert!(!table.is_empty());
        assert!(table.lint().is_empty());

        let roles = table.roles_for("/admin/role-permissions").unwrap();
        assert!(roles.contains("admin"));
        assert!(!roles.contains("manager"));
    }

    #[test]
    fn test_unmapped_path_has_no_entry() {
        let table = PermissionTable::packaged().unwrap();
        assert!(table.roles_for("/community").is_none());
        assert!(!table.contains("/community"));
    }

    #[test]
    fn test_from_json() {
        let table =
            PermissionTable::from_json(r#"{"/units": ["admin", "manager"], "/admin/menus": []}"#)
                .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.roles_for("/units").unwrap().len(), 2);
        assert!(table.roles_for("/admin/menus").unwrap().is_empty());
    }

    #[test]
    fn test_from_json_rejects_wrong_shape() {
        assert!(PermissionTable::from_json(r#"{"/units": "admin"}"#).is_err());
        assert!(PermissionTable::from_json(r#"["/units"]"#).is_err());
        assert!(PermissionTable::from_json("not json").is_err());
    }

    #[test]
    fn test_builder_merges_roles() {
        let table = PermissionTable::builder()
            .allow("/units", ["admin"])
            .allow("/units", ["manager"])
            .build();
        let roles: Vec<_> = table.roles_for("/units").unwrap().iter().cloned().collect();
        assert_eq!(roles, vec!["admin".to_string(), "manager".to_string()]);
    }

    #[test]
    fn test_lint_reports_unmatchable_entries() {
        let table = PermissionTable::builder()
            .allow("/units/", ["admin"])
            .allow("/properties", ["Manager"])
            .allow("/admin/menus", Vec::<String>::new())
            .build();

        let lints = table.lint();
        assert_eq!(lints.len(), 3);
        assert!(lints.contains(&TableLint::UnnormalizedPath {
            path: "/units/".to_string()
        }));
        assert!(lints.contains(&TableLint::NonLowercaseRole {
            path: "/properties".to_string(),
            role: "Manager".to_string()
        }));
        assert!(lints.contains(&TableLint::EmptyRoleSet {
            path: "/admin/menus".to_string()
        }));
    }

    #[test]
    fn test_serializes_back_to_mapping_format() {
        let table = PermissionTable::builder().allow("/units", ["manager", "admin"]).build();
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"/units":["admin","manager"]}"#);
    }
}
