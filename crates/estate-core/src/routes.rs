// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The console's page catalog.
//!
//! Every page is declared here with an access class:
//!
//! - [`RouteAccess::Restricted`]: must have a permission table entry
//! - [`RouteAccess::Open`]: deliberately left unmapped, open to every
//!   authenticated role
//!
//! [`RouteCatalog::coverage`] compares the catalog with a permission table.
//! A restricted route without an entry would silently be open to everyone,
//! so startup refuses it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::access::PermissionTable;
use crate::error::{CoreError, CoreResult};
use crate::path;

// =============================================================================
// RouteSpec
// =============================================================================

/// Access class of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteAccess {
    /// Requires a permission table entry.
    Restricted,
    /// Intentionally unmapped.
    Open,
}

/// A page of the console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteSpec {
    /// Normalized route path.
    pub path: String,
    /// Page title.
    pub title: String,
    /// Access class.
    pub access: RouteAccess,
}

impl RouteSpec {
    /// Creates a restricted page.
    pub fn restricted(path: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
            access: RouteAccess::Restricted,
        }
    }

    /// Creates an open page.
    pub fn open(path: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
            access: RouteAccess::Open,
        }
    }
}

// =============================================================================
// RouteCatalog
// =============================================================================

/// The set of console pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteCatalog {
    routes: Vec<RouteSpec>,
}

impl RouteCatalog {
    /// Creates a catalog, validating paths.
    pub fn new(routes: Vec<RouteSpec>) -> CoreResult<Self> {
        let catalog = Self { routes };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The pages the console ships with.
    pub fn console() -> Self {
        Self {
            routes: vec![
                RouteSpec::open("/dashboard", "Dashboard"),
                RouteSpec::open("/community", "Community"),
                RouteSpec::restricted("/properties", "Properties"),
                RouteSpec::restricted("/units", "Units"),
                RouteSpec::restricted("/admin/users", "Users"),
                RouteSpec::restricted("/admin/roles", "Roles"),
                RouteSpec::restricted("/admin/role-permissions", "Role Permissions"),
                RouteSpec::restricted("/admin/menus", "Menus"),
                RouteSpec::open("/profile", "My Profile"),
            ],
        }
    }

    /// Returns all pages in declaration order.
    pub fn routes(&self) -> &[RouteSpec] {
        &self.routes
    }

    /// Finds a page by path.
    pub fn find(&self, path: &str) -> Option<&RouteSpec> {
        self.routes.iter().find(|route| route.path == path)
    }

    /// Returns the number of pages.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Checks that paths are normalized and unique.
    pub fn validate(&self) -> CoreResult<()> {
        let mut seen = HashSet::new();
        for route in &self.routes {
            if !route.path.starts_with('/') || !path::is_normalized(&route.path) {
                return Err(CoreError::invalid_path(&route.path, "route path must be normalized"));
            }
            if !seen.insert(route.path.as_str()) {
                return Err(CoreError::route_catalog(format!(
                    "duplicate route '{}'",
                    route.path
                )));
            }
            if route.title.trim().is_empty() {
                return Err(CoreError::route_catalog(format!(
                    "route '{}' has no title",
                    route.path
                )));
            }
        }
        Ok(())
    }

    /// Compares the catalog with `table`.
    pub fn coverage(&self, table: &PermissionTable) -> CoverageReport {
        let mut report = CoverageReport::default();

        for route in &self.routes {
            match (route.access, table.contains(&route.path)) {
                (_, true) => report.mapped.push(route.path.clone()),
                (RouteAccess::Restricted, false) => {
                    report.unmapped_restricted.push(route.path.clone())
                }
                (RouteAccess::Open, false) => report.fail_open.push(route.path.clone()),
            }
        }

        report
    }
}

impl Default for RouteCatalog {
    fn default() -> Self {
        Self::console()
    }
}

// =============================================================================
// CoverageReport
// =============================================================================

/// Result of comparing a route catalog with a permission table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoverageReport {
    /// Pages with a table entry.
    pub mapped: Vec<String>,
    /// Restricted pages without an entry. These are open to every role.
    pub unmapped_restricted: Vec<String>,
    /// Open pages without an entry, by declaration.
    pub fail_open: Vec<String>,
}

impl CoverageReport {
    /// Returns `true` if every restricted page is mapped.
    pub fn is_ok(&self) -> bool {
        self.unmapped_restricted.is_empty()
    }

    /// Fails if any restricted page is unmapped; logs the open pages.
    pub fn into_result(self) -> CoreResult<Self> {
        if !self.is_ok() {
            return Err(CoreError::UnmappedRoutes {
                paths: self.unmapped_restricted,
            });
        }
        if !self.fail_open.is_empty() {
            info!(
                routes = ?self.fail_open,
                "Routes without a permission entry are open to every authenticated role"
            );
        }
        Ok(self)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_catalog_is_valid() {
        let catalog = RouteCatalog::console();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.find("/properties").unwrap().access, RouteAccess::Restricted);
        assert_eq!(catalog.find("/community").unwrap().access, RouteAccess::Open);
    }

    #[test]
    fn test_console_catalog_is_covered_by_packaged_table() {
        let table = PermissionTable::packaged().unwrap();
        let report = RouteCatalog::console().coverage(&table);

        assert!(
            report.unmapped_restricted.is_empty(),
            "restricted routes without a permission entry: {:?}",
            report.unmapped_restricted
        );
        assert_eq!(report.fail_open, vec!["/dashboard", "/community", "/profile"]);
    }

    #[test]
    fn test_new_restricted_route_without_entry_fails() {
        let mut routes = RouteCatalog::console().routes().to_vec();
        routes.push(RouteSpec::restricted("/billing", "Billing"));
        let catalog = RouteCatalog::new(routes).unwrap();

        let table = PermissionTable::packaged().unwrap();
        let err = catalog.coverage(&table).into_result().unwrap_err();
        assert!(matches!(err, CoreError::UnmappedRoutes { ref paths } if paths == &["/billing"]));
    }

    #[test]
    fn test_validate_rejects_bad_catalogs() {
        assert!(RouteCatalog::new(vec![RouteSpec::open("/units/", "Units")]).is_err());
        assert!(RouteCatalog::new(vec![RouteSpec::open("units", "Units")]).is_err());
        assert!(RouteCatalog::new(vec![
            RouteSpec::open("/units", "Units"),
            RouteSpec::restricted("/units", "Units again"),
        ])
        .is_err());
        assert!(RouteCatalog::new(vec![RouteSpec::open("/units", " ")]).is_err());
    }

    #[test]
    fn test_open_route_with_entry_counts_as_mapped() {
        let table = PermissionTable::builder().allow("/community", ["admin"]).build();
        let catalog = RouteCatalog::new(vec![RouteSpec::open("/community", "Community")]).unwrap();
        let report = catalog.coverage(&table);
        assert_eq!(report.mapped, vec!["/community"]);
        assert!(report.fail_open.is_empty());
    }
}
