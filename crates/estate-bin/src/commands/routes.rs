// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `routes` command.

use estate_core::{PermissionTable, RouteAccess, RouteCatalog};

use crate::cli::{Cli, OutputFormat, RoutesArgs};
use crate::commands::load;
use crate::error::BinResult;

/// Lists catalog pages with their access class and allowed roles.
pub fn routes(cli: &Cli, args: RoutesArgs) -> BinResult<()> {
    let config = load(cli)?;
    let table = config.permission_table()?;
    let catalog = config.route_catalog()?;

    match args.format {
        OutputFormat::Text => {
            let width = catalog.routes().iter().map(|r| r.path.len()).max().unwrap_or(0);
            for row in rows(&catalog, &table) {
                println!(
                    "{:<width$}  {:<10}  {:<20}  {}",
                    row.path,
                    row.access,
                    row.title,
                    row.roles.join(", "),
                    width = width
                );
            }
        }
        OutputFormat::Json => {
            let output: Vec<_> = rows(&catalog, &table)
                .into_iter()
                .map(|row| {
                    serde_json::json!({
                        "path": row.path,
                        "title": row.title,
                        "access": row.access,
                        "roles": row.roles,
                        "fail_open": row.fail_open,
                    })
                })
                .collect();
            let output = serde_json::Value::Array(output);
            println!(
                "{}",
                serde_json::to_string_pretty(&output).unwrap_or_else(|_| output.to_string())
            );
        }
    }

    Ok(())
}

struct RouteRow<'a> {
    path: &'a str,
    title: &'a str,
    access: &'static str,
    roles: Vec<String>,
    fail_open: bool,
}

fn rows<'a>(catalog: &'a RouteCatalog, table: &PermissionTable) -> Vec<RouteRow<'a>> {
    catalog
        .routes()
        .iter()
        .map(|route| {
            let roles = table.roles_for(&route.path);
            RouteRow {
                path: &route.path,
                title: &route.title,
                access: match route.access {
                    RouteAccess::Restricted => "restricted",
                    RouteAccess::Open => "open",
                },
                roles: match roles {
                    Some(roles) => roles.iter().cloned().collect(),
                    None => vec!["fail-open".to_string()],
                },
                fail_open: roles.is_none(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_mark_unmapped_pages_fail_open() {
        let table = PermissionTable::builder().allow("/properties", ["admin", "manager"]).build();
        let catalog = RouteCatalog::console();

        let rows = rows(&catalog, &table);
        let properties = rows.iter().find(|r| r.path == "/properties").unwrap();
        assert_eq!(properties.roles, vec!["admin", "manager"]);
        assert!(!properties.fail_open);

        let dashboard = rows.iter().find(|r| r.path == "/dashboard").unwrap();
        assert!(dashboard.fail_open);
        assert_eq!(dashboard.access, "open");
    }
}
