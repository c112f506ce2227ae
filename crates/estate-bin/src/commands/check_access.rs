// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `check-access` command.

use std::sync::Arc;

use estate_core::{path, AccessDecision, AccessEvaluator, PermissionTable, Role};

use crate::cli::{CheckAccessArgs, Cli, OutputFormat};
use crate::commands::load;
use crate::error::BinResult;

/// Prints the access decision for a role on a path.
///
/// A blank role is evaluated as "no identity".
pub fn check_access(cli: &Cli, args: CheckAccessArgs) -> BinResult<()> {
    let config = load(cli)?;
    let table = Arc::new(config.permission_table()?);
    let path = path::normalize(&args.path);
    let role = Role::new(args.role.as_str()).ok();

    let decision = decide(table.clone(), role.as_ref(), &path);
    let roles: Vec<String> = table
        .roles_for(&path)
        .map(|r| r.iter().cloned().collect())
        .unwrap_or_default();

    match args.format {
        OutputFormat::Text => {
            let role_label = role.as_ref().map(Role::as_str).unwrap_or("(none)");
            println!("{} on {}: {}", role_label, path, decision);
            if !roles.is_empty() {
                println!("  allowed roles: {}", roles.join(", "));
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "role": role,
                "path": path,
                "granted": decision.is_granted(),
                "detail": decision,
                "allowed_roles": roles,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&output).unwrap_or_else(|_| output.to_string())
            );
        }
    }

    Ok(())
}

fn decide(table: Arc<PermissionTable>, role: Option<&Role>, path: &str) -> AccessDecision {
    AccessEvaluator::new(table).decide(role, path)
}
