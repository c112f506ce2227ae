// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `validate` command.

use estate_config::EstateConfig;
use estate_core::CoverageReport;

use crate::cli::{Cli, OutputFormat, ValidateArgs};
use crate::commands::load;
use crate::error::{BinError, BinResult};

/// Findings of a validation run.
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// Permission table entries.
    pub entries: usize,
    /// Catalog pages.
    pub pages: usize,
    /// Page coverage.
    pub coverage: CoverageReport,
    /// Hard failures.
    pub errors: Vec<String>,
    /// Findings that fail only in strict mode.
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Checks the permission table and route catalog of `config`.
    pub fn inspect(config: &EstateConfig) -> BinResult<Self> {
        let table = config.permission_table()?;
        let catalog = config.route_catalog()?;
        let coverage = catalog.coverage(&table);

        let errors = coverage
            .unmapped_restricted
            .iter()
            .map(|path| format!("restricted page '{}' has no permission entry", path))
            .collect();

        let mut warnings: Vec<String> = table.lint().iter().map(ToString::to_string).collect();
        warnings.extend(
            coverage
                .fail_open
                .iter()
                .map(|path| format!("page '{}' is open to every authenticated role", path)),
        );

        Ok(Self {
            entries: table.len(),
            pages: catalog.len(),
            coverage,
            errors,
            warnings,
        })
    }

    /// Returns the problems that fail the run.
    pub fn failures(&self, strict: bool) -> usize {
        self.errors.len() + if strict { self.warnings.len() } else { 0 }
    }
}

/// Validates the configuration, permission table and route coverage.
pub fn validate(cli: &Cli, args: ValidateArgs) -> BinResult<()> {
    let config = load(cli)?;
    let report = ValidationReport::inspect(&config)?;
    let source = cli
        .config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(defaults)".to_string());

    match args.format {
        OutputFormat::Text => {
            println!("Configuration: {}", source);
            println!();
            println!("Summary:");
            println!("  Console: {}:{}", config.console.bind_address, config.console.port);
            println!("  Backend: {}", config.backend.base_url);
            println!("  Permission entries: {}", report.entries);
            println!("  Pages: {} ({} mapped, {} fail-open)",
                report.pages,
                report.coverage.mapped.len(),
                report.coverage.fail_open.len()
            );

            if !report.errors.is_empty() {
                println!();
                println!("Errors:");
                for error in &report.errors {
                    println!("  ✗ {}", error);
                }
            }
            if !report.warnings.is_empty() {
                println!();
                println!("Warnings:");
                for warning in &report.warnings {
                    println!("  ⚠ {}", warning);
                }
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "valid": report.failures(args.strict) == 0,
                "config_path": source,
                "permission_entries": report.entries,
                "pages": report.pages,
                "coverage": report.coverage,
                "errors": report.errors,
                "warnings": report.warnings,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&output).unwrap_or_else(|_| output.to_string())
            );
        }
    }

    let failures = report.failures(args.strict);
    if failures > 0 {
        return Err(BinError::ValidationFailed {
            problems: failures,
            strict: args.strict,
        });
    }

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
