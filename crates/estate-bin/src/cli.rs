// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! - `run`: serve the console (default)
//! - `validate`: check configuration, permission table and route coverage
//! - `routes`: list console pages and their allowed roles
//! - `check-access`: explain one access decision
//! - `version`: show version information

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

/// Config file looked up when `-c` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "estate.yaml";

// =============================================================================
// Main CLI Structure
// =============================================================================

/// estate - access-controlled admin console for property communities
#[derive(Parser, Debug)]
#[command(
    name = "estate",
    author = "Sylvex <contact@sylvex.io>",
    version = estate_core::VERSION,
    about = "Admin console for property and community management",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file path (defaults to ./estate.yaml when present)
    #[arg(short, long, env = "ESTATE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Log format; overrides the config file
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve the console
    ///
    /// This is the default command when no subcommand is specified.
    Run,

    /// Validate the configuration
    ///
    /// Loads the configuration and permission table, lints the table and
    /// checks that every restricted page has an entry.
    Validate(ValidateArgs),

    /// List console pages with their access class and allowed roles
    Routes(RoutesArgs),

    /// Explain whether a role may enter a path
    #[command(name = "check-access")]
    CheckAccess(CheckAccessArgs),

    /// Show version information
    Version,
}

// =============================================================================
// Command Arguments
// =============================================================================

/// Arguments for the `validate` command.
#[derive(Args, Debug, Clone, Default)]
pub struct ValidateArgs {
    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Treat lint warnings and fail-open pages as errors
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the `routes` command.
#[derive(Args, Debug, Clone, Default)]
pub struct RoutesArgs {
    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the `check-access` command.
#[derive(Args, Debug, Clone)]
pub struct CheckAccessArgs {
    /// Role label, as the backend reports it
    pub role: String,

    /// Route path
    pub path: String,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

// =============================================================================
// Enums
// =============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for structured logging
    Json,
    /// Compact format for minimal output
    Compact,
}

impl From<estate_config::LogFormat> for LogFormat {
    fn from(format: estate_config::LogFormat) -> Self {
        match format {
            estate_config::LogFormat::Text => LogFormat::Text,
            estate_config::LogFormat::Json => LogFormat::Json,
            estate_config::LogFormat::Compact => LogFormat::Compact,
        }
    }
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for programmatic parsing
    Json,
}

// =============================================================================
// Helper Methods
// =============================================================================

impl Cli {
    /// Parse CLI arguments from the command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective command, defaulting to `Run` if none specified.
    pub fn effective_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Run)
    }

    /// Returns the config file to load, if any.
    ///
    /// An explicit `-c` is returned as given, even when missing, so the
    /// loader reports it. Otherwise `./estate.yaml` is used when present.
    pub fn config_path(&self) -> Option<PathBuf> {
        match &self.config {
            Some(path) => Some(path.clone()),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                default.exists().then(|| default.to_path_buf())
            }
        }
    }

    /// Resolves the log level and format.
    ///
    /// Command-line flags win over the config file's `logging` section.
    /// A config file that fails to load is ignored here; the command
    /// itself reports it.
    pub fn logging_settings(&self) -> (String, LogFormat) {
        let file = self
            .config_path()
            .and_then(|path| estate_config::load_config(path).ok())
            .map(|config| config.logging);

        let level = self
            .log_level
            .clone()
            .or_else(|| file.as_ref().map(|l| l.level.as_str().to_string()))
            .unwrap_or_else(|| "info".to_string());
        let format = self
            .log_format
            .or_else(|| file.map(|l| l.format.into()))
            .unwrap_or_default();

        (level, format)
    }
}

// =============================================================================
// Tests
// =============================================================================
