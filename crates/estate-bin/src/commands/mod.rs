// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI command implementations.

mod check_access;
mod routes;
mod run;
mod validate;
mod version;

pub use check_access::check_access;
pub use routes::routes;
pub use run::run;
pub use validate::validate;
pub use version::version;

use estate_config::{load_config, EstateConfig};

use crate::cli::{Cli, Commands};
use crate::error::{BinError, BinResult};

/// Executes the appropriate command based on CLI arguments.
pub async fn execute(cli: Cli) -> BinResult<()> {
    match cli.effective_command() {
        Commands::Run => run::run(&cli).await,
        Commands::Validate(args) => validate::validate(&cli, args),
        Commands::Routes(args) => routes::routes(&cli, args),
        Commands::CheckAccess(args) => check_access::check_access(&cli, args),
        Commands::Version => version::version(&cli),
    }
}

/// Loads the configuration named on the command line, or the defaults.
fn load(cli: &Cli) -> BinResult<EstateConfig> {
    match cli.config_path() {
        Some(path) => load_config(&path)
            .map_err(|e| BinError::Config(e).with_context(format!("loading {}", path.display()))),
        None => Ok(EstateConfig::default()),
    }
}
