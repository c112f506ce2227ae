// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! `estate version`: crate versions and what access data ships built in.

use estate_core::{PermissionTable, RouteCatalog};

use crate::cli::Cli;
use crate::error::BinResult;

/// Prints versions, built-in access data and platform.
pub fn version(_cli: &Cli) -> BinResult<()> {
    let table = PermissionTable::packaged()?;
    let catalog = RouteCatalog::console();

    println!("estate {}", env!("CARGO_PKG_VERSION"));
    println!(
        "  core {} / api {} / config {}",
        estate_core::VERSION,
        estate_api::VERSION,
        estate_config::VERSION
    );
    println!(
        "  built-in access data: {} restricted paths, {} console pages",
        table.len(),
        catalog.len()
    );
    println!(
        "  platform: {}-{}",
        std::env::consts::OS,
        std::env::consts::ARCH
    );

    Ok(())
}
