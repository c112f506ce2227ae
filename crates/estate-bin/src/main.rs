// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! `estate` binary entry point.

use estate_bin::error::report_error_and_exit;
use estate_bin::{commands, init_logging, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    let (level, format) = cli.logging_settings();
    init_logging(&level, format);

    if let Err(e) = commands::execute(cli).await {
        report_error_and_exit(e);
    }
}
