// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use clap::Parser;
use cinesync::Cli;
use tracing_subscriber::EnvFilter;

/// Logs go to stderr so command output stays clean. `CINESYNC_LOG` takes
/// an env-filter directive; `-v` raises the default to debug.
fn setup_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_env("CINESYNC_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);
    if let Err(e) = cinesync::run(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
