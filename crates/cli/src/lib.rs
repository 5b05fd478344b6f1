// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! cinesync - an offline-first client for a shared movie catalog.
//!
//! This crate provides the `cinesync` CLI and the sync engine behind it.
//!
//! # Main Components
//!
//! - [`sync`] - the engine: connectivity, pending log, reconciliation, push and paging
//! - [`Config`] - client configuration (endpoints, page sizes, data directory)
//! - [`Error`] - error types for all operations
//!
//! Durable state lives in the data directory: `cache.db` (SQLite),
//! `pending.jsonl` (the pending log) and `engine.lock`.

mod cli;
mod commands;
mod display;
mod lock;

pub mod config;
pub mod error;
pub mod runner;
pub mod sync;

use std::time::Duration;

pub use cli::{Cli, Command, MovieArgs, OutputFormat, QueryArgs};
pub use config::Config;
pub use error::{Error, Result};

use commands::Context;

/// Grace period for blocking tasks (stdin) at runtime shutdown.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(100);

/// Execute a CLI invocation. This is the main entry point for library users
/// and provides a testable way to run commands without process execution.
pub fn run(cli: Cli) -> Result<()> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(config::default_config_path);
    let config = Config::load(&config_path)?;
    let ctx = Context::new(config, cli.offline);

    let rt = tokio::runtime::Runtime::new()?;
    let result = rt.block_on(dispatch(&ctx, cli.command));
    rt.shutdown_timeout(SHUTDOWN_GRACE);
    result
}

async fn dispatch(ctx: &Context, command: Command) -> Result<()> {
    match command {
        Command::Status { output } => commands::status::run(ctx, output).await,
        Command::List {
            query,
            pages,
            output,
        } => commands::list::run(ctx, &query, pages, output).await,
        Command::Show { id, output } => commands::show::run(ctx, id, output).await,
        Command::Add { movie } => commands::mutate::add(ctx, &movie).await,
        Command::Update { id, movie } => commands::mutate::update(ctx, id, &movie).await,
        Command::Delete { id } => commands::mutate::delete(ctx, id).await,
        Command::Pending { output } => commands::pending::run(ctx, output),
        Command::Sync => commands::sync::run(ctx).await,
        Command::Watch => commands::watch::run(ctx).await,
    }
}
