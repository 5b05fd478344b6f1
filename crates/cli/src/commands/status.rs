// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use cs_core::LocalCache;

use crate::cli::OutputFormat;
use crate::display::{format_status, StatusReport};
use crate::error::Result;
use crate::sync::{ConnectivityMonitor, PendingOperationLog, Remote};

use super::Context;

pub async fn run(ctx: &Context, output: OutputFormat) -> Result<()> {
    let remote = ctx.remote()?;
    let cache = LocalCache::open(&ctx.config.cache_path())?;
    let log = PendingOperationLog::open(&ctx.config.pending_path())?;
    let monitor = ConnectivityMonitor::new(!ctx.offline, ctx.config.remote.health_interval());
    let report = collect(monitor, &remote, &cache, &log, &ctx.config.remote.base_url).await?;
    write_status(&report, output, &mut std::io::stdout())
}

/// Probes with a standalone monitor. Nothing is drained or fetched.
pub(crate) async fn collect<R: Remote>(
    mut monitor: ConnectivityMonitor,
    remote: &R,
    cache: &LocalCache,
    log: &PendingOperationLog,
    base_url: &str,
) -> Result<StatusReport> {
    monitor.probe(remote).await;
    Ok(StatusReport {
        mode: monitor.mode(),
        network_up: monitor.network_up(),
        server_up: monitor.server_up(),
        base_url: base_url.to_string(),
        cached: cache.len()?,
        pending: log.len()?,
    })
}

pub(crate) fn write_status(
    report: &StatusReport,
    output: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    match output {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(report)?)?,
        OutputFormat::Text => writeln!(out, "{}", format_status(report))?,
    }
    Ok(())
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
