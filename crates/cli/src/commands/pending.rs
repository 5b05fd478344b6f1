// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use crate::cli::OutputFormat;
use crate::display::format_pending_entry;
use crate::error::Result;
use crate::sync::PendingOperationLog;

use super::Context;

/// Reads the log directly; no engine lock is needed to list it.
pub fn run(ctx: &Context, output: OutputFormat) -> Result<()> {
    let log = PendingOperationLog::open(&ctx.config.pending_path())?;
    run_impl(&log, output, &mut std::io::stdout())
}

pub(crate) fn run_impl(
    log: &PendingOperationLog,
    output: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let entries = log.list()?;
    match output {
        OutputFormat::Json => {
            // JSONL, one entry per line
            for entry in &entries {
                writeln!(out, "{}", serde_json::to_string(entry)?)?;
            }
        }
        OutputFormat::Text => {
            if entries.is_empty() {
                writeln!(out, "No pending changes")?;
            }
            for entry in &entries {
                writeln!(out, "{}", format_pending_entry(entry))?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "pending_tests.rs"]
mod tests;
