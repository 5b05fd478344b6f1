// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use crate::display::format_report;
use crate::error::Result;
use crate::sync::{Mode, PushTransport, Remote, SyncEngine};

use super::{open_engine, Context};

pub async fn run(ctx: &Context) -> Result<()> {
    let mut session = open_engine(ctx)?;
    run_impl(&mut session.engine, &mut std::io::stdout()).await
}

pub(crate) async fn run_impl<R, P>(engine: &mut SyncEngine<R, P>, out: &mut impl Write) -> Result<()>
where
    R: Remote,
    P: PushTransport,
{
    let mode = engine.check_mode().await;
    if mode == Mode::Offline {
        writeln!(out, "Offline, {} pending", engine.log().len()?)?;
        return Ok(());
    }
    let report = engine.sync_now().await?;
    writeln!(out, "{}", format_report(&report))?;
    if mode == Mode::Degraded {
        writeln!(out, "Server unreachable, cache not refreshed")?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
