// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use crate::display::format_movie_line;
use crate::error::Result;
use crate::runner;

use super::{open_live_engine, Context};

/// Present the first view, then follow pushes and stdin until interrupted.
pub async fn run(ctx: &Context) -> Result<()> {
    let mut session = open_live_engine(ctx)?;
    let engine = &mut session.engine;
    engine.start().await?;

    let mut stdout = std::io::stdout();
    for movie in engine.live().items() {
        writeln!(stdout, "{}", format_movie_line(movie))?;
    }
    writeln!(stdout, "* mode: {}", engine.mode())?;

    runner::watch(engine, ctx.config.remote.health_interval(), stdout).await
}
