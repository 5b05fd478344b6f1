// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use crate::cli::OutputFormat;
use crate::display::format_movie_details;
use crate::error::{Error, Result};
use crate::sync::{PushTransport, Remote, SyncEngine};

use super::{open_engine, Context};

pub async fn run(ctx: &Context, id: i64, output: OutputFormat) -> Result<()> {
    let mut session = open_engine(ctx)?;
    run_impl(&mut session.engine, id, output, &mut std::io::stdout()).await
}

/// Internal implementation that accepts an engine for testing.
pub(crate) async fn run_impl<R, P>(
    engine: &mut SyncEngine<R, P>,
    id: i64,
    output: OutputFormat,
    out: &mut impl Write,
) -> Result<()>
where
    R: Remote,
    P: PushTransport,
{
    engine.probe().await?;
    let movie = engine.fetch_one(id).await?.ok_or(Error::NotFound(id))?;
    match output {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(&movie)?)?,
        OutputFormat::Text => writeln!(out, "{}", format_movie_details(&movie))?,
    }
    Ok(())
}

#[cfg(test)]
#[path = "show_tests.rs"]
mod tests;
