// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use cs_core::Movie;
use tracing::warn;

use crate::cli::{OutputFormat, QueryArgs};
use crate::display::format_movie_line;
use crate::error::Result;
use crate::sync::{PageOutcome, PushTransport, Remote, SyncEngine};

use super::{open_engine, Context};

pub async fn run(ctx: &Context, query: &QueryArgs, pages: u32, output: OutputFormat) -> Result<()> {
    let mut session = open_engine(ctx)?;
    run_impl(
        &mut session.engine,
        query,
        pages,
        output,
        &mut std::io::stdout(),
    )
    .await
}

/// Internal implementation that accepts an engine for testing.
pub(crate) async fn run_impl<R, P>(
    engine: &mut SyncEngine<R, P>,
    query: &QueryArgs,
    pages: u32,
    output: OutputFormat,
    out: &mut impl Write,
) -> Result<()>
where
    R: Remote,
    P: PushTransport,
{
    // The context is set before the first probe so page 0 is fetched once.
    engine.update_query(|q| query.apply(q)).await?;
    let mut outcome = engine.start().await?;
    let mut loaded = 1;
    loop {
        match outcome {
            PageOutcome::Failed(e) => {
                warn!(error = %e, "page fetch failed, listing what is loaded");
                break;
            }
            PageOutcome::Loaded { has_more: true, .. } if loaded < pages => {
                outcome = engine.load_next_page().await?;
                loaded += 1;
            }
            _ => break,
        }
    }
    write_movies(engine.live().items(), output, out)
}

fn write_movies(movies: &[Movie], output: OutputFormat, out: &mut impl Write) -> Result<()> {
    match output {
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, movies)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            if movies.is_empty() {
                writeln!(out, "No movies")?;
            }
            for movie in movies {
                writeln!(out, "{}", format_movie_line(movie))?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
