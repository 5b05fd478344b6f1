// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `add`, `update` and `delete`.
//!
//! Entities are validated here, before they reach the engine. The engine
//! decides whether a valid mutation is sent now or queued.

use std::io::Write;

use cs_core::{Movie, PendingOp};

use crate::cli::MovieArgs;
use crate::display::format_submit;
use crate::error::{Error, Result};
use crate::sync::{PushTransport, Remote, SyncEngine};

use super::{open_engine, Context};

pub async fn add(ctx: &Context, args: &MovieArgs) -> Result<()> {
    let mut session = open_engine(ctx)?;
    add_impl(&mut session.engine, args, &mut std::io::stdout()).await
}

pub async fn update(ctx: &Context, id: i64, args: &MovieArgs) -> Result<()> {
    let mut session = open_engine(ctx)?;
    update_impl(&mut session.engine, id, args, &mut std::io::stdout()).await
}

pub async fn delete(ctx: &Context, id: i64) -> Result<()> {
    let mut session = open_engine(ctx)?;
    delete_impl(&mut session.engine, id, &mut std::io::stdout()).await
}

pub(crate) async fn add_impl<R, P>(
    engine: &mut SyncEngine<R, P>,
    args: &MovieArgs,
    out: &mut impl Write,
) -> Result<()>
where
    R: Remote,
    P: PushTransport,
{
    let movie = Movie::new(
        0,
        args.title.clone().unwrap_or_default(),
        args.rating.unwrap_or_default(),
        args.description.clone().unwrap_or_default(),
        args.category.clone().unwrap_or_default(),
    );
    validate(&movie)?;
    engine.probe().await?;
    submit(engine, PendingOp::add(movie), out).await
}

pub(crate) async fn update_impl<R, P>(
    engine: &mut SyncEngine<R, P>,
    id: i64,
    args: &MovieArgs,
    out: &mut impl Write,
) -> Result<()>
where
    R: Remote,
    P: PushTransport,
{
    if args.is_empty() {
        return Err(Error::InvalidInput(
            "nothing to update\n  hint: pass at least one of --title, --rating, --description, --category"
                .to_string(),
        ));
    }
    engine.probe().await?;
    let mut movie = engine.fetch_one(id).await?.ok_or(Error::NotFound(id))?;
    if let Some(title) = &args.title {
        movie.title = title.clone();
    }
    if let Some(rating) = args.rating {
        movie.rating = rating;
    }
    if let Some(description) = &args.description {
        movie.description = description.clone();
    }
    if let Some(category) = &args.category {
        movie.category = category.clone();
    }
    validate(&movie)?;
    submit(engine, PendingOp::update(id, movie), out).await
}

pub(crate) async fn delete_impl<R, P>(
    engine: &mut SyncEngine<R, P>,
    id: i64,
    out: &mut impl Write,
) -> Result<()>
where
    R: Remote,
    P: PushTransport,
{
    engine.probe().await?;
    if engine.fetch_one(id).await?.is_none() {
        return Err(Error::NotFound(id));
    }
    submit(engine, PendingOp::delete(id), out).await
}

fn validate(movie: &Movie) -> Result<()> {
    let problems = movie.validate();
    if problems.is_empty() {
        Ok(())
    } else {
        Err(Error::InvalidMovie(problems))
    }
}

/// Callers probe first. Coming online drains anything queued earlier, so the
/// new mutation does not overtake an older one.
async fn submit<R, P>(
    engine: &mut SyncEngine<R, P>,
    op: PendingOp,
    out: &mut impl Write,
) -> Result<()>
where
    R: Remote,
    P: PushTransport,
{
    let kind = op.kind();
    let outcome = engine.submit(op).await?;
    writeln!(out, "{}", format_submit(kind, &outcome))?;
    Ok(())
}

#[cfg(test)]
#[path = "mutate_tests.rs"]
mod tests;
