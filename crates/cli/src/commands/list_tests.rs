// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::commands::testing::{movie, movie_with, TestContext};

fn catalog(n: i64) -> Vec<Movie> {
    (1..=n).map(|i| movie(i, &format!("Movie {:02}", i))).collect()
}

async fn list(ctx: &mut TestContext, query: &QueryArgs, pages: u32, output: OutputFormat) {
    run_impl(&mut ctx.engine, query, pages, output, &mut ctx.out)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_list_first_page_online() {
    let mut ctx = TestContext::with_movies(catalog(7));
    list(&mut ctx, &QueryArgs::default(), 1, OutputFormat::Text).await;

    let output = ctx.output();
    assert_eq!(output.lines().count(), 5);
    assert!(output.starts_with("- [Drama] 1: Movie 01 (3.0)\n"));
}

#[tokio::test]
async fn test_list_stops_when_exhausted() {
    let mut ctx = TestContext::with_movies(catalog(7));
    list(&mut ctx, &QueryArgs::default(), 5, OutputFormat::Text).await;

    assert_eq!(ctx.output().lines().count(), 7);
    // Refresh walk plus two browsing pages; no third page is requested.
    assert_eq!(ctx.remote.calls_matching("list plain 2"), 0);
}

#[tokio::test]
async fn test_list_applies_query_before_first_fetch() {
    let mut ctx = TestContext::with_movies(vec![
        movie_with(1, "Alien", "SciFi", 4.0),
        movie_with(2, "Heat", "Crime", 4.5),
        movie_with(3, "Aliens", "SciFi", 3.0),
    ]);
    let query = QueryArgs {
        search: Some("alien".to_string()),
        min_rating: Some(3.5),
        ..QueryArgs::default()
    };
    list(&mut ctx, &query, 1, OutputFormat::Text).await;

    assert_eq!(ctx.output(), "- [SciFi] 1: Alien (4.0)\n");
    assert_eq!(ctx.remote.calls_matching("list filter 0"), 1);
}

#[tokio::test]
async fn test_list_offline_reads_cache() {
    let mut ctx = TestContext::offline(catalog(3));
    ctx.engine.cache().upsert(&movie(9, "Cached")).unwrap();
    list(&mut ctx, &QueryArgs::default(), 1, OutputFormat::Text).await;

    assert_eq!(ctx.output(), "- [Drama] 9: Cached (3.0)\n");
    assert!(ctx.remote.calls().is_empty());
}

#[tokio::test]
async fn test_list_server_down_reads_cache() {
    let mut ctx = TestContext::with_movies(catalog(3));
    ctx.remote.set_down(true);
    list(&mut ctx, &QueryArgs::default(), 1, OutputFormat::Text).await;

    assert_eq!(ctx.output(), "No movies\n");
}

#[tokio::test]
async fn test_list_json() {
    let mut ctx = TestContext::with_movies(catalog(2));
    list(&mut ctx, &QueryArgs::default(), 1, OutputFormat::Json).await;

    let movies: Vec<Movie> = serde_json::from_str(ctx.output().trim()).unwrap();
    assert_eq!(movies, catalog(2));
}
