// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use super::*;
use crate::commands::testing::{movie, TestContext};

fn heat() -> MovieArgs {
    MovieArgs {
        title: Some("Heat".to_string()),
        rating: Some(4.5),
        description: Some("A heist in LA.".to_string()),
        category: Some("Crime".to_string()),
    }
}

#[tokio::test]
async fn test_add_online_is_confirmed() {
    let mut ctx = TestContext::new();
    ctx.remote.set_echo_create(true);
    add_impl(&mut ctx.engine, &heat(), &mut ctx.out).await.unwrap();

    assert_eq!(ctx.output(), "add 1: confirmed\n");
    assert_eq!(ctx.remote.movies().len(), 1);
    assert!(ctx.engine.log().is_empty().unwrap());
}

#[tokio::test]
async fn test_add_offline_is_queued_with_local_id() {
    let mut ctx = TestContext::offline(vec![]);
    add_impl(&mut ctx.engine, &heat(), &mut ctx.out).await.unwrap();

    assert_eq!(ctx.output(), "add ~1: queued as #1\n");
    assert_eq!(ctx.engine.log().len().unwrap(), 1);
    assert_eq!(ctx.engine.cache().get(-1).unwrap().unwrap().title, "Heat");
    assert!(ctx.remote.movies().is_empty());
}

#[tokio::test]
async fn test_add_rejects_invalid_movie() {
    let mut ctx = TestContext::offline(vec![]);
    let args = MovieArgs {
        title: None,
        rating: Some(9.0),
        ..heat()
    };
    let err = add_impl(&mut ctx.engine, &args, &mut ctx.out).await.unwrap_err();

    match err {
        Error::InvalidMovie(problems) => assert_eq!(problems.len(), 2),
        other => panic!("unexpected error: {}", other),
    }
    assert!(ctx.engine.log().is_empty().unwrap());
    assert!(ctx.engine.cache().is_empty().unwrap());
}

#[tokio::test]
async fn test_update_keeps_unset_fields() {
    let mut ctx = TestContext::with_movies(vec![movie(3, "Heat")]);
    let args = MovieArgs {
        rating: Some(5.0),
        ..MovieArgs::default()
    };
    update_impl(&mut ctx.engine, 3, &args, &mut ctx.out).await.unwrap();

    assert_eq!(ctx.output(), "update 3: confirmed\n");
    let server = &ctx.remote.movies()[0];
    assert_eq!(server.title, "Heat");
    assert_eq!(server.rating, 5.0);
}

#[tokio::test]
async fn test_update_needs_a_field() {
    let mut ctx = TestContext::with_movies(vec![movie(3, "Heat")]);
    let err = update_impl(&mut ctx.engine, 3, &MovieArgs::default(), &mut ctx.out)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
    assert!(ctx.remote.calls().is_empty());
}

#[tokio::test]
async fn test_update_missing_is_not_found() {
    let mut ctx = TestContext::new();
    let err = update_impl(&mut ctx.engine, 8, &heat(), &mut ctx.out)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(8)));
}

#[tokio::test]
async fn test_update_offline_queues_cached_movie() {
    let mut ctx = TestContext::offline(vec![]);
    ctx.engine.cache().upsert(&movie(3, "Heat")).unwrap();
    let args = MovieArgs {
        title: Some("Heat (1995)".to_string()),
        ..MovieArgs::default()
    };
    update_impl(&mut ctx.engine, 3, &args, &mut ctx.out).await.unwrap();

    assert_eq!(ctx.output(), "update 3: queued as #1\n");
    assert_eq!(ctx.engine.cache().get(3).unwrap().unwrap().title, "Heat (1995)");
}

#[tokio::test]
async fn test_delete_online_and_missing() {
    let mut ctx = TestContext::with_movies(vec![movie(3, "Heat")]);
    delete_impl(&mut ctx.engine, 3, &mut ctx.out).await.unwrap();
    assert_eq!(ctx.output(), "delete: confirmed\n");
    assert!(ctx.remote.movies().is_empty());

    let err = delete_impl(&mut ctx.engine, 3, &mut ctx.out).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(3)));
}

#[tokio::test]
async fn test_earlier_offline_change_is_sent_before_new_one() {
    let mut ctx = TestContext::with_movies(vec![movie(3, "Heat")]);
    ctx.remote.set_down(true);
    let first = MovieArgs {
        rating: Some(2.0),
        ..MovieArgs::default()
    };
    ctx.engine.cache().upsert(&movie(3, "Heat")).unwrap();
    update_impl(&mut ctx.engine, 3, &first, &mut ctx.out).await.unwrap();
    assert_eq!(ctx.engine.log().len().unwrap(), 1);

    ctx.remote.set_down(false);
    ctx.remote.clear_calls();
    let second = MovieArgs {
        rating: Some(5.0),
        ..MovieArgs::default()
    };
    update_impl(&mut ctx.engine, 3, &second, &mut ctx.out).await.unwrap();

    let updates: Vec<String> = ctx
        .remote
        .calls()
        .into_iter()
        .filter(|c| c.starts_with("update"))
        .collect();
    assert_eq!(updates, vec!["update 3", "update 3"]);
    assert_eq!(ctx.remote.movies()[0].rating, 5.0);
    assert!(ctx.engine.log().is_empty().unwrap());
}
