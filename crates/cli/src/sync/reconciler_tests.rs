// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for mutation routing and the pending-log drain.

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use cs_core::{LocalCache, Movie, PendingOp};
use tempfile::TempDir;

use super::connectivity::Mode;
use super::queue::PendingOperationLog;
use super::reconciler::{apply_locally, SubmitOutcome, SyncReconciler};
use super::test_helpers::{ids, movie, FakeRemote};

struct Fixture {
    _dir: TempDir,
    cache: LocalCache,
    log: PendingOperationLog,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let log = PendingOperationLog::open(&dir.path().join("pending.jsonl")).unwrap();
    Fixture {
        _dir: dir,
        cache: LocalCache::open_in_memory().unwrap(),
        log,
    }
}

fn dune() -> Movie {
    Movie::new(0, "Dune", 4.5, "Spice and sand", "Sci-Fi")
}

#[tokio::test]
async fn test_offline_add_mints_negative_id_and_queues() {
    let remote = FakeRemote::new();
    let mut fx = fixture();

    let outcome = SyncReconciler::new(&remote, &mut fx.cache, &mut fx.log)
        .submit(PendingOp::add(dune()), Mode::Offline)
        .await
        .unwrap();

    let SubmitOutcome::OfflineAccepted { sequence, movie } = outcome else {
        panic!("expected offline-accepted");
    };
    let cached = fx.cache.read_all().unwrap();
    assert_eq!(cached.len(), 1);
    assert!(cached[0].id < 0);
    assert_eq!(cached[0].title, "Dune");
    assert_eq!(movie.unwrap().id, cached[0].id);

    let pending = fx.log.list().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].sequence, sequence);
    assert_eq!(pending[0].op.kind(), "add");
    assert!(remote.calls().is_empty());
}

#[tokio::test]
async fn test_offline_adds_get_distinct_ids() {
    let remote = FakeRemote::new();
    let mut fx = fixture();
    let mut reconciler = SyncReconciler::new(&remote, &mut fx.cache, &mut fx.log);

    reconciler.submit(PendingOp::add(dune()), Mode::Degraded).await.unwrap();
    reconciler.submit(PendingOp::add(dune()), Mode::Degraded).await.unwrap();

    let cached = ids(&fx.cache.read_all().unwrap());
    assert_eq!(cached, vec![-2, -1]);
}

#[tokio::test]
async fn test_online_submit_confirmed() {
    let remote = FakeRemote::with_movies(vec![movie(3, "Alien")]);
    let mut fx = fixture();
    fx.cache.upsert(&movie(3, "Alien")).unwrap();

    let outcome = SyncReconciler::new(&remote, &mut fx.cache, &mut fx.log)
        .submit(PendingOp::update(3, movie(3, "Aliens")), Mode::Online)
        .await
        .unwrap();

    assert!(outcome.is_confirmed());
    assert_eq!(fx.cache.get(3).unwrap().unwrap().title, "Aliens");
    assert_eq!(remote.movies()[0].title, "Aliens");
    assert!(fx.log.is_empty().unwrap());
}

#[tokio::test]
async fn test_online_add_uses_echoed_entity() {
    let remote = FakeRemote::with_movies(vec![movie(7, "Heat")]);
    remote.set_echo_create(true);
    let mut fx = fixture();

    let outcome = SyncReconciler::new(&remote, &mut fx.cache, &mut fx.log)
        .submit(PendingOp::add(dune()), Mode::Online)
        .await
        .unwrap();

    assert_eq!(outcome.movie().unwrap().id, 8);
    assert_eq!(ids(&fx.cache.read_all().unwrap()), vec![8]);
}

#[tokio::test]
async fn test_online_add_without_echo_mints_local_id() {
    let remote = FakeRemote::new();
    let mut fx = fixture();

    let outcome = SyncReconciler::new(&remote, &mut fx.cache, &mut fx.log)
        .submit(PendingOp::add(dune()), Mode::Online)
        .await
        .unwrap();

    assert!(outcome.is_confirmed());
    assert!(outcome.movie().unwrap().is_local());
    assert!(fx.log.is_empty().unwrap());
    assert_eq!(remote.movies().len(), 1);
}

#[tokio::test]
async fn test_online_failure_falls_back_to_offline() {
    let remote = FakeRemote::with_movies(vec![movie(3, "Alien")]);
    remote.set_down(true);
    let mut fx = fixture();

    let outcome = SyncReconciler::new(&remote, &mut fx.cache, &mut fx.log)
        .submit(PendingOp::delete(3), Mode::Online)
        .await
        .unwrap();

    assert!(matches!(outcome, SubmitOutcome::OfflineAccepted { .. }));
    assert_eq!(fx.log.len().unwrap(), 1);
    assert_eq!(remote.calls(), vec!["delete 3".to_string()]);
}

#[tokio::test]
async fn test_rejected_submission_is_queued() {
    let remote = FakeRemote::new();
    let mut fx = fixture();

    // The remote has no id 42
    let outcome = SyncReconciler::new(&remote, &mut fx.cache, &mut fx.log)
        .submit(PendingOp::update(42, movie(42, "Ghost")), Mode::Online)
        .await
        .unwrap();

    assert!(!outcome.is_confirmed());
    assert_eq!(fx.cache.get(42).unwrap().unwrap().title, "Ghost");
}

#[tokio::test]
async fn test_drain_mixed_outcome_keeps_failed_entry() {
    let remote = FakeRemote::with_movies(vec![movie(3, "Alien"), movie(4, "Heat")]);
    remote.reject_target(4);
    let mut fx = fixture();
    fx.cache.upsert(&movie(3, "Alien")).unwrap();
    fx.cache.upsert(&movie(4, "Heat")).unwrap();

    let mut reconciler = SyncReconciler::new(&remote, &mut fx.cache, &mut fx.log);
    reconciler
        .submit(PendingOp::update(3, movie(3, "Aliens")), Mode::Offline)
        .await
        .unwrap();
    let delete_seq = match reconciler.submit(PendingOp::delete(4), Mode::Offline).await.unwrap() {
        SubmitOutcome::OfflineAccepted { sequence, .. } => sequence,
        other => panic!("unexpected {:?}", other),
    };

    let report = reconciler.reconcile(Mode::Online).await.unwrap();
    assert_eq!(report.attempted, 2);
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failed, 1);

    let pending = fx.log.list().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].sequence, delete_seq);
    assert_eq!(pending[0].op, PendingOp::delete(4));

    assert_eq!(fx.cache.get(3).unwrap().unwrap().title, "Aliens");
    // The retained delete is re-applied over the refresh
    assert!(fx.cache.get(4).unwrap().is_none());
}

#[tokio::test]
async fn test_drain_continues_past_failure_in_fifo_order() {
    let remote = FakeRemote::with_movies(vec![movie(1, "A"), movie(2, "B"), movie(3, "C")]);
    remote.reject_target(1);
    let mut fx = fixture();
    let mut reconciler = SyncReconciler::new(&remote, &mut fx.cache, &mut fx.log);

    for id in [1, 2, 3] {
        reconciler.submit(PendingOp::delete(id), Mode::Offline).await.unwrap();
    }
    reconciler.reconcile(Mode::Degraded).await.unwrap();

    let deletes: Vec<String> = remote
        .calls()
        .into_iter()
        .filter(|c| c.starts_with("delete"))
        .collect();
    assert_eq!(deletes, vec!["delete 1", "delete 2", "delete 3"]);
    assert_eq!(ids(&remote.movies()), vec![1]);
}

#[tokio::test]
async fn test_drain_retries_rejected_entry_every_pass() {
    let remote = FakeRemote::new();
    let mut fx = fixture();
    let mut reconciler = SyncReconciler::new(&remote, &mut fx.cache, &mut fx.log);

    reconciler.submit(PendingOp::delete(99), Mode::Offline).await.unwrap();
    for _ in 0..3 {
        let report = reconciler.reconcile(Mode::Online).await.unwrap();
        assert_eq!(report.failed, 1);
    }
    assert_eq!(remote.calls_matching("delete 99"), 3);
    assert_eq!(fx.log.len().unwrap(), 1);
}

#[tokio::test]
async fn test_reconcile_offline_sends_nothing() {
    let remote = FakeRemote::new();
    let mut fx = fixture();
    let mut reconciler = SyncReconciler::new(&remote, &mut fx.cache, &mut fx.log);

    reconciler.submit(PendingOp::add(dune()), Mode::Offline).await.unwrap();
    let report = reconciler.reconcile(Mode::Offline).await.unwrap();

    assert_eq!(report.attempted, 0);
    assert!(!report.refreshed);
    assert!(remote.calls().is_empty());
    assert_eq!(fx.log.len().unwrap(), 1);
}

#[tokio::test]
async fn test_degraded_reconcile_does_not_refresh() {
    let remote = FakeRemote::with_movies(vec![movie(1, "A")]);
    let mut fx = fixture();

    let report = SyncReconciler::new(&remote, &mut fx.cache, &mut fx.log)
        .reconcile(Mode::Degraded)
        .await
        .unwrap();

    assert!(!report.refreshed);
    assert_eq!(remote.calls_matching("list"), 0);
}

#[tokio::test]
async fn test_refresh_walks_all_pages() {
    let remote = FakeRemote::with_movies((1..=7).map(|i| movie(i, "M")).collect());
    let mut fx = fixture();
    fx.cache.upsert(&movie(50, "Stale")).unwrap();

    let count = SyncReconciler::new(&remote, &mut fx.cache, &mut fx.log)
        .with_refresh_page_size(3)
        .refresh()
        .await
        .unwrap();

    assert_eq!(count, 7);
    assert_eq!(remote.calls_matching("list plain"), 3);
    assert_eq!(ids(&fx.cache.read_all().unwrap()), (1..=7).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_refresh_failure_is_reported_not_raised() {
    let remote = FakeRemote::with_movies(vec![movie(1, "A")]);
    let mut fx = fixture();
    fx.cache.upsert(&movie(1, "A")).unwrap();
    remote.set_down(true);

    let report = SyncReconciler::new(&remote, &mut fx.cache, &mut fx.log)
        .reconcile(Mode::Online)
        .await
        .unwrap();

    assert!(!report.refreshed);
    assert_eq!(fx.cache.len().unwrap(), 1);
}

#[tokio::test]
async fn test_offline_mutations_converge_after_reconnect() {
    let remote = FakeRemote::with_movies(vec![
        movie(1, "Alien"),
        movie(2, "Brazil"),
        movie(3, "Casablanca"),
    ]);
    let mut fx = fixture();
    let mut reconciler = SyncReconciler::new(&remote, &mut fx.cache, &mut fx.log);
    reconciler.refresh().await.unwrap();

    let ops = vec![
        PendingOp::update(1, movie(1, "Aliens")),
        PendingOp::delete(2),
        PendingOp::add(dune()),
        PendingOp::update(3, movie(3, "Casablanca (1942)")),
        PendingOp::update(1, movie(1, "Aliens (1986)")),
    ];
    for op in ops {
        reconciler.submit(op, Mode::Offline).await.unwrap();
    }

    let report = reconciler.reconcile(Mode::Online).await.unwrap();
    assert_eq!(report.succeeded, 5);
    assert!(report.refreshed);
    assert!(fx.log.is_empty().unwrap());

    let titles: Vec<String> = remote.movies().into_iter().map(|m| m.title).collect();
    assert_eq!(titles, vec!["Aliens (1986)", "Casablanca (1942)", "Dune"]);

    // Cache matches the remote, temporary ids gone
    assert_eq!(fx.cache.read_all().unwrap(), remote.movies());
}

#[test]
fn test_apply_locally_update_uses_target_id() {
    let cache = LocalCache::open_in_memory().unwrap();
    let applied = apply_locally(&cache, &PendingOp::update(5, movie(0, "Five"))).unwrap();
    assert_eq!(applied.unwrap().id, 5);
    assert_eq!(cache.get(5).unwrap().unwrap().title, "Five");

    assert!(apply_locally(&cache, &PendingOp::delete(5)).unwrap().is_none());
    assert!(cache.is_empty().unwrap());
}
