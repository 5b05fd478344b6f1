// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use chrono::{TimeZone, Utc};
use cs_core::protocol::{AggregateUpdate, Topic};
use yare::parameterized;

fn movie(id: i64, title: &str) -> Movie {
    Movie::new(id, title, 4.5, "", "Drama")
}

#[parameterized(
    confirmed = { 12, "12" },
    zero = { 0, "0" },
    local = { -3, "~3" },
)]
fn test_format_id(id: i64, expected: &str) {
    assert_eq!(format_id(id), expected);
}

#[test]
fn test_format_movie_line() {
    assert_eq!(
        format_movie_line(&movie(7, "Heat")),
        "- [Drama] 7: Heat (4.5)"
    );
    assert_eq!(
        format_movie_line(&movie(-1, "Draft")),
        "- [Drama] ~1: Draft (4.5)"
    );
}

#[test]
fn test_format_movie_details_minimal() {
    let out = format_movie_details(&movie(7, "Heat"));
    assert!(out.starts_with("[Drama] 7\nTitle: Heat\nRating: 4.5"));
    assert!(!out.contains("Description:"));
    assert!(!out.contains("Sync: pending"));
}

#[test]
fn test_format_movie_details_local_with_description() {
    let m = Movie::new(-2, "Draft", 3.0, "A long night in the city.", "Crime");
    let out = format_movie_details(&m);
    assert!(out.contains("Sync: pending"));
    assert!(out.contains("Description:\n    A long night in the city."));
}

#[test]
fn test_wrap_text_preserves_multiline() {
    assert_eq!(wrap_text("a\nb", 1), "a\nb");
}

#[test]
fn test_wrap_text_wraps_at_words() {
    assert_eq!(wrap_text("one two three four", 9), "one two\nthree\nfour");
    assert_eq!(wrap_text("short", 10), "short");
}

#[test]
fn test_format_pending_entry() {
    let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
    let add = PendingEntry::new(1, at, PendingOp::add(movie(-1, "Draft")));
    assert_eq!(format_pending_entry(&add), "#1 2026-03-01 09:30 add ~1 Draft");

    let delete = PendingEntry::new(2, at, PendingOp::delete(5));
    assert_eq!(format_pending_entry(&delete), "#2 2026-03-01 09:30 delete 5");
}

#[test]
fn test_format_status() {
    let status = StatusReport {
        mode: Mode::Degraded,
        network_up: true,
        server_up: false,
        base_url: "http://localhost:8080".to_string(),
        cached: 3,
        pending: 1,
    };
    let out = format_status(&status);
    assert!(out.contains("Mode: degraded"));
    assert!(out.contains("Network: up  Server: down"));
    assert!(out.contains("Cached: 3"));
    assert!(out.contains("Pending: 1"));
}

#[test]
fn test_status_json_uses_lowercase_mode() {
    let status = StatusReport {
        mode: Mode::Offline,
        network_up: false,
        server_up: false,
        base_url: "http://x".to_string(),
        cached: 0,
        pending: 0,
    };
    let json = serde_json::to_value(&status).unwrap();
    assert_eq!(json["mode"], "offline");
}

#[test]
fn test_format_report() {
    let report = ReconcileReport {
        attempted: 3,
        succeeded: 2,
        failed: 1,
        refreshed: true,
    };
    assert_eq!(
        format_report(&report),
        "Synced 2 of 3 pending (1 failed), cache refreshed"
    );
}

#[test]
fn test_format_submit() {
    let confirmed = SubmitOutcome::Confirmed {
        movie: Some(movie(9, "Heat")),
    };
    assert_eq!(format_submit("add", &confirmed), "add 9: confirmed");

    let unechoed = SubmitOutcome::Confirmed {
        movie: Some(movie(-2, "Heat")),
    };
    assert_eq!(format_submit("add", &unechoed), "add: confirmed");

    let queued = SubmitOutcome::OfflineAccepted {
        sequence: 4,
        movie: None,
    };
    assert_eq!(format_submit("delete", &queued), "delete: queued as #4");
}

#[test]
fn test_format_update() {
    assert_eq!(
        format_update(&EngineUpdate::Connectivity(Mode::Online)).as_deref(),
        Some("* mode: online")
    );
    assert_eq!(format_update(&EngineUpdate::Page(PageOutcome::Idle)), None);
    assert_eq!(
        format_update(&EngineUpdate::Page(PageOutcome::Loaded {
            count: 10,
            has_more: true
        }))
        .as_deref(),
        Some("* page: 10 loaded, more available")
    );
    let agg = AggregateUpdate {
        topic: Topic::CategoryCounts,
        payload: serde_json::json!({"Drama": 2}),
    };
    let line = format_update(&EngineUpdate::Pushed(PushOutcome::Aggregate(agg))).unwrap();
    assert!(line.contains(Topic::CategoryCounts.destination()));
}
