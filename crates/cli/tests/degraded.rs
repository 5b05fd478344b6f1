// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Network up, server unreachable.

mod common;
use common::*;

#[test]
fn status_reports_degraded() {
    let env = TestEnv::new();
    env.cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Mode: degraded"))
        .stdout(predicate::str::contains("Server: down"));
}

#[test]
fn add_while_degraded_is_queued() {
    let env = TestEnv::new();
    env.cmd()
        .args(["add", "-t", "Heat", "-r", "4", "-c", "Crime", "-d", "A heist."])
        .assert()
        .success()
        .stdout("add ~1: queued as #1\n");
}

#[test]
fn sync_while_degraded_retains_entries() {
    let env = TestEnv::new();
    env.add_offline("Queued");

    env.cmd()
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("Synced 0 of 1 pending (1 failed)"))
        .stdout(predicate::str::contains("Server unreachable"));

    env.cmd()
        .arg("pending")
        .assert()
        .success()
        .stdout(predicate::str::contains("add ~1 Queued"));
}

#[test]
fn list_while_degraded_reads_cache() {
    let env = TestEnv::new();
    env.add_offline("Cached");
    env.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("~1: Cached"));
}
