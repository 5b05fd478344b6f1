// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// Nothing listens here; connections are refused immediately.
pub const UNREACHABLE: &str = "http://127.0.0.1:9";

pub fn cinesync() -> Command {
    cargo_bin_cmd!("cinesync")
}

/// A temp data directory with a config file pointing at it.
pub struct TestEnv {
    pub temp: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_config(&format!(
            "[remote]\nbase_url = \"{UNREACHABLE}\"\nrequest_timeout_secs = 2\n"
        ))
    }

    /// Extra config text is appended after `data_dir`.
    pub fn with_config(extra: &str) -> Self {
        let temp = TempDir::new().unwrap();
        let data_dir = temp.path().join("data");
        let config = format!("data_dir = {:?}\n{}", data_dir.display().to_string(), extra);
        std::fs::write(temp.path().join("config.toml"), config).unwrap();
        TestEnv { temp }
    }

    pub fn config_path(&self) -> PathBuf {
        self.temp.path().join("config.toml")
    }

    pub fn data_dir(&self) -> PathBuf {
        self.temp.path().join("data")
    }

    /// `cinesync --config <path>` with timeouts and no log noise.
    pub fn cmd(&self) -> Command {
        let mut cmd = cinesync();
        cmd.env("CINESYNC_LOG", "off")
            .arg("--config")
            .arg(self.config_path())
            .timeout(std::time::Duration::from_secs(30));
        cmd
    }

    /// Same as [`TestEnv::cmd`] with `--offline`.
    pub fn offline(&self) -> Command {
        let mut cmd = self.cmd();
        cmd.arg("--offline");
        cmd
    }

    /// Add a movie offline, returning its displayed id.
    pub fn add_offline(&self, title: &str) -> String {
        let output = self
            .offline()
            .args(["add", "-t", title, "-r", "4", "-c", "Drama", "-d", "Test movie"])
            .output()
            .unwrap();
        assert!(output.status.success());
        String::from_utf8_lossy(&output.stdout)
            .split_whitespace()
            .nth(1)
            .unwrap()
            .trim_end_matches(':')
            .to_string()
    }
}
