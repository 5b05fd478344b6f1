// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration.
//!
//! Configuration is read from `$XDG_CONFIG_HOME/cinesync/config.toml` (or the
//! path given with `--config`) and includes:
//! - `data_dir`: where the cache, the pending log and the lock file live
//! - `[remote]`: the catalog service and push endpoints
//! - `[paging]`: page sizes for browsing and for full refreshes
//!
//! A missing file yields the defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

const APP_DIR_NAME: &str = "cinesync";
const CONFIG_FILE_NAME: &str = "config.toml";
const CACHE_FILE_NAME: &str = "cache.db";
const PENDING_FILE_NAME: &str = "pending.jsonl";
const LOCK_FILE_NAME: &str = "engine.lock";

/// Client configuration stored in `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory for durable state. Defaults to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub paging: PagingConfig,
}

/// Catalog service endpoints and timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the HTTP API (default: "http://localhost:8080").
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Push endpoint (default: "ws://localhost:8080/ws"). Empty disables
    /// realtime updates.
    #[serde(default = "default_push_url")]
    pub push_url: String,
    /// Health probe interval in seconds (default: 30).
    #[serde(default = "default_health_interval_secs")]
    pub health_interval_secs: u64,
    /// Per-request timeout in seconds (default: 10).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// First push reconnect delay in milliseconds (default: 500).
    #[serde(default = "default_reconnect_initial_delay_ms")]
    pub reconnect_initial_delay_ms: u64,
    /// Maximum push reconnect delay in seconds (default: 30).
    #[serde(default = "default_reconnect_max_delay_secs")]
    pub reconnect_max_delay_secs: u64,
}

/// Page sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagingConfig {
    /// Entities per browsing page (default: 10).
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Entities per page of the full refresh walk (default: 100).
    #[serde(default = "default_refresh_page_size")]
    pub refresh_page_size: u32,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_push_url() -> String {
    "ws://localhost:8080/ws".to_string()
}

fn default_health_interval_secs() -> u64 {
    30
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_reconnect_initial_delay_ms() -> u64 {
    500
}

fn default_reconnect_max_delay_secs() -> u64 {
    30
}

fn default_page_size() -> u32 {
    10
}

fn default_refresh_page_size() -> u32 {
    100
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            base_url: default_base_url(),
            push_url: default_push_url(),
            health_interval_secs: default_health_interval_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            reconnect_initial_delay_ms: default_reconnect_initial_delay_ms(),
            reconnect_max_delay_secs: default_reconnect_max_delay_secs(),
        }
    }
}

impl Default for PagingConfig {
    fn default() -> Self {
        PagingConfig {
            page_size: default_page_size(),
            refresh_page_size: default_refresh_page_size(),
        }
    }
}

impl RemoteConfig {
    /// The push endpoint, unless disabled.
    pub fn push_url(&self) -> Option<&str> {
        Some(self.push_url.as_str()).filter(|url| !url.is_empty())
    }

    pub fn health_interval(&self) -> Duration {
        Duration::from_secs(self.health_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn reconnect_initial_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_initial_delay_ms)
    }

    pub fn reconnect_max_delay(&self) -> Duration {
        Duration::from_secs(self.reconnect_max_delay_secs)
    }
}

impl Config {
    /// Loads configuration from `path`, or returns defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be parsed or fails
    /// validation.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)?;
        Config::parse(&content)
    }

    /// Parses and validates configuration text.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Checks URL schemes and page sizes.
    pub fn validate(&self) -> Result<()> {
        let base = &self.remote.base_url;
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(Error::Config(format!(
                "invalid base_url '{}': must start with http:// or https://",
                base
            )));
        }
        if let Some(push) = self.remote.push_url() {
            if !(push.starts_with("ws://") || push.starts_with("wss://")) {
                return Err(Error::Config(format!(
                    "invalid push_url '{}': must start with ws:// or wss://",
                    push
                )));
            }
        }
        if self.paging.page_size == 0 {
            return Err(Error::Config("page_size must be greater than 0".to_string()));
        }
        if self.paging.refresh_page_size == 0 {
            return Err(Error::Config(
                "refresh_page_size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Directory holding durable state.
    pub fn data_dir(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) => dir.clone(),
            None => default_data_dir(),
        }
    }

    pub fn cache_path(&self) -> PathBuf {
        self.data_dir().join(CACHE_FILE_NAME)
    }

    pub fn pending_path(&self) -> PathBuf {
        self.data_dir().join(PENDING_FILE_NAME)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.data_dir().join(LOCK_FILE_NAME)
    }
}

/// Default config file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join(APP_DIR_NAME)
        .join(CONFIG_FILE_NAME)
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from(".local/share"))
        .join(APP_DIR_NAME)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
