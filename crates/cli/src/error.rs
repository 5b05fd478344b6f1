// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::sync::{QueueError, RemoteError, SyncError, TransportError};

/// All errors surfaced by the cinesync client.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("movie not found: {0}")]
    NotFound(i64),

    #[error("invalid movie: {}", .0.join("; "))]
    InvalidMovie(Vec<String>),

    #[error("{0}")]
    InvalidInput(String),

    #[error("another cinesync process holds {0}\n  hint: close the other 'cinesync watch' or wait for it to finish")]
    Locked(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("cache error: {0}")]
    Cache(#[from] cs_core::Error),

    #[error("pending log error: {0}\n  hint: the pending log is kept in the data directory; do not edit it by hand")]
    Queue(#[from] QueueError),

    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("push error: {0}")]
    Transport(#[from] TransportError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<SyncError> for Error {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Cache(e) => Error::Cache(e),
            SyncError::Queue(e) => Error::Queue(e),
            SyncError::Remote(e) => Error::Remote(e),
            SyncError::Transport(e) => Error::Transport(e),
        }
    }
}

/// A specialized Result type for cinesync operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
