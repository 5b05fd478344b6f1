// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for cs-core operations.

use thiserror::Error;

/// All possible errors that can occur in cs-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("movie not found: {0}")]
    MovieNotFound(i64),

    #[error("invalid sort direction: '{0}'\n  hint: valid directions are: asc, desc")]
    InvalidSortDirection(String),

    #[error("invalid sort field: '{0}'\n  hint: valid fields are: rating, title")]
    InvalidSortField(String),

    #[error("invalid STOMP frame: {0}")]
    InvalidFrame(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

/// A specialized Result type for cs-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
