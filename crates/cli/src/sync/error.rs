// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::push::TransportError;
use super::queue::QueueError;
use super::remote::RemoteError;

/// Error type for sync engine operations.
///
/// Remote failures on the mutation and drain paths are absorbed; what
/// surfaces here is mostly local durability failure.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Local cache error.
    #[error("cache error: {0}")]
    Cache(#[from] cs_core::Error),

    /// Pending operation log error.
    #[error("queue error: {0}")]
    Queue(#[from] QueueError),

    /// Remote error on a path that does not absorb it.
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    /// Push transport error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Result type for sync engine operations.
pub type SyncResult<T> = Result<T, SyncError>;
