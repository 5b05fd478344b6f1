// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Mutations issued against the catalog.
//!
//! Every user mutation is a [`PendingOp`]. When the remote cannot confirm it,
//! the op is wrapped in a [`PendingEntry`] and kept in the pending log until a
//! drain succeeds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::movie::Movie;

/// A mutation against the catalog, one case per remote call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PendingOp {
    /// Create a movie. The payload id is a locally minted placeholder.
    Add { payload: Movie },

    /// Replace the movie with `target_id` by `payload`.
    Update { target_id: i64, payload: Movie },

    /// Delete the movie with `target_id`.
    Delete { target_id: i64 },
}

impl PendingOp {
    /// Creates an Add op.
    pub fn add(payload: Movie) -> Self {
        PendingOp::Add { payload }
    }

    /// Creates an Update op.
    pub fn update(target_id: i64, payload: Movie) -> Self {
        PendingOp::Update { target_id, payload }
    }

    /// Creates a Delete op.
    pub fn delete(target_id: i64) -> Self {
        PendingOp::Delete { target_id }
    }

    /// Short name of the op kind, for logs and listings.
    pub fn kind(&self) -> &'static str {
        match self {
            PendingOp::Add { .. } => "add",
            PendingOp::Update { .. } => "update",
            PendingOp::Delete { .. } => "delete",
        }
    }

    /// Returns the id of the movie this op touches.
    pub fn target_id(&self) -> i64 {
        match self {
            PendingOp::Add { payload } => payload.id,
            PendingOp::Update { target_id, .. } => *target_id,
            PendingOp::Delete { target_id } => *target_id,
        }
    }

    /// Returns the entity snapshot carried by Add/Update.
    pub fn payload(&self) -> Option<&Movie> {
        match self {
            PendingOp::Add { payload } | PendingOp::Update { payload, .. } => Some(payload),
            PendingOp::Delete { .. } => None,
        }
    }
}

/// A pending op as persisted in the log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PendingEntry {
    /// Assigned at enqueue time, strictly increasing.
    pub sequence: u64,
    pub enqueued_at: DateTime<Utc>,
    pub op: PendingOp,
}

impl PendingEntry {
    /// Wraps an op with its sequence number and enqueue time.
    pub fn new(sequence: u64, enqueued_at: DateTime<Utc>, op: PendingOp) -> Self {
        PendingEntry {
            sequence,
            enqueued_at,
            op,
        }
    }
}

#[cfg(test)]
#[path = "op_tests.rs"]
mod tests;
