// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! cs-core: Shared library for the cinesync catalog client
//!
//! This crate provides the catalog data model, the durable local cache, and
//! the wire shapes used by the sync engine in the `cinesync` crate.

pub mod cache;
pub mod error;
pub mod movie;
pub mod op;
pub mod protocol;
pub mod query;
pub mod stomp;

pub use cache::LocalCache;
pub use error::{Error, Result};
pub use movie::Movie;
pub use op::{PendingEntry, PendingOp};
pub use protocol::{AggregateUpdate, ListResponse, PageEnvelope, PushMessage, Topic};
pub use query::{QueryContext, QueryMode, SortDirection, SortField};
pub use stomp::Frame;
