// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline-first synchronization with the catalog service.
//!
//! # Architecture
//!
//! ```text
//!                  ┌──────────────┐
//!   HostEvent ────►│  SyncEngine  │────► EngineUpdate
//!                  └──────────────┘
//!          ┌──────────┬────┴─────┬───────────┬────────────┐
//!          ▼          ▼          ▼           ▼            ▼
//!   ┌────────────┐ ┌───────┐ ┌────────┐ ┌──────────┐ ┌──────────┐
//!   │Connectivity│ │ Pager │ │Reconci-│ │ Realtime │ │ LiveView │
//!   │  Monitor   │ │       │ │  ler   │ │Subscriber│ │          │
//!   └─────┬──────┘ └───┬───┘ └───┬────┘ └────┬─────┘ └──────────┘
//!         │            │         │           │
//!         ▼            ▼         ▼           ▼
//!   ┌─────────────────────────────┐   ┌─────────────┐
//!   │   Remote (trait, HTTP)      │   │PushTransport│  (STOMP/WS)
//!   └─────────────────────────────┘   └─────────────┘
//!
//!   LocalCache (SQLite) and PendingOperationLog (JSONL) are owned by
//!   the engine and lent to each component per call.
//! ```
//!
//! # Features
//!
//! - Mutations confirmed online or accepted offline, never lost
//! - Durable pending log drained skip-and-continue on reconnect
//! - Full refresh after each drain, re-applying what is still pending
//! - Push merge with last-write-wins replacement
//! - Paging across plain, filter and sort listings, with a local fallback
//! - Injectable remote and push transport traits for testing

mod connectivity;
mod engine;
mod error;
mod event;
mod live;
mod pager;
mod push;
mod queue;
mod realtime;
mod reconciler;
mod remote;

pub use connectivity::{ConnectivityMonitor, Mode, NetworkChange, Transition};
pub use engine::{EngineOptions, SyncEngine};
pub use error::{SyncError, SyncResult};
pub use event::{EngineUpdate, EventFuture, EventSource, HostEvent, QueryUpdate};
pub use live::LiveView;
pub use pager::{PageOutcome, PaginatedQueryEngine};
pub use push::{PushTransport, StompTransport, TransportError, TransportResult};
pub use queue::{PendingOperationLog, QueueError};
pub use realtime::{Backoff, PushOutcome, RealtimeSubscriber};
pub use reconciler::{ReconcileReport, SubmitOutcome, SyncReconciler};
pub use remote::{HttpRemote, PageRequest, Remote, RemoteError, RemoteResult};

#[cfg(test)]
pub(crate) mod test_helpers;






#[cfg(test)]
mod reconciler_tests;
