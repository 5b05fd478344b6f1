// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Host-facing event seam.
//!
//! The engine never touches an event loop directly. A host turns its own
//! signals (network callbacks, scroll proximity, timers, user input) into
//! [`HostEvent`]s and receives [`EngineUpdate`]s back.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use cs_core::{PendingOp, SortDirection};

use super::connectivity::Mode;
use super::pager::PageOutcome;
use super::realtime::PushOutcome;
use super::reconciler::{ReconcileReport, SubmitOutcome};

/// A change to one field of the query context.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryUpdate {
    Search(String),
    ToggleCategory(String),
    MinRating(Option<f64>),
    RatingSort(Option<SortDirection>),
    TitleSort(Option<SortDirection>),
}

/// Signals a host delivers to the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// The host's network interface went up or down.
    NetworkChanged(bool),
    /// The periodic health probe is due.
    ProbeDue,
    /// The consumer is close to the end of the list.
    ScrollNearEnd,
    QueryChanged(QueryUpdate),
    Submit(PendingOp),
    /// Drain the pending log now.
    SyncRequested,
    /// A reconnect delay requested through [`EventSource::schedule_reconnect`]
    /// elapsed.
    ReconnectDue,
    Shutdown,
}

/// Things the engine reports back to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineUpdate {
    Connectivity(Mode),
    Page(PageOutcome),
    Pushed(PushOutcome),
    Submitted(SubmitOutcome),
    Reconciled(ReconcileReport),
}

/// Boxed future returned by [`EventSource::next_event`].
pub type EventFuture<'a> = Pin<Box<dyn Future<Output = Option<HostEvent>> + Send + 'a>>;

/// Source of host events, implemented once per host.
pub trait EventSource: Send {
    /// The next event. `None` means the host is gone.
    ///
    /// Must be safe to drop before completion; the engine re-polls with a
    /// fresh call.
    fn next_event(&mut self) -> EventFuture<'_>;

    /// Deliver [`HostEvent::ReconnectDue`] once `delay` has elapsed.
    fn schedule_reconnect(&mut self, delay: Duration);

    /// Observe an engine update.
    fn notify(&mut self, _update: EngineUpdate) {}
}
