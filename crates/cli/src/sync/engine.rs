// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The explicit engine instance.
//!
//! [`SyncEngine`] owns every piece of mutable sync state: the cache, the
//! pending log, the connectivity monitor, the live list, the pager and the
//! optional push subscriber. One instance exists per process; hosts drive it
//! either through direct calls (one-shot commands) or by handing it an
//! [`EventSource`] and calling [`SyncEngine::run`].

use std::task::Poll;
use std::time::Duration;

use cs_core::protocol::PushMessage;
use cs_core::{LocalCache, Movie, PendingOp, QueryContext};
use tracing::{debug, info, warn};

use super::connectivity::{ConnectivityMonitor, Mode, Transition};
use super::error::{SyncError, SyncResult};
use super::event::{EngineUpdate, EventSource, HostEvent, QueryUpdate};
use super::live::LiveView;
use super::pager::{PageOutcome, PaginatedQueryEngine};
use super::push::{PushTransport, StompTransport, TransportResult};
use super::queue::PendingOperationLog;
use super::realtime::{PushOutcome, RealtimeSubscriber};
use super::reconciler::{
    ReconcileReport, SubmitOutcome, SyncReconciler, DEFAULT_REFRESH_PAGE_SIZE,
};
use super::remote::{PageRequest, PageResponse, Remote, RemoteFuture, RemoteResult};

/// Engine construction parameters.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Network state at start.
    pub network_up: bool,
    pub probe_interval: Duration,
    pub page_size: u32,
    pub refresh_page_size: u32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            network_up: true,
            probe_interval: Duration::from_secs(30),
            page_size: cs_core::query::DEFAULT_PAGE_SIZE,
            refresh_page_size: DEFAULT_REFRESH_PAGE_SIZE,
        }
    }
}

/// Offline-first sync engine.
pub struct SyncEngine<R: Remote, P: PushTransport = StompTransport> {
    remote: R,
    cache: LocalCache,
    log: PendingOperationLog,
    monitor: ConnectivityMonitor,
    live: LiveView,
    pager: PaginatedQueryEngine,
    realtime: Option<RealtimeSubscriber<P>>,
    refresh_page_size: u32,
}

/// What woke the run loop.
enum Wake {
    Event(Option<HostEvent>),
    Push(TransportResult<Option<PushMessage>>),
    Page(usize, RemoteResult<PageResponse>),
}

type PageFetch = (PageRequest, RemoteFuture<'static, PageResponse>);

/// Follow-up work after a connectivity transition.
#[derive(Default)]
struct Reaction {
    fetch: Option<PageRequest>,
    drained: Option<ReconcileReport>,
}

impl<R: Remote, P: PushTransport> SyncEngine<R, P> {
    pub fn new(
        remote: R,
        cache: LocalCache,
        log: PendingOperationLog,
        options: EngineOptions,
    ) -> Self {
        SyncEngine {
            remote,
            cache,
            log,
            monitor: ConnectivityMonitor::new(options.network_up, options.probe_interval),
            live: LiveView::new(),
            pager: PaginatedQueryEngine::new(options.page_size),
            realtime: None,
            refresh_page_size: options.refresh_page_size,
        }
    }

    /// Attach a push subscriber. Without one the engine works pull-only.
    pub fn with_realtime(mut self, subscriber: RealtimeSubscriber<P>) -> Self {
        self.realtime = Some(subscriber);
        self
    }

    pub fn mode(&self) -> Mode {
        self.monitor.mode()
    }

    pub fn monitor(&self) -> &ConnectivityMonitor {
        &self.monitor
    }

    pub fn live(&self) -> &LiveView {
        &self.live
    }

    pub fn cache(&self) -> &LocalCache {
        &self.cache
    }

    pub fn log(&self) -> &PendingOperationLog {
        &self.log
    }

    pub fn pager(&self) -> &PaginatedQueryEngine {
        &self.pager
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn push_connected(&self) -> bool {
        self.realtime.as_ref().is_some_and(|rt| rt.is_connected())
    }

    fn reconciler(&mut self) -> SyncReconciler<'_, R> {
        SyncReconciler::new(&self.remote, &mut self.cache, &mut self.log)
            .with_refresh_page_size(self.refresh_page_size)
    }

    /// Probe once and present the first view.
    pub async fn start(&mut self) -> SyncResult<PageOutcome> {
        self.live.extend_categories(self.cache.categories()?);
        let transition = self.monitor.probe(&self.remote).await;
        match self.apply_transition(transition).await?.fetch {
            Some(request) => self.fetch_inline(request).await,
            None => self.show_local(),
        }
    }

    /// Run a health probe.
    pub async fn probe(&mut self) -> SyncResult<Option<Transition>> {
        let transition = self.monitor.probe(&self.remote).await;
        let reaction = self.apply_transition(transition).await?;
        self.fetch_planned(reaction.fetch).await?;
        Ok(transition)
    }

    /// Probe and record the result without reacting to it.
    ///
    /// One-shot hosts call this before acting explicitly. Long-running hosts
    /// use [`SyncEngine::probe`].
    pub async fn check_mode(&mut self) -> Mode {
        self.monitor.probe(&self.remote).await;
        self.monitor.mode()
    }

    /// Record a host network event, probing immediately if it came up.
    pub async fn set_network(&mut self, up: bool) -> SyncResult<Option<Transition>> {
        let change = self.monitor.on_network_change(up);
        let reaction = self.apply_transition(change.transition).await?;
        self.fetch_planned(reaction.fetch).await?;
        if change.probe_now {
            return self.probe().await;
        }
        Ok(change.transition)
    }

    async fn apply_transition(
        &mut self,
        transition: Option<Transition>,
    ) -> SyncResult<Reaction> {
        match transition {
            Some(Transition::BecameAvailable) => {
                self.connect_push().await;
                let report = self.reconciler().reconcile(Mode::Online).await?;
                self.pager.reset();
                Ok(Reaction {
                    fetch: self.pager.begin_advance(),
                    drained: Some(report),
                })
            }
            Some(Transition::LeftOnline) => {
                if let Some(rt) = self.realtime.as_mut() {
                    rt.teardown().await;
                }
                self.pager.serve_local(&mut self.live, &self.cache)?;
                Ok(Reaction::default())
            }
            None => Ok(Reaction::default()),
        }
    }

    async fn connect_push(&mut self) -> bool {
        let Some(rt) = self.realtime.as_mut() else {
            return false;
        };
        match rt.connect().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "push connect failed");
                false
            }
        }
    }

    /// Re-open a dropped push connection. Only while Online.
    pub async fn reconnect_push(&mut self) -> bool {
        if !self.monitor.is_online() || self.push_connected() {
            return self.push_connected();
        }
        self.connect_push().await
    }

    /// Delay before the next push reconnect attempt, if push is configured.
    pub fn push_retry_delay(&mut self) -> Option<Duration> {
        self.realtime.as_mut().map(|rt| rt.retry_delay())
    }

    /// Route a user mutation and reflect it in the live list.
    pub async fn submit(&mut self, op: PendingOp) -> SyncResult<SubmitOutcome> {
        let mode = self.monitor.mode();
        let target = op.target_id();
        let kind = op.kind();
        let outcome = self.reconciler().submit(op, mode).await?;
        match (kind, outcome.movie()) {
            ("add", Some(movie)) => self.live.prepend(movie.clone()),
            ("update", Some(movie)) => {
                self.live.replace_in_place(movie.clone());
            }
            _ => {
                self.live.remove(target);
            }
        }
        let unechoed_add = kind == "add"
            && outcome.is_confirmed()
            && outcome.movie().is_some_and(Movie::is_local);
        if unechoed_add {
            self.refresh_after_add().await?;
        }
        Ok(outcome)
    }

    /// The server accepted an add without returning it, so the cached copy
    /// still has a local id. Reload to pick up the server's id.
    async fn refresh_after_add(&mut self) -> SyncResult<()> {
        match self.reconciler().refresh().await {
            Ok(count) => {
                debug!(count, "cache refreshed after add");
                self.pager.reset();
                self.load_next_page().await?;
            }
            Err(SyncError::Remote(e)) => warn!(error = %e, "refresh after add failed"),
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Drain the pending log now and reload the view.
    pub async fn sync_now(&mut self) -> SyncResult<ReconcileReport> {
        let mode = self.monitor.mode();
        let report = self.reconciler().reconcile(mode).await?;
        if report.refreshed {
            self.pager.reset();
            self.load_next_page().await?;
        } else if !self.monitor.is_online() {
            self.show_local()?;
        }
        Ok(report)
    }

    /// Fetch one entity, from the remote when Online, else from the cache.
    ///
    /// Unconfirmed local ids are always served from the cache.
    pub async fn fetch_one(&mut self, id: i64) -> SyncResult<Option<Movie>> {
        if self.monitor.is_online() && id >= 0 {
            match self.remote.fetch_one(id).await {
                Ok(movie) => {
                    self.cache.upsert(&movie)?;
                    self.live.replace_in_place(movie.clone());
                    return Ok(Some(movie));
                }
                Err(e) => debug!(id, error = %e, "fetch failed, reading cache"),
            }
        }
        Ok(self.cache.get(id)?)
    }

    /// Load the next page, or the local view when not Online.
    pub async fn load_next_page(&mut self) -> SyncResult<PageOutcome> {
        if !self.monitor.is_online() {
            return self.show_local();
        }
        match self.pager.begin_advance() {
            Some(request) => self.fetch_inline(request).await,
            None => Ok(PageOutcome::Idle),
        }
    }

    /// Change the query context. A real change reloads from page 0.
    pub async fn update_query<F>(&mut self, change: F) -> SyncResult<PageOutcome>
    where
        F: FnOnce(&mut QueryContext),
    {
        if !self.pager.update_context(change) {
            return Ok(PageOutcome::Idle);
        }
        self.load_next_page().await
    }

    /// Merge one push message.
    pub fn apply_push(&mut self, message: PushMessage) -> SyncResult<PushOutcome> {
        Ok(RealtimeSubscriber::<P>::apply(
            message,
            &mut self.live,
            &self.cache,
        )?)
    }

    /// Receive and merge the next push message. `None` if push is not
    /// connected or the connection just closed.
    pub async fn recv_push(&mut self) -> SyncResult<Option<PushOutcome>> {
        let Some(rt) = self.realtime.as_mut().filter(|rt| rt.is_connected()) else {
            return Ok(None);
        };
        let received = rt.recv().await;
        self.handle_push(received)
    }

    fn handle_push(
        &mut self,
        received: TransportResult<Option<PushMessage>>,
    ) -> SyncResult<Option<PushOutcome>> {
        match received {
            Ok(Some(message)) => Ok(Some(self.apply_push(message)?)),
            Ok(None) => {
                info!("push connection closed");
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, "push receive failed");
                Ok(None)
            }
        }
    }

    /// Close the push connection. The engine stays usable pull-only.
    pub async fn shutdown(&mut self) {
        if let Some(rt) = self.realtime.as_mut() {
            rt.teardown().await;
        }
        debug!("engine shut down");
    }

    fn show_local(&mut self) -> SyncResult<PageOutcome> {
        let count = self.pager.serve_local(&mut self.live, &self.cache)?;
        Ok(PageOutcome::Local { count })
    }

    async fn fetch_inline(&mut self, request: PageRequest) -> SyncResult<PageOutcome> {
        let result = self.remote.list_page(request.clone()).await;
        self.complete_page(&request, result)
    }

    async fn fetch_planned(&mut self, planned: Option<PageRequest>) -> SyncResult<()> {
        if let Some(request) = planned {
            self.fetch_inline(request).await?;
        }
        Ok(())
    }

    /// Apply a page fetched outside the engine.
    pub fn complete_page(
        &mut self,
        request: &PageRequest,
        result: RemoteResult<PageResponse>,
    ) -> SyncResult<PageOutcome> {
        self.pager
            .complete(request, result, &mut self.live, &mut self.cache)
    }
}

impl<R, P> SyncEngine<R, P>
where
    R: Remote + Clone + 'static,
    P: PushTransport,
{
    /// Drive the engine from an event source until it ends or asks to stop.
    ///
    /// Page fetches run alongside event handling, so a context reset can
    /// start a new fetch while an older one is still outstanding. Push
    /// messages are merged as they arrive.
    pub async fn run<S: EventSource + ?Sized>(&mut self, source: &mut S) -> SyncResult<()> {
        let mut fetches: Vec<PageFetch> = Vec::new();
        let mut last_mode = self.monitor.mode();
        source.notify(EngineUpdate::Connectivity(last_mode));

        loop {
            let wake = {
                let mut events = source.next_event();
                let mut push = self
                    .realtime
                    .as_mut()
                    .filter(|rt| rt.is_connected())
                    .map(|rt| rt.recv());
                futures_util::future::poll_fn(|cx| {
                    for (idx, (_, fetch)) in fetches.iter_mut().enumerate() {
                        if let Poll::Ready(result) = fetch.as_mut().poll(cx) {
                            return Poll::Ready(Wake::Page(idx, result));
                        }
                    }
                    if let Some(push) = push.as_mut() {
                        if let Poll::Ready(received) = push.as_mut().poll(cx) {
                            return Poll::Ready(Wake::Push(received));
                        }
                    }
                    events.as_mut().poll(cx).map(Wake::Event)
                })
                .await
            };

            match wake {
                Wake::Page(idx, result) => {
                    let (request, _) = fetches.remove(idx);
                    let outcome = self.complete_page(&request, result)?;
                    source.notify(EngineUpdate::Page(outcome));
                }
                Wake::Push(received) => {
                    let closed = !matches!(received, Ok(Some(_)));
                    if let Some(outcome) = self.handle_push(received)? {
                        source.notify(EngineUpdate::Pushed(outcome));
                    }
                    if closed && self.monitor.is_online() {
                        if let Some(delay) = self.push_retry_delay() {
                            source.schedule_reconnect(delay);
                        }
                    }
                }
                Wake::Event(None) | Wake::Event(Some(HostEvent::Shutdown)) => break,
                Wake::Event(Some(event)) => {
                    if let Some(request) = self.handle_event(event, source).await? {
                        fetches.push(self.spawn_fetch(request));
                    }
                }
            }

            let mode = self.monitor.mode();
            if mode != last_mode {
                last_mode = mode;
                source.notify(EngineUpdate::Connectivity(mode));
            }
        }

        self.shutdown().await;
        Ok(())
    }

    /// Handle one event; returns a page fetch to start, if any.
    async fn handle_event<S: EventSource + ?Sized>(
        &mut self,
        event: HostEvent,
        source: &mut S,
    ) -> SyncResult<Option<PageRequest>> {
        debug!(?event, "host event");
        match event {
            HostEvent::NetworkChanged(up) => {
                let change = self.monitor.on_network_change(up);
                let reaction = self.apply_transition(change.transition).await?;
                let planned = forward(reaction, source);
                if change.probe_now {
                    let transition = self.monitor.probe(&self.remote).await;
                    let reaction = self.apply_transition(transition).await?;
                    return Ok(forward(reaction, source).or(planned));
                }
                Ok(planned)
            }
            HostEvent::ProbeDue => {
                let transition = self.monitor.probe(&self.remote).await;
                let reaction = self.apply_transition(transition).await?;
                Ok(forward(reaction, source))
            }
            HostEvent::ScrollNearEnd => {
                if self.monitor.is_online() {
                    Ok(self.pager.begin_advance())
                } else {
                    Ok(None)
                }
            }
            HostEvent::QueryChanged(update) => {
                let changed = self.pager.update_context(|q| apply_query_update(q, update));
                if !changed {
                    return Ok(None);
                }
                if self.monitor.is_online() {
                    Ok(self.pager.begin_advance())
                } else {
                    let outcome = self.show_local()?;
                    source.notify(EngineUpdate::Page(outcome));
                    Ok(None)
                }
            }
            HostEvent::Submit(op) => {
                let outcome = self.submit(op).await?;
                source.notify(EngineUpdate::Submitted(outcome));
                Ok(None)
            }
            HostEvent::SyncRequested => {
                let mode = self.monitor.mode();
                let report = self.reconciler().reconcile(mode).await?;
                let refreshed = report.refreshed;
                source.notify(EngineUpdate::Reconciled(report));
                if refreshed {
                    self.pager.reset();
                    return Ok(self.pager.begin_advance());
                }
                Ok(None)
            }
            HostEvent::ReconnectDue => {
                if !self.reconnect_push().await && self.monitor.is_online() {
                    if let Some(delay) = self.push_retry_delay() {
                        source.schedule_reconnect(delay);
                    }
                }
                Ok(None)
            }
            HostEvent::Shutdown => Ok(None),
        }
    }

    fn spawn_fetch(&self, request: PageRequest) -> PageFetch {
        let remote = self.remote.clone();
        let planned = request.clone();
        (
            request,
            Box::pin(async move { remote.list_page(planned).await }),
        )
    }
}

/// Report an automatic drain and hand back the fetch to start.
fn forward<S: EventSource + ?Sized>(reaction: Reaction, source: &mut S) -> Option<PageRequest> {
    if let Some(report) = reaction.drained {
        source.notify(EngineUpdate::Reconciled(report));
    }
    reaction.fetch
}

fn apply_query_update(query: &mut QueryContext, update: QueryUpdate) {
    match update {
        QueryUpdate::Search(text) => query.set_search_text(text),
        QueryUpdate::ToggleCategory(category) => query.toggle_category(&category),
        QueryUpdate::MinRating(rating) => query.set_min_rating(rating),
        QueryUpdate::RatingSort(direction) => query.set_rating_sort(direction),
        QueryUpdate::TitleSort(direction) => query.set_title_sort(direction),
    }
}
