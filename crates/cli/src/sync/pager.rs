// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Incremental paging under the current query context.
//!
//! The engine is split into planning and completion so that the fetch itself
//! can run wherever the host likes:
//!
//! 1. [`PaginatedQueryEngine::begin_advance`] returns the next request, or
//!    `None` if a fetch is already outstanding or nothing remains.
//! 2. The caller runs the request against the remote.
//! 3. [`PaginatedQueryEngine::complete`] applies the result to the live list
//!    and the cache.
//!
//! Offline, [`PaginatedQueryEngine::serve_local`] evaluates the whole cache in
//! one pass and leaves the engine exhausted.
//!
//! A context change resets paging and may start a new page-0 fetch while an
//! older one is still running. The older result is still applied when it
//! lands.

use cs_core::{LocalCache, QueryContext, QueryMode};
use tracing::{debug, warn};

use super::error::SyncResult;
use super::live::LiveView;
use super::remote::{PageRequest, PageResponse, RemoteError, RemoteResult};

/// Result of one paging step.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    /// A remote page was applied.
    Loaded { count: usize, has_more: bool },
    /// The view was computed from the cache.
    Local { count: usize },
    /// The fetch failed; paging state is unchanged.
    Failed(RemoteError),
    /// Nothing to do: a fetch is outstanding or the listing is exhausted.
    Idle,
}

#[derive(Debug, Clone)]
pub struct PaginatedQueryEngine {
    context: QueryContext,
    in_flight: Option<PageRequest>,
    has_more: bool,
    /// The next fetch starts a new accumulation.
    reset_pending: bool,
}

impl PaginatedQueryEngine {
    pub fn new(page_size: u32) -> Self {
        PaginatedQueryEngine {
            context: QueryContext::new(page_size),
            in_flight: None,
            has_more: true,
            reset_pending: true,
        }
    }

    pub fn context(&self) -> &QueryContext {
        &self.context
    }

    pub fn mode(&self) -> QueryMode {
        self.context.mode()
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Apply a change to the query context.
    ///
    /// Returns true if a filter, search or sort field changed, in which case
    /// paging restarts from page 0.
    pub fn update_context<F>(&mut self, change: F) -> bool
    where
        F: FnOnce(&mut QueryContext),
    {
        let before = self.context.clone();
        change(&mut self.context);
        if self.context.same_query(&before) {
            self.context.page = before.page;
            self.context.page_size = before.page_size;
            return false;
        }
        debug!(mode = %self.context.mode(), "query context changed");
        self.reset();
        true
    }

    /// Restart paging from page 0. Accumulated results are discarded by the
    /// next completed page.
    pub fn reset(&mut self) {
        self.context.page = 0;
        self.has_more = true;
        self.reset_pending = true;
    }

    /// Plan the next fetch.
    ///
    /// Advance requests while a fetch is outstanding are ignored, except
    /// right after a reset.
    pub fn begin_advance(&mut self) -> Option<PageRequest> {
        if self.in_flight.is_some() && !self.reset_pending {
            debug!("page fetch outstanding, advance ignored");
            return None;
        }
        if !self.has_more {
            return None;
        }
        let request = PageRequest::from_context(&self.context);
        self.in_flight = Some(request.clone());
        self.reset_pending = false;
        Some(request)
    }

    /// Apply a fetch result.
    ///
    /// Page 0 replaces the live list; later pages append. Every fetched
    /// page is persisted into the cache.
    pub fn complete(
        &mut self,
        request: &PageRequest,
        result: RemoteResult<PageResponse>,
        live: &mut LiveView,
        cache: &mut LocalCache,
    ) -> SyncResult<PageOutcome> {
        let current = self.in_flight.as_ref() == Some(request);
        if current {
            self.in_flight = None;
        } else {
            debug!(page = request.page, mode = %request.mode(), "applying superseded page");
        }

        let (items, flag) = match result {
            Ok(response) => response,
            Err(e) => {
                warn!(page = request.page, error = %e, "page fetch failed");
                return Ok(PageOutcome::Failed(e));
            }
        };

        let count = items.len();
        let has_more = flag.unwrap_or(count == request.size as usize);
        cache.upsert_all(&items)?;
        if request.page == 0 {
            live.replace(items);
        } else {
            live.append(items);
        }

        if current {
            self.has_more = has_more;
            self.context.page = request.page + 1;
        }
        debug!(page = request.page, count, has_more, "page applied");
        Ok(PageOutcome::Loaded { count, has_more })
    }

    /// Compute the view from the cache in one pass.
    pub fn serve_local(&mut self, live: &mut LiveView, cache: &LocalCache) -> SyncResult<usize> {
        let items = self.context.evaluate(&cache.read_all()?);
        let count = items.len();
        live.replace(items);
        live.extend_categories(cache.categories()?);
        self.in_flight = None;
        self.has_more = false;
        self.reset_pending = false;
        Ok(count)
    }
}
