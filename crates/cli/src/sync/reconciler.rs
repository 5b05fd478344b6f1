// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Mutation routing and pending-log drain.
//!
//! A mutation is attempted against the remote only while Online. Any
//! failure, or any non-Online mode, routes it through the offline branch:
//! applied to the cache optimistically and appended to the pending log.
//!
//! The drain walks the log in FIFO order and skips past failed entries
//! instead of stopping at them. Entries that keep failing are retained
//! and retried on every drain; nothing expires them.

use cs_core::{LocalCache, Movie, PendingOp};
use tracing::{debug, info, warn};

use super::connectivity::Mode;
use super::error::{SyncError, SyncResult};
use super::queue::PendingOperationLog;
use super::remote::{PageRequest, Remote, RemoteResult};

/// Page size used by the full refresh walk.
pub const DEFAULT_REFRESH_PAGE_SIZE: u32 = 100;

/// How a submitted mutation was accepted.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The remote confirmed it.
    Confirmed { movie: Option<Movie> },
    /// Queued for a later drain.
    OfflineAccepted { sequence: u64, movie: Option<Movie> },
}

impl SubmitOutcome {
    /// The entity as now cached; `None` for deletes.
    pub fn movie(&self) -> Option<&Movie> {
        match self {
            SubmitOutcome::Confirmed { movie } | SubmitOutcome::OfflineAccepted { movie, .. } => {
                movie.as_ref()
            }
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, SubmitOutcome::Confirmed { .. })
    }
}

/// Summary of one drain pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// The cache was replaced from a full remote listing.
    pub refreshed: bool,
}

/// Applies an operation to the cache without contacting the remote.
///
/// Returns the entity as cached, or `None` for a delete.
pub fn apply_locally(cache: &LocalCache, op: &PendingOp) -> cs_core::Result<Option<Movie>> {
    match op {
        PendingOp::Add { payload } => {
            cache.upsert(payload)?;
            Ok(Some(payload.clone()))
        }
        PendingOp::Update { target_id, payload } => {
            let movie = payload.with_id(*target_id);
            cache.upsert(&movie)?;
            Ok(Some(movie))
        }
        PendingOp::Delete { target_id } => {
            cache.remove(*target_id)?;
            Ok(None)
        }
    }
}

/// Issue the remote call matching an operation.
///
/// For adds, returns the confirmed entity when the remote echoes it.
async fn send_op<R: Remote + ?Sized>(remote: &R, op: &PendingOp) -> RemoteResult<Option<Movie>> {
    match op {
        PendingOp::Add { payload } => remote.create(payload.clone()).await,
        PendingOp::Update { target_id, payload } => {
            remote.update(*target_id, payload.with_id(*target_id)).await?;
            Ok(None)
        }
        PendingOp::Delete { target_id } => {
            remote.delete(*target_id).await?;
            Ok(None)
        }
    }
}

/// Converges the pending log with the remote.
///
/// Borrows the engine's single cache and log for the duration of one
/// submission or drain.
pub struct SyncReconciler<'a, R: Remote + ?Sized> {
    remote: &'a R,
    cache: &'a mut LocalCache,
    log: &'a mut PendingOperationLog,
    refresh_page_size: u32,
}

impl<'a, R: Remote + ?Sized> SyncReconciler<'a, R> {
    pub fn new(remote: &'a R, cache: &'a mut LocalCache, log: &'a mut PendingOperationLog) -> Self {
        SyncReconciler {
            remote,
            cache,
            log,
            refresh_page_size: DEFAULT_REFRESH_PAGE_SIZE,
        }
    }

    pub fn with_refresh_page_size(mut self, size: u32) -> Self {
        self.refresh_page_size = size.max(1);
        self
    }

    /// Route one mutation.
    ///
    /// Never fails because of the remote; an error here means the cache or
    /// the log could not be written.
    pub async fn submit(&mut self, op: PendingOp, mode: Mode) -> SyncResult<SubmitOutcome> {
        if mode == Mode::Online {
            match send_op(self.remote, &op).await {
                Ok(echo) => return self.confirm(op, echo),
                Err(e) => {
                    warn!(kind = op.kind(), target = op.target_id(), error = %e, "submission failed, accepting offline");
                }
            }
        }
        self.accept_offline(op)
    }

    fn confirm(&mut self, op: PendingOp, echo: Option<Movie>) -> SyncResult<SubmitOutcome> {
        let movie = match (op, echo) {
            (PendingOp::Add { .. }, Some(created)) => {
                self.cache.upsert(&created)?;
                Some(created)
            }
            (PendingOp::Add { payload }, None) => {
                let minted = self.mint_local(payload)?;
                apply_locally(self.cache, &PendingOp::add(minted))?
            }
            (op, _) => apply_locally(self.cache, &op)?,
        };
        debug!(id = ?movie.as_ref().map(|m| m.id), "submission confirmed");
        Ok(SubmitOutcome::Confirmed { movie })
    }

    fn accept_offline(&mut self, op: PendingOp) -> SyncResult<SubmitOutcome> {
        let op = match op {
            PendingOp::Add { payload } => PendingOp::add(self.mint_local(payload)?),
            other => other,
        };
        let movie = apply_locally(self.cache, &op)?;
        let sequence = self.log.append(op)?;
        info!(sequence, "mutation accepted offline");
        Ok(SubmitOutcome::OfflineAccepted { sequence, movie })
    }

    /// Give an unconfirmed entity a temporary negative id.
    fn mint_local(&self, payload: Movie) -> SyncResult<Movie> {
        if payload.is_local() {
            return Ok(payload);
        }
        let id = self.cache.next_local_id()?;
        Ok(payload.with_id(id))
    }

    /// Drain the pending log, then refresh the cache if Online.
    ///
    /// Remote failures are logged and counted, never returned.
    pub async fn reconcile(&mut self, mode: Mode) -> SyncResult<ReconcileReport> {
        let mut report = ReconcileReport::default();

        if mode == Mode::Offline {
            debug!("offline, drain skipped");
            return Ok(report);
        }

        let entries = self.log.list()?;
        for entry in entries {
            report.attempted += 1;
            match send_op(self.remote, &entry.op).await {
                Ok(_) => {
                    self.log.remove(entry.sequence)?;
                    report.succeeded += 1;
                }
                Err(e) => {
                    warn!(
                        sequence = entry.sequence,
                        kind = entry.op.kind(),
                        target = entry.op.target_id(),
                        error = %e,
                        "pending operation failed, retained"
                    );
                    report.failed += 1;
                }
            }
        }

        if mode == Mode::Online {
            match self.refresh().await {
                Ok(count) => {
                    report.refreshed = true;
                    debug!(count, "cache refreshed");
                }
                Err(SyncError::Remote(e)) => warn!(error = %e, "refresh failed"),
                Err(e) => return Err(e),
            }
        }

        info!(
            attempted = report.attempted,
            succeeded = report.succeeded,
            failed = report.failed,
            refreshed = report.refreshed,
            "reconcile finished"
        );
        Ok(report)
    }

    /// Replace the cache with the full plain listing.
    ///
    /// Operations still pending are re-applied afterwards so unconfirmed
    /// intent stays visible. Returns the number of remote records.
    pub async fn refresh(&mut self) -> SyncResult<usize> {
        let size = self.refresh_page_size;
        let mut all = Vec::new();
        let mut page = 0;
        loop {
            let (items, more) = self.remote.list_page(PageRequest::plain(page, size)).await?;
            let count = items.len();
            all.extend(items);
            if count == 0 || !more.unwrap_or(count == size as usize) {
                break;
            }
            page += 1;
        }

        self.cache.replace_all(&all)?;
        for entry in self.log.list()? {
            apply_locally(self.cache, &entry.op)?;
        }
        Ok(all.len())
    }
}
