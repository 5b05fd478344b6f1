// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tokio host for [`SyncEngine::run`].
//!
//! [`TokioEventSource`] merges three inputs into [`HostEvent`]s: commands
//! sent on its channel, the health-probe interval, and cancellation. Reconnect
//! delays are timers that post back onto the same channel.

use std::io::Write;
use std::time::Duration;

use cs_core::SortDirection;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::display::format_update;
use crate::error::Result;
use crate::sync::{EngineUpdate, EventFuture, EventSource, HostEvent, QueryUpdate, Remote, SyncEngine};

const CHANNEL_CAPACITY: usize = 64;

/// Event source backed by a tokio channel and interval.
pub struct TokioEventSource<W> {
    tx: mpsc::Sender<HostEvent>,
    rx: mpsc::Receiver<HostEvent>,
    probe: Interval,
    cancel: CancellationToken,
    out: W,
}

impl<W: Write + Send> TokioEventSource<W> {
    /// The first probe tick fires one `probe_interval` from now.
    pub fn new(probe_interval: Duration, cancel: CancellationToken, out: W) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let mut probe = tokio::time::interval_at(Instant::now() + probe_interval, probe_interval);
        probe.set_missed_tick_behavior(MissedTickBehavior::Delay);
        TokioEventSource {
            tx,
            rx,
            probe,
            cancel,
            out,
        }
    }

    /// Sender for feeding events from other tasks.
    pub fn sender(&self) -> mpsc::Sender<HostEvent> {
        self.tx.clone()
    }

    pub fn into_output(self) -> W {
        self.out
    }
}

impl<W: Write + Send> EventSource for TokioEventSource<W> {
    fn next_event(&mut self) -> EventFuture<'_> {
        Box::pin(async move {
            tokio::select! {
                _ = self.cancel.cancelled() => Some(HostEvent::Shutdown),
                event = self.rx.recv() => event,
                _ = self.probe.tick() => Some(HostEvent::ProbeDue),
            }
        })
    }

    fn schedule_reconnect(&mut self, delay: Duration) {
        debug!(?delay, "push reconnect scheduled");
        let tx = self.tx.clone();
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let _ = tx.send(HostEvent::ReconnectDue).await;
                }
            }
        });
    }

    fn notify(&mut self, update: EngineUpdate) {
        if let Some(line) = format_update(&update) {
            let _ = writeln!(self.out, "{}", line);
            let _ = self.out.flush();
        }
    }
}

/// Parse one line of `watch` input.
///
/// Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> std::result::Result<Option<HostEvent>, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    let event = match verb {
        "" => return Ok(None),
        "more" => HostEvent::ScrollNearEnd,
        "sync" => HostEvent::SyncRequested,
        "quit" | "exit" => HostEvent::Shutdown,
        "search" => HostEvent::QueryChanged(QueryUpdate::Search(rest.to_string())),
        "category" if !rest.is_empty() => {
            HostEvent::QueryChanged(QueryUpdate::ToggleCategory(rest.to_string()))
        }
        "min" => HostEvent::QueryChanged(QueryUpdate::MinRating(parse_rating(rest)?)),
        "sort" => parse_sort(rest)?,
        "network" => match rest {
            "up" => HostEvent::NetworkChanged(true),
            "down" => HostEvent::NetworkChanged(false),
            _ => return Err("usage: network up|down".to_string()),
        },
        _ => return Err(format!("unknown command '{}'", line)),
    };
    Ok(Some(event))
}

fn parse_rating(s: &str) -> std::result::Result<Option<f64>, String> {
    if s == "none" {
        return Ok(None);
    }
    s.parse::<f64>()
        .map(Some)
        .map_err(|_| format!("invalid rating '{}'", s))
}

fn parse_sort(s: &str) -> std::result::Result<HostEvent, String> {
    let usage = || "usage: sort rating|title asc|desc|none".to_string();
    let (field, direction) = s.split_once(char::is_whitespace).ok_or_else(usage)?;
    let direction = match direction.trim() {
        "none" => None,
        other => Some(other.parse::<SortDirection>().map_err(|e| e.to_string())?),
    };
    let update = match field {
        "rating" => QueryUpdate::RatingSort(direction),
        "title" => QueryUpdate::TitleSort(direction),
        _ => return Err(usage()),
    };
    Ok(HostEvent::QueryChanged(update))
}

fn spawn_signal_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupted");
            cancel.cancel();
        }
    });
}

/// Forward stdin commands until EOF or cancellation.
fn spawn_stdin_reader(tx: mpsc::Sender<HostEvent>, cancel: CancellationToken) {
    tokio::spawn(async move {
        let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = tokio::select! {
                _ = cancel.cancelled() => break,
                line = lines.next_line() => line,
            };
            match line {
                Ok(Some(line)) => match parse_command(&line) {
                    Ok(Some(event)) => {
                        if tx.send(event).await.is_err() {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => eprintln!("error: {}", e),
                },
                Ok(None) => {
                    debug!("stdin closed");
                    break;
                }
                Err(e) => {
                    eprintln!("error: {}", e);
                    break;
                }
            }
        }
    });
}

/// Run the engine until ctrl-c or `quit`.
pub async fn watch<R, W>(engine: &mut SyncEngine<R>, probe_interval: Duration, out: W) -> Result<()>
where
    R: Remote + Clone + 'static,
    W: Write + Send,
{
    let cancel = CancellationToken::new();
    let mut source = TokioEventSource::new(probe_interval, cancel.clone(), out);
    spawn_signal_handler(cancel.clone());
    spawn_stdin_reader(source.sender(), cancel.clone());

    let result = engine.run(&mut source).await;
    cancel.cancel();
    Ok(result?)
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
