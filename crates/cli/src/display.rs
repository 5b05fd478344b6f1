// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use cs_core::{Movie, PendingEntry, PendingOp};

use crate::sync::{
    EngineUpdate, Mode, PageOutcome, PushOutcome, ReconcileReport, SubmitOutcome,
};

/// Maximum line width for wrapped text content (excluding 4-space indent).
const WRAP_WIDTH: usize = 96;

/// Wrap text at word boundaries if it's a single line.
///
/// - If content contains newlines: return as-is (preserve user formatting)
/// - If content is single line >width: wrap at word boundaries
/// - If content is single line <=width: return as-is
pub fn wrap_text(content: &str, width: usize) -> String {
    if content.contains('\n') || content.len() <= width {
        return content.to_string();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in content.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.len() + 1 + word.len() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines.join("\n")
}

/// Id as shown to users. Unconfirmed local ids carry a `~`.
pub fn format_id(id: i64) -> String {
    if id < 0 {
        format!("~{}", -id)
    } else {
        id.to_string()
    }
}

/// Format a single movie line for list output
pub fn format_movie_line(movie: &Movie) -> String {
    format!(
        "- [{}] {}: {} ({:.1})",
        movie.category,
        format_id(movie.id),
        movie.title,
        movie.rating
    )
}

/// Format movie details for show command
pub fn format_movie_details(movie: &Movie) -> String {
    let mut output = vec![
        format!("[{}] {}", movie.category, format_id(movie.id)),
        format!("Title: {}", movie.title),
        format!("Rating: {:.1}", movie.rating),
    ];
    if movie.is_local() {
        output.push("Sync: pending".to_string());
    }
    if !movie.description.is_empty() {
        output.push(String::new());
        output.push("Description:".to_string());
        for line in wrap_text(&movie.description, WRAP_WIDTH).lines() {
            output.push(format!("    {}", line));
        }
    }
    output.join("\n")
}

/// One line per pending log entry: sequence, enqueue time, kind, target.
pub fn format_pending_entry(entry: &PendingEntry) -> String {
    let target = format_id(entry.op.target_id());
    let detail = match &entry.op {
        PendingOp::Add { payload } | PendingOp::Update { payload, .. } => {
            format!(" {}", payload.title)
        }
        PendingOp::Delete { .. } => String::new(),
    };
    format!(
        "#{} {} {} {}{}",
        entry.sequence,
        entry.enqueued_at.format("%Y-%m-%d %H:%M"),
        entry.op.kind(),
        target,
        detail
    )
}

/// Snapshot shown by `cinesync status`.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct StatusReport {
    pub mode: Mode,
    pub network_up: bool,
    pub server_up: bool,
    pub base_url: String,
    pub cached: usize,
    pub pending: usize,
}

pub fn format_status(status: &StatusReport) -> String {
    [
        format!("Mode: {}", status.mode),
        format!("Remote: {}", status.base_url),
        format!(
            "Network: {}  Server: {}",
            up_down(status.network_up),
            up_down(status.server_up)
        ),
        format!("Cached: {}", status.cached),
        format!("Pending: {}", status.pending),
    ]
    .join("\n")
}

fn up_down(up: bool) -> &'static str {
    if up {
        "up"
    } else {
        "down"
    }
}

pub fn format_report(report: &ReconcileReport) -> String {
    let mut line = format!(
        "Synced {} of {} pending ({} failed)",
        report.succeeded, report.attempted, report.failed
    );
    if report.refreshed {
        line.push_str(", cache refreshed");
    }
    line
}

pub fn format_submit(kind: &str, outcome: &SubmitOutcome) -> String {
    // A confirmed entity with a local id was not echoed; its id is unknown.
    let subject = outcome
        .movie()
        .filter(|m| !(outcome.is_confirmed() && m.is_local()))
        .map(|m| format!(" {}", format_id(m.id)))
        .unwrap_or_default();
    match outcome {
        SubmitOutcome::Confirmed { .. } => format!("{}{}: confirmed", kind, subject),
        SubmitOutcome::OfflineAccepted { sequence, .. } => {
            format!("{}{}: queued as #{}", kind, subject, sequence)
        }
    }
}

/// Line printed by `cinesync watch` for an engine update. Idle pages print
/// nothing.
pub fn format_update(update: &EngineUpdate) -> Option<String> {
    match update {
        EngineUpdate::Connectivity(mode) => Some(format!("* mode: {}", mode)),
        EngineUpdate::Page(PageOutcome::Loaded { count, has_more }) => Some(format!(
            "* page: {} loaded{}",
            count,
            if *has_more { ", more available" } else { "" }
        )),
        EngineUpdate::Page(PageOutcome::Local { count }) => {
            Some(format!("* page: {} from cache", count))
        }
        EngineUpdate::Page(PageOutcome::Failed(e)) => Some(format!("* page failed: {}", e)),
        EngineUpdate::Page(PageOutcome::Idle) => None,
        EngineUpdate::Pushed(PushOutcome::Replaced(movie)) => {
            Some(format!("* updated {}", format_movie_line(movie)))
        }
        EngineUpdate::Pushed(PushOutcome::Inserted(movie)) => {
            Some(format!("* new {}", format_movie_line(movie)))
        }
        EngineUpdate::Pushed(PushOutcome::Aggregate(agg)) => {
            Some(format!("* {}: {}", agg.topic.destination(), agg.payload))
        }
        EngineUpdate::Submitted(outcome) => Some(format!("* {}", format_submit("submit", outcome))),
        EngineUpdate::Reconciled(report) => Some(format!("* {}", format_report(report))),
    }
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
