// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable log of mutations the remote has not confirmed.
//!
//! Uses JSONL format for durability - each entry is written as a single line
//! and fsynced immediately. The next sequence number lives in a sibling
//! `.seq` file so numbering stays monotonic across restarts, even after the
//! log has been drained empty.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use cs_core::{PendingEntry, PendingOp};
use tracing::warn;

/// Error type for queue operations.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for queue operations.
pub type QueueResult<T> = Result<T, QueueError>;

/// FIFO log of pending operations.
///
/// Entries are never reordered; they only leave the log by sequence number
/// once the remote has confirmed them.
pub struct PendingOperationLog {
    /// Path to the JSONL log file.
    path: PathBuf,
    /// Path to the persisted sequence counter.
    seq_path: PathBuf,
    /// Next sequence number to assign.
    next_sequence: u64,
}

impl PendingOperationLog {
    /// Create or open the log at the given path.
    pub fn open(path: &Path) -> QueueResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        // Ensure the file exists (create if not)
        OpenOptions::new().create(true).append(true).open(path)?;

        let seq_path = path.with_extension("seq");
        let mut log = PendingOperationLog {
            path: path.to_path_buf(),
            seq_path,
            next_sequence: 1,
        };

        let (entries, torn) = log.read_entries()?;
        if torn {
            log.rewrite(&entries)?;
        }
        let persisted = log.read_sequence();
        let highest = entries.last().map(|e| e.sequence + 1).unwrap_or(1);
        log.next_sequence = persisted.max(highest);
        Ok(log)
    }

    fn read_sequence(&self) -> u64 {
        std::fs::read_to_string(&self.seq_path)
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(1)
    }

    fn write_sequence(&self, next: u64) -> QueueResult<()> {
        let mut file = File::create(&self.seq_path)?;
        write!(file, "{}", next)?;
        file.sync_all()?;
        Ok(())
    }

    /// Path of the JSONL log.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append an operation, assigning the next sequence number.
    ///
    /// The entry is persisted before the sequence number is returned.
    pub fn append(&mut self, op: PendingOp) -> QueueResult<u64> {
        let sequence = self.next_sequence;
        let entry = PendingEntry::new(sequence, Utc::now(), op);

        // Counter first: a crash between the two writes skips a number but
        // never reuses one.
        self.write_sequence(sequence + 1)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let json = serde_json::to_string(&entry)?;
        writeln!(file, "{}", json)?;
        file.sync_all()?;

        self.next_sequence = sequence + 1;
        Ok(sequence)
    }

    /// Read all entries in FIFO order without removing them.
    pub fn list(&self) -> QueueResult<Vec<PendingEntry>> {
        Ok(self.read_entries()?.0)
    }

    /// Parse every entry. A final line that does not parse is the remains of
    /// an interrupted append: it is skipped and reported as `true`. A bad
    /// line anywhere else is an error.
    fn read_entries(&self) -> QueueResult<(Vec<PendingEntry>, bool)> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok((Vec::new(), false));
            }
            Err(e) => return Err(e.into()),
        };

        let lines = BufReader::new(file)
            .lines()
            .collect::<Result<Vec<_>, _>>()?;
        let last = lines.iter().rposition(|l| !l.trim().is_empty());
        let mut entries = Vec::new();
        let mut torn = false;

        for (idx, line) in lines.iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<PendingEntry>(line) {
                Ok(entry) => entries.push(entry),
                Err(e) if Some(idx) == last => {
                    warn!(path = %self.path.display(), error = %e, "dropping torn final entry");
                    torn = true;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok((entries, torn))
    }

    /// Remove one entry by sequence number. Returns true if it was present.
    ///
    /// The remaining entries keep their relative order.
    pub fn remove(&mut self, sequence: u64) -> QueueResult<bool> {
        let entries = self.list()?;
        let before = entries.len();
        let remaining: Vec<_> = entries
            .into_iter()
            .filter(|e| e.sequence != sequence)
            .collect();
        if remaining.len() == before {
            return Ok(false);
        }
        self.rewrite(&remaining)?;
        Ok(true)
    }

    /// Rewrite the file atomically with the given entries.
    fn rewrite(&self, entries: &[PendingEntry]) -> QueueResult<()> {
        let tmp_path = self.path.with_extension("jsonl.tmp");
        {
            let mut file = File::create(&tmp_path)?;
            for entry in entries {
                let json = serde_json::to_string(entry)?;
                writeln!(file, "{}", json)?;
            }
            file.sync_all()?;
        }
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Get the number of pending entries.
    pub fn len(&self) -> QueueResult<usize> {
        Ok(self.list()?.len())
    }

    /// Check if the log is empty.
    pub fn is_empty(&self) -> QueueResult<bool> {
        Ok(self.len()? == 0)
    }
}
