// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Single-engine lock on the data directory.
//!
//! The cache and the pending log have exactly one writer. Every command that
//! opens an engine takes an exclusive advisory lock on `engine.lock` first and
//! holds it until the engine is dropped.

use std::fs::{self, File, OpenOptions};
use std::path::Path;

use fs2::FileExt;

use crate::error::{Error, Result};

/// Guard for the engine lock. Released on drop.
#[derive(Debug)]
pub struct EngineLock {
    file: File,
}

impl EngineLock {
    /// Take the lock without blocking.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Locked`] if another process holds it.
    pub fn acquire(lock_path: &Path) -> Result<Self> {
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(lock_path)?;
        file.try_lock_exclusive()
            .map_err(|_| Error::Locked(lock_path.display().to_string()))?;
        Ok(EngineLock { file })
    }
}

impl Drop for EngineLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
