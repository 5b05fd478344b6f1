// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod list;
pub mod mutate;
pub mod pending;
pub mod show;
pub mod status;
pub mod sync;
pub mod watch;

use crate::config::Config;
use crate::error::Result;
use crate::lock::EngineLock;
use crate::sync::{
    Backoff, EngineOptions, HttpRemote, PendingOperationLog, RealtimeSubscriber, StompTransport,
    SyncEngine,
};
use cs_core::LocalCache;

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: Config,
    /// Treat the network as down from the start.
    pub offline: bool,
}

impl Context {
    pub fn new(config: Config, offline: bool) -> Self {
        Context { config, offline }
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            network_up: !self.offline,
            probe_interval: self.config.remote.health_interval(),
            page_size: self.config.paging.page_size,
            refresh_page_size: self.config.paging.refresh_page_size,
        }
    }

    pub fn remote(&self) -> Result<HttpRemote> {
        Ok(HttpRemote::new(
            &self.config.remote.base_url,
            self.config.remote.request_timeout(),
        )?)
    }
}

/// An engine together with the lock that makes it the only writer.
pub struct Session {
    pub engine: SyncEngine<HttpRemote>,
    // Declared after the engine so it is released last.
    _lock: EngineLock,
}

/// Helper to open the engine from the current context.
pub fn open_engine(ctx: &Context) -> Result<Session> {
    let lock = EngineLock::acquire(&ctx.config.lock_path())?;
    let cache = LocalCache::open(&ctx.config.cache_path())?;
    let log = PendingOperationLog::open(&ctx.config.pending_path())?;
    let engine = SyncEngine::new(ctx.remote()?, cache, log, ctx.engine_options());
    Ok(Session {
        engine,
        _lock: lock,
    })
}

/// Like [`open_engine`], with the push channel attached when configured.
pub fn open_live_engine(ctx: &Context) -> Result<Session> {
    let Session { engine, _lock } = open_engine(ctx)?;
    let engine = match ctx.config.remote.push_url() {
        Some(url) => {
            let backoff = Backoff::new(
                ctx.config.remote.reconnect_initial_delay(),
                ctx.config.remote.reconnect_max_delay(),
            );
            engine.with_realtime(RealtimeSubscriber::new(StompTransport::new(), url, backoff))
        }
        None => engine,
    };
    Ok(Session { engine, _lock })
}

#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;
