// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity mode tracking.
//!
//! The monitor combines two independent signals, the host's network state
//! and the outcome of the last health probe, into one mode that every other
//! component reads before choosing between local and remote behavior.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use super::remote::Remote;

/// Derived connectivity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Network up and server answering.
    Online,
    /// Network up, server not answering.
    Degraded,
    /// No network.
    Offline,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Online => "online",
            Mode::Degraded => "degraded",
            Mode::Offline => "offline",
        };
        write!(f, "{}", name)
    }
}

/// A change of mode that other components react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Entered Online from a non-Online mode.
    BecameAvailable,
    /// Left Online.
    LeftOnline,
}

/// Result of a network state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkChange {
    pub transition: Option<Transition>,
    /// The network just came up; probe the server now.
    pub probe_now: bool,
}

/// Produces the authoritative connectivity mode.
#[derive(Debug, Clone)]
pub struct ConnectivityMonitor {
    network_up: bool,
    server_up: bool,
    probe_interval: Duration,
}

impl ConnectivityMonitor {
    /// Start with the given network state. The server is presumed down until
    /// a probe says otherwise.
    pub fn new(network_up: bool, probe_interval: Duration) -> Self {
        ConnectivityMonitor {
            network_up,
            server_up: false,
            probe_interval,
        }
    }

    pub fn mode(&self) -> Mode {
        match (self.network_up, self.server_up) {
            (true, true) => Mode::Online,
            (true, false) => Mode::Degraded,
            (false, _) => Mode::Offline,
        }
    }

    pub fn is_online(&self) -> bool {
        self.mode() == Mode::Online
    }

    pub fn network_up(&self) -> bool {
        self.network_up
    }

    pub fn server_up(&self) -> bool {
        self.server_up
    }

    pub fn probe_interval(&self) -> Duration {
        self.probe_interval
    }

    /// Periodic probes run only while the network is up.
    pub fn should_probe(&self) -> bool {
        self.network_up
    }

    /// Record a host network event.
    ///
    /// Losing the network also forgets the last probe result, so the next
    /// entry into Online always follows a fresh probe.
    pub fn on_network_change(&mut self, up: bool) -> NetworkChange {
        let before = self.mode();
        let came_up = up && !self.network_up;
        self.network_up = up;
        if !up {
            self.server_up = false;
        }
        let transition = self.transition_from(before);
        debug!(network_up = up, mode = %self.mode(), "network change");
        NetworkChange {
            transition,
            probe_now: came_up,
        }
    }

    /// Record the outcome of a health probe.
    pub fn record_probe(&mut self, ok: bool) -> Option<Transition> {
        let before = self.mode();
        self.server_up = ok;
        self.transition_from(before)
    }

    /// Probe the remote and record the result.
    ///
    /// Does nothing while the network is down. Any failure marks the server
    /// as down.
    pub async fn probe<R: Remote + ?Sized>(&mut self, remote: &R) -> Option<Transition> {
        if !self.should_probe() {
            return None;
        }
        let ok = match remote.health().await {
            Ok(()) => true,
            Err(e) => {
                debug!(error = %e, "health probe failed");
                false
            }
        };
        self.record_probe(ok)
    }

    fn transition_from(&self, before: Mode) -> Option<Transition> {
        let after = self.mode();
        let transition = match (before == Mode::Online, after == Mode::Online) {
            (false, true) => Some(Transition::BecameAvailable),
            (true, false) => Some(Transition::LeftOnline),
            _ => None,
        };
        if transition.is_some() {
            info!(from = %before, to = %after, "connectivity changed");
        }
        transition
    }
}
