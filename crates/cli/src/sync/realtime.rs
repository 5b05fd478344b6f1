// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Push-merge logic and push connection lifecycle.
//!
//! Entity messages are authoritative: an entity already in the live list is
//! replaced in place, an unseen one is prepended, and both are upserted into
//! the cache. Aggregate messages pass through untouched.
//!
//! Nothing is buffered across a disconnect. A client that missed messages
//! catches up through the full refresh that follows reconnection.

use std::time::Duration;

use cs_core::protocol::{AggregateUpdate, PushMessage, Topic};
use cs_core::{LocalCache, Movie};
use tracing::{debug, info, warn};

use super::live::LiveView;
use super::push::{PushTransport, TransportFuture, TransportResult};

/// What a push message did.
#[derive(Debug, Clone, PartialEq)]
pub enum PushOutcome {
    /// Replaced the live entry with the same id.
    Replaced(Movie),
    /// Prepended an entity not in the live list.
    Inserted(Movie),
    /// Aggregate data for external observers.
    Aggregate(AggregateUpdate),
}

/// Capped exponential backoff.
#[derive(Debug, Clone)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    current: Duration,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Backoff {
            initial,
            max: max.max(initial),
            current: initial,
        }
    }

    /// The delay to wait now; doubles the next one up to the cap.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = std::cmp::min(self.current * 2, self.max);
        delay
    }

    pub fn reset(&mut self) {
        self.current = self.initial;
    }
}

/// Keeps the live list current from the push channel.
pub struct RealtimeSubscriber<P: PushTransport> {
    transport: P,
    url: String,
    topics: Vec<Topic>,
    backoff: Backoff,
}

impl<P: PushTransport> RealtimeSubscriber<P> {
    /// Subscribes to every known topic on connect.
    pub fn new(transport: P, url: &str, backoff: Backoff) -> Self {
        RealtimeSubscriber {
            transport,
            url: url.to_string(),
            topics: Topic::ALL.to_vec(),
            backoff,
        }
    }

    /// Restrict the topics subscribed on connect.
    pub fn with_topics(mut self, topics: &[Topic]) -> Self {
        self.topics = topics.to_vec();
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Open the connection and subscribe to every topic.
    pub async fn connect(&mut self) -> TransportResult<()> {
        self.transport.connect(&self.url).await?;
        for topic in &self.topics {
            if let Err(e) = self.transport.subscribe(*topic).await {
                let _ = self.transport.disconnect().await;
                return Err(e);
            }
        }
        self.backoff.reset();
        info!(url = %self.url, topics = self.topics.len(), "push connected");
        Ok(())
    }

    /// Close the connection, if open.
    pub async fn teardown(&mut self) {
        if self.transport.is_connected() {
            if let Err(e) = self.transport.disconnect().await {
                warn!(error = %e, "push disconnect failed");
            }
            info!("push disconnected");
        }
    }

    /// Delay before the next reconnect attempt.
    pub fn retry_delay(&mut self) -> Duration {
        self.backoff.next_delay()
    }

    /// Next message from the push channel. `None` when the connection closed.
    pub fn recv(&mut self) -> TransportFuture<'_, Option<PushMessage>> {
        self.transport.recv()
    }

    /// Merge one message into the live list and the cache.
    pub fn apply(
        message: PushMessage,
        live: &mut LiveView,
        cache: &LocalCache,
    ) -> cs_core::Result<PushOutcome> {
        match message {
            PushMessage::Movie(movie) => {
                cache.upsert(&movie)?;
                if live.replace_in_place(movie.clone()) {
                    debug!(id = movie.id, "push replaced entry");
                    Ok(PushOutcome::Replaced(movie))
                } else {
                    live.prepend(movie.clone());
                    debug!(id = movie.id, "push inserted entry");
                    Ok(PushOutcome::Inserted(movie))
                }
            }
            PushMessage::Aggregate(update) => Ok(PushOutcome::Aggregate(update)),
        }
    }
}
