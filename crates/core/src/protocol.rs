// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Wire shapes exchanged with the catalog service.
//!
//! - The plain listing returns a paged envelope carrying an explicit `last`
//!   flag; filter and sort listings return bare arrays.
//! - The push channel delivers entity changes on `/topic/movies` and derived
//!   aggregates on the chart topics.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::movie::Movie;
use crate::stomp::{Command, Frame};

/// Paged envelope returned by the plain listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageEnvelope {
    pub content: Vec<Movie>,
    /// True when this is the final page.
    pub last: bool,
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
}

/// A listing response, whichever endpoint shape produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ListResponse {
    Paged(PageEnvelope),
    Bare(Vec<Movie>),
}

impl ListResponse {
    /// Splits into the items and the explicit "more remains" flag, if any.
    pub fn into_parts(self) -> (Vec<Movie>, Option<bool>) {
        match self {
            ListResponse::Paged(page) => (page.content, Some(!page.last)),
            ListResponse::Bare(items) => (items, None),
        }
    }
}

/// Push channel topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    /// Entity changes.
    Movies,
    /// Movie count per category.
    CategoryCounts,
    /// Average rating per category.
    CategoryRatings,
}

impl Topic {
    /// Every topic, entity topic first.
    pub const ALL: [Topic; 3] = [Topic::Movies, Topic::CategoryCounts, Topic::CategoryRatings];

    /// STOMP destination for this topic.
    pub fn destination(&self) -> &'static str {
        match self {
            Topic::Movies => "/topic/movies",
            Topic::CategoryCounts => "/topic/charts/categories",
            Topic::CategoryRatings => "/topic/charts/ratings",
        }
    }

    /// Reverse of [`Topic::destination`].
    pub fn from_destination(destination: &str) -> Option<Topic> {
        Topic::ALL
            .into_iter()
            .find(|t| t.destination() == destination)
    }
}

/// Opaque derived data forwarded to observers untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateUpdate {
    pub topic: Topic,
    pub payload: serde_json::Value,
}

/// A decoded push notification.
#[derive(Debug, Clone, PartialEq)]
pub enum PushMessage {
    Movie(Movie),
    Aggregate(AggregateUpdate),
}

impl PushMessage {
    /// Decodes a MESSAGE frame. Other frames and unknown destinations yield `None`.
    pub fn from_frame(frame: &Frame) -> Result<Option<PushMessage>> {
        if frame.command != Command::Message {
            return Ok(None);
        }
        let Some(topic) = frame.destination().and_then(Topic::from_destination) else {
            return Ok(None);
        };
        let message = match topic {
            Topic::Movies => PushMessage::Movie(serde_json::from_str(&frame.body)?),
            aggregate => PushMessage::Aggregate(AggregateUpdate {
                topic: aggregate,
                payload: serde_json::from_str(&frame.body)?,
            }),
        };
        Ok(Some(message))
    }

    /// Surfaces an ERROR frame as an error.
    pub fn check_error(frame: &Frame) -> Result<()> {
        if frame.command == Command::Error {
            let message = frame.get_header("message").unwrap_or("server error");
            return Err(Error::InvalidFrame(format!("{message}: {}", frame.body)));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
