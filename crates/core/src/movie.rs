// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The catalog entity.
//!
//! Ids are assigned by the remote. Negative ids are reserved for records
//! minted locally while the remote could not confirm them.

use serde::{Deserialize, Serialize};

/// Lowest rating the catalog accepts.
pub const MIN_RATING: f64 = 1.0;
/// Highest rating the catalog accepts.
pub const MAX_RATING: f64 = 5.0;
/// Maximum title length accepted by the remote.
pub const MAX_TITLE_LEN: usize = 100;
/// Maximum description length accepted by the remote.
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// A movie as cached locally and exchanged with the remote.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub rating: f64,
    pub description: String,
    pub category: String,
}

/// Request body for create/replace calls: the entity without its id.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MovieBody<'a> {
    pub title: &'a str,
    pub rating: f64,
    pub description: &'a str,
    pub category: &'a str,
}

impl Movie {
    /// Creates a movie with the given fields.
    pub fn new(
        id: i64,
        title: impl Into<String>,
        rating: f64,
        description: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Movie {
            id,
            title: title.into(),
            rating,
            description: description.into(),
            category: category.into(),
        }
    }

    /// Returns true if this record was minted locally and never confirmed.
    pub fn is_local(&self) -> bool {
        self.id < 0
    }

    /// Returns a copy of this movie carrying a different id.
    pub fn with_id(&self, id: i64) -> Self {
        Movie {
            id,
            ..self.clone()
        }
    }

    /// Borrows the id-less request body.
    pub fn body(&self) -> MovieBody<'_> {
        MovieBody {
            title: &self.title,
            rating: self.rating,
            description: &self.description,
            category: &self.category,
        }
    }

    /// Checks the field rules the remote enforces on create and update.
    ///
    /// Returns one message per violated field, empty when valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let title = self.title.trim();
        if title.is_empty() {
            errors.push("title is required".to_string());
        } else if self.title.chars().count() > MAX_TITLE_LEN {
            errors.push(format!("title must not exceed {MAX_TITLE_LEN} characters"));
        }

        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            errors.push(format!(
                "rating must be between {MIN_RATING} and {MAX_RATING}"
            ));
        }

        let description = self.description.trim();
        if description.is_empty() {
            errors.push("description is required".to_string());
        } else if self.description.chars().count() > MAX_DESCRIPTION_LEN {
            errors.push(format!(
                "description must not exceed {MAX_DESCRIPTION_LEN} characters"
            ));
        }

        if self.category.trim().is_empty() {
            errors.push("category is required".to_string());
        }

        errors
    }
}

#[cfg(test)]
#[path = "movie_tests.rs"]
mod tests;
