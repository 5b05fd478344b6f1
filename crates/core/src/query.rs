// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Query context for the paginated catalog view.
//!
//! The context drives which remote endpoint shape is used ([`QueryMode`]) and
//! doubles as the local predicate and comparator when the remote is
//! unreachable. Rating and title sorts are mutually exclusive: the setters
//! clear the other direction.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::movie::Movie;

/// Default number of records per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(Error::InvalidSortDirection(s.to_string())),
        }
    }
}

/// Field a sort applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Rating,
    Title,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Rating => "rating",
            SortField::Title => "title",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rating" => Ok(SortField::Rating),
            "title" => Ok(SortField::Title),
            _ => Err(Error::InvalidSortField(s.to_string())),
        }
    }
}

/// Which remote endpoint shape serves the current context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    Plain,
    Filter,
    Sort,
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QueryMode::Plain => "plain",
            QueryMode::Filter => "filter",
            QueryMode::Sort => "sort",
        };
        write!(f, "{}", name)
    }
}

/// Search, filter, sort and paging state of the catalog view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryContext {
    search_text: String,
    selected_categories: BTreeSet<String>,
    min_rating: Option<f64>,
    rating_sort: Option<SortDirection>,
    title_sort: Option<SortDirection>,
    pub page: u32,
    pub page_size: u32,
}

impl Default for QueryContext {
    fn default() -> Self {
        QueryContext::new(DEFAULT_PAGE_SIZE)
    }
}

impl QueryContext {
    /// Creates an empty context (plain mode) starting at page 0.
    pub fn new(page_size: u32) -> Self {
        QueryContext {
            search_text: String::new(),
            selected_categories: BTreeSet::new(),
            min_rating: None,
            rating_sort: None,
            title_sort: None,
            page: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn selected_categories(&self) -> &BTreeSet<String> {
        &self.selected_categories
    }

    pub fn min_rating(&self) -> Option<f64> {
        self.min_rating
    }

    pub fn rating_sort(&self) -> Option<SortDirection> {
        self.rating_sort
    }

    pub fn title_sort(&self) -> Option<SortDirection> {
        self.title_sort
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    pub fn set_categories<I, S>(&mut self, categories: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_categories = categories.into_iter().map(Into::into).collect();
    }

    /// Adds the category if absent, removes it if present.
    pub fn toggle_category(&mut self, category: &str) {
        if !self.selected_categories.remove(category) {
            self.selected_categories.insert(category.to_string());
        }
    }

    pub fn set_min_rating(&mut self, rating: Option<f64>) {
        self.min_rating = rating;
    }

    /// Sets the rating sort. Any title sort is cleared.
    pub fn set_rating_sort(&mut self, direction: Option<SortDirection>) {
        self.rating_sort = direction;
        if direction.is_some() {
            self.title_sort = None;
        }
    }

    /// Sets the title sort. Any rating sort is cleared.
    pub fn set_title_sort(&mut self, direction: Option<SortDirection>) {
        self.title_sort = direction;
        if direction.is_some() {
            self.rating_sort = None;
        }
    }

    /// Returns the active sort, if any.
    pub fn sort(&self) -> Option<(SortField, SortDirection)> {
        match (self.rating_sort, self.title_sort) {
            (Some(dir), _) => Some((SortField::Rating, dir)),
            (None, Some(dir)) => Some((SortField::Title, dir)),
            (None, None) => None,
        }
    }

    /// Returns true if any filter field is set.
    pub fn has_filter(&self) -> bool {
        !self.search_text.trim().is_empty()
            || !self.selected_categories.is_empty()
            || self.min_rating.is_some()
    }

    /// Derives the endpoint shape: filters win over sorts, sorts over plain.
    pub fn mode(&self) -> QueryMode {
        if self.has_filter() {
            QueryMode::Filter
        } else if self.sort().is_some() {
            QueryMode::Sort
        } else {
            QueryMode::Plain
        }
    }

    /// Returns true if the filter-relevant fields of both contexts match.
    ///
    /// Paging fields are ignored; a difference means the accumulated view
    /// must be discarded.
    pub fn same_query(&self, other: &QueryContext) -> bool {
        self.search_text == other.search_text
            && self.selected_categories == other.selected_categories
            && self.min_rating == other.min_rating
            && self.rating_sort == other.rating_sort
            && self.title_sort == other.title_sort
    }

    /// Local equivalent of the remote filter endpoint.
    ///
    /// Title contains the search text (case-insensitive), category is one of
    /// the selected ones, rating is at least the minimum.
    pub fn matches(&self, movie: &Movie) -> bool {
        let search = self.search_text.trim();
        if !search.is_empty() && !movie.title.to_lowercase().contains(&search.to_lowercase()) {
            return false;
        }
        if !self.selected_categories.is_empty() && !self.selected_categories.contains(&movie.category)
        {
            return false;
        }
        if let Some(min) = self.min_rating {
            if movie.rating < min {
                return false;
            }
        }
        true
    }

    /// Local equivalent of the remote sort. `Equal` when no sort is set.
    pub fn compare(&self, a: &Movie, b: &Movie) -> Ordering {
        match self.sort() {
            Some((SortField::Rating, dir)) => dir.apply(a.rating.total_cmp(&b.rating)),
            Some((SortField::Title, dir)) => dir.apply(
                a.title
                    .to_lowercase()
                    .cmp(&b.title.to_lowercase())
                    .then_with(|| a.title.cmp(&b.title)),
            ),
            None => Ordering::Equal,
        }
    }

    /// Evaluates the whole context against a snapshot in one pass.
    ///
    /// Paging fields are ignored; the full result is returned.
    pub fn evaluate(&self, movies: &[Movie]) -> Vec<Movie> {
        let mut result: Vec<Movie> = movies.iter().filter(|m| self.matches(m)).cloned().collect();
        if self.sort().is_some() {
            result.sort_by(|a, b| self.compare(a, b));
        }
        result
    }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
