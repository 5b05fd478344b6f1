// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared argument structs for CLI commands.

use clap::Args;
use cs_core::{QueryContext, SortDirection};

/// Query context arguments.
#[derive(Args, Clone, Debug, Default)]
pub struct QueryArgs {
    /// Search titles (case-insensitive substring)
    #[arg(long, short)]
    pub search: Option<String>,

    /// Restrict to a category (repeat for OR)
    #[arg(long, short)]
    pub category: Vec<String>,

    /// Minimum rating, inclusive
    #[arg(long, value_name = "rating")]
    pub min_rating: Option<f64>,

    /// Sort by rating
    #[arg(long, value_name = "asc|desc", value_parser = parse_direction, conflicts_with = "sort_title")]
    pub sort_rating: Option<SortDirection>,

    /// Sort by title
    #[arg(long, value_name = "asc|desc", value_parser = parse_direction)]
    pub sort_title: Option<SortDirection>,
}

impl QueryArgs {
    /// Write these arguments into a query context.
    pub fn apply(&self, query: &mut QueryContext) {
        query.set_search_text(self.search.clone().unwrap_or_default());
        query.set_categories(self.category.iter());
        query.set_min_rating(self.min_rating);
        query.set_rating_sort(self.sort_rating);
        query.set_title_sort(self.sort_title);
    }
}

/// Movie fields. All are required for `add`; `update` keeps unset fields.
#[derive(Args, Clone, Debug, Default)]
pub struct MovieArgs {
    #[arg(long, short)]
    pub title: Option<String>,

    /// Rating between 1 and 5
    #[arg(long, short)]
    pub rating: Option<f64>,

    #[arg(long, short)]
    pub description: Option<String>,

    #[arg(long, short)]
    pub category: Option<String>,
}

impl MovieArgs {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.rating.is_none()
            && self.description.is_none()
            && self.category.is_none()
    }
}

fn parse_direction(s: &str) -> Result<SortDirection, String> {
    s.parse::<SortDirection>().map_err(|e| e.to_string())
}
