// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The in-memory list a host renders, and the categories seen so far.

use std::collections::BTreeSet;

use cs_core::Movie;

#[derive(Debug, Clone, Default)]
pub struct LiveView {
    items: Vec<Movie>,
    categories: BTreeSet<String>,
}

impl LiveView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Movie] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn categories(&self) -> &BTreeSet<String> {
        &self.categories
    }

    pub fn position(&self, id: i64) -> Option<usize> {
        self.items.iter().position(|m| m.id == id)
    }

    /// Discard the accumulated list and start over with `items`.
    ///
    /// Later duplicates of an id are dropped.
    pub fn replace(&mut self, items: Vec<Movie>) {
        self.items.clear();
        self.append(items);
    }

    /// Append a page to the accumulated list.
    ///
    /// An id already in the list (prepended by a push or a submit) is
    /// replaced in place instead of appearing twice.
    pub fn append(&mut self, items: Vec<Movie>) {
        self.note_categories(&items);
        for movie in items {
            match self.position(movie.id) {
                Some(idx) => self.items[idx] = movie,
                None => self.items.push(movie),
            }
        }
    }

    /// Replace the entry with the same id, keeping its position.
    ///
    /// Returns false if no entry has that id.
    pub fn replace_in_place(&mut self, movie: Movie) -> bool {
        match self.position(movie.id) {
            Some(idx) => {
                self.categories.insert(movie.category.clone());
                self.items[idx] = movie;
                true
            }
            None => false,
        }
    }

    /// Insert at the front.
    pub fn prepend(&mut self, movie: Movie) {
        self.categories.insert(movie.category.clone());
        self.items.insert(0, movie);
    }

    pub fn remove(&mut self, id: i64) -> bool {
        match self.position(id) {
            Some(idx) => {
                self.items.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Add categories without touching the list.
    pub fn note_categories<'a, I>(&mut self, movies: I)
    where
        I: IntoIterator<Item = &'a Movie>,
    {
        for movie in movies {
            if !self.categories.contains(&movie.category) {
                self.categories.insert(movie.category.clone());
            }
        }
    }

    pub fn extend_categories(&mut self, categories: impl IntoIterator<Item = String>) {
        self.categories.extend(categories);
    }
}
