// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed local mirror of the catalog.
//!
//! The [`LocalCache`] is the only source of truth while the remote is
//! unreachable. Every write runs in a single statement or transaction, so a
//! read never observes a partially applied write.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::Result;
use crate::movie::Movie;

/// SQL schema for the cache database.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS movies (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    rating REAL NOT NULL,
    description TEXT NOT NULL,
    category TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_movies_category ON movies(category);
"#;

const SELECT_MOVIE: &str = "SELECT id, title, rating, description, category FROM movies";

fn movie_from_row(row: &Row<'_>) -> std::result::Result<Movie, rusqlite::Error> {
    Ok(Movie {
        id: row.get(0)?,
        title: row.get(1)?,
        rating: row.get(2)?,
        description: row.get(3)?,
        category: row.get(4)?,
    })
}

/// Durable id → movie mapping.
pub struct LocalCache {
    conn: Connection,
}

impl LocalCache {
    /// Open the cache at the given path, creating it if needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        conn.execute_batch(SCHEMA)?;
        Ok(LocalCache { conn })
    }

    /// Open an in-memory cache (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(LocalCache { conn })
    }

    /// Overwrite the whole snapshot.
    pub fn replace_all(&mut self, movies: &[Movie]) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM movies", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO movies (id, title, rating, description, category)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for movie in movies {
                stmt.execute(params![
                    movie.id,
                    movie.title,
                    movie.rating,
                    movie.description,
                    movie.category
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Insert or replace a movie by id.
    pub fn upsert(&self, movie: &Movie) -> Result<()> {
        self.conn.execute(
            "INSERT INTO movies (id, title, rating, description, category)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                rating = excluded.rating,
                description = excluded.description,
                category = excluded.category",
            params![
                movie.id,
                movie.title,
                movie.rating,
                movie.description,
                movie.category
            ],
        )?;
        Ok(())
    }

    /// Upsert many movies in one transaction.
    pub fn upsert_all(&mut self, movies: &[Movie]) -> Result<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO movies (id, title, rating, description, category)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for movie in movies {
                stmt.execute(params![
                    movie.id,
                    movie.title,
                    movie.rating,
                    movie.description,
                    movie.category
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Remove a movie. Returns true if a record was removed.
    pub fn remove(&self, id: i64) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM movies WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    /// Get one movie by id.
    pub fn get(&self, id: i64) -> Result<Option<Movie>> {
        let movie = self
            .conn
            .query_row(
                &format!("{SELECT_MOVIE} WHERE id = ?1"),
                params![id],
                movie_from_row,
            )
            .optional()?;
        Ok(movie)
    }

    /// All movies, ordered by id.
    pub fn read_all(&self) -> Result<Vec<Movie>> {
        let mut stmt = self.conn.prepare(&format!("{SELECT_MOVIE} ORDER BY id"))?;
        let movies = stmt
            .query_map([], movie_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(movies)
    }

    /// Movies matching the predicate, ordered by id.
    pub fn read_filtered<F>(&self, predicate: F) -> Result<Vec<Movie>>
    where
        F: Fn(&Movie) -> bool,
    {
        let mut movies = self.read_all()?;
        movies.retain(|m| predicate(m));
        Ok(movies)
    }

    /// All movies ordered by the comparator (stable on id order).
    pub fn read_sorted<F>(&self, comparator: F) -> Result<Vec<Movie>>
    where
        F: Fn(&Movie, &Movie) -> Ordering,
    {
        let mut movies = self.read_all()?;
        movies.sort_by(|a, b| comparator(a, b));
        Ok(movies)
    }

    /// Number of cached movies.
    pub fn len(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM movies", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Returns true if the cache holds no movies.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Distinct categories in the cache.
    pub fn categories(&self) -> Result<BTreeSet<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT category FROM movies ORDER BY category")?;
        let categories = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<BTreeSet<String>, _>>()?;
        Ok(categories)
    }

    /// The next unused locally minted id: one below the lowest id, never above -1.
    pub fn next_local_id(&self) -> Result<i64> {
        let min: Option<i64> = self
            .conn
            .query_row("SELECT MIN(id) FROM movies", [], |row| row.get(0))?;
        Ok(min.unwrap_or(0).min(0) - 1)
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
