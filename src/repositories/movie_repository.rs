// src/repositories/movie_repository.rs
//
// Search-result persistence (movies table)

use std::sync::Arc;

use chrono::Utc;
use rusqlite::{params, Row};

use crate::db::ConnectionPool;
use crate::domain::MovieSummary;
use crate::error::{AppError, AppResult};

pub trait MovieRepository: Send + Sync {
    /// Insert-or-replace a batch of summaries, tagged with the search query
    /// that produced them. One row per imdb id; the last query wins as the
    /// row's tag.
    fn save_all(&self, movies: &[MovieSummary], search_query: &str) -> AppResult<()>;

    /// Page of rows for a query tag, in insertion order
    fn list_by_query_paginated(
        &self,
        search_query: &str,
        limit: u32,
        offset: u32,
    ) -> AppResult<Vec<MovieSummary>>;

    fn count(&self) -> AppResult<i64>;

    /// Delete the N rows with the oldest write timestamps
    fn delete_oldest(&self, limit: i64) -> AppResult<()>;

    fn trailer_url(&self, imdb_id: &str) -> AppResult<Option<String>>;

    fn set_trailer_url(&self, imdb_id: &str, trailer_url: &str) -> AppResult<()>;
}

pub struct SqliteMovieRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteMovieRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_summary(row: &Row) -> Result<MovieSummary, rusqlite::Error> {
        Ok(MovieSummary {
            imdb_id: row.get("imdb_id")?,
            title: row.get("title")?,
            year: row.get("year")?,
            poster: row.get("poster")?,
            trailer: row.get("trailer")?,
        })
    }
}

impl MovieRepository for SqliteMovieRepository {
    fn save_all(&self, movies: &[MovieSummary], search_query: &str) -> AppResult<()> {
        let mut conn = self.pool.get()?;
        let now = Utc::now().timestamp_millis();

        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO movies
                    (imdb_id, search_query, title, year, poster, timestamp, trailer)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;

            for movie in movies {
                stmt.execute(params![
                    movie.imdb_id,
                    search_query,
                    movie.title,
                    movie.year,
                    movie.poster,
                    now,
                    movie.trailer,
                ])?;
            }
        }
        tx.commit()?;

        Ok(())
    }

    fn list_by_query_paginated(
        &self,
        search_query: &str,
        limit: u32,
        offset: u32,
    ) -> AppResult<Vec<MovieSummary>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT imdb_id, title, year, poster, trailer
             FROM movies
             WHERE search_query = ?1
             ORDER BY timestamp ASC, imdb_id ASC
             LIMIT ?2 OFFSET ?3",
        )?;

        let movies: Vec<MovieSummary> = stmt
            .query_map(params![search_query, limit, offset], Self::row_to_summary)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(movies)
    }

    fn count(&self) -> AppResult<i64> {
        let conn = self.pool.get()?;

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM movies", [], |row| row.get(0))?;

        Ok(count)
    }

    fn delete_oldest(&self, limit: i64) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "DELETE FROM movies WHERE imdb_id IN
                (SELECT imdb_id FROM movies ORDER BY timestamp ASC LIMIT ?1)",
            params![limit],
        )?;

        Ok(())
    }

    fn trailer_url(&self, imdb_id: &str) -> AppResult<Option<String>> {
        let conn = self.pool.get()?;

        match conn.query_row(
            "SELECT trailer FROM movies WHERE imdb_id = ?1",
            params![imdb_id],
            |row| row.get::<_, Option<String>>(0),
        ) {
            Ok(trailer) => Ok(trailer),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn set_trailer_url(&self, imdb_id: &str, trailer_url: &str) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "UPDATE movies SET trailer = ?2 WHERE imdb_id = ?1",
            params![imdb_id, trailer_url],
        )?;

        Ok(())
    }
}
