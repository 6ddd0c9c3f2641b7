// src/repositories/interaction_repository.rs
//
// Engagement tracking (movie_interactions table)

use std::sync::Arc;

use chrono::Utc;
use rusqlite::params;

use crate::db::ConnectionPool;
use crate::domain::InteractionRecord;
use crate::error::{AppError, AppResult};

pub trait InteractionRepository: Send + Sync {
    fn get(&self, imdb_id: &str) -> AppResult<Option<InteractionRecord>>;

    /// Read-modify-write: absence means first open (count starts at 1)
    fn increment_open_count(&self, imdb_id: &str) -> AppResult<()>;
}

pub struct SqliteInteractionRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteInteractionRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

impl InteractionRepository for SqliteInteractionRepository {
    fn get(&self, imdb_id: &str) -> AppResult<Option<InteractionRecord>> {
        let conn = self.pool.get()?;

        match conn.query_row(
            "SELECT imdb_id, open_count, last_opened
             FROM movie_interactions WHERE imdb_id = ?1",
            params![imdb_id],
            |row| {
                Ok(InteractionRecord {
                    imdb_id: row.get(0)?,
                    open_count: row.get(1)?,
                    last_opened: row.get(2)?,
                })
            },
        ) {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn increment_open_count(&self, imdb_id: &str) -> AppResult<()> {
        let mut conn = self.pool.get()?;
        let now = Utc::now().timestamp_millis();

        let tx = conn.transaction()?;

        let current: Option<i64> = match tx.query_row(
            "SELECT open_count FROM movie_interactions WHERE imdb_id = ?1",
            params![imdb_id],
            |row| row.get(0),
        ) {
            Ok(count) => Some(count),
            Err(rusqlite::Error::QueryReturnedNoRows) => None,
            Err(e) => return Err(AppError::Database(e)),
        };

        tx.execute(
            "INSERT OR REPLACE INTO movie_interactions (imdb_id, open_count, last_opened)
             VALUES (?1, ?2, ?3)",
            params![imdb_id, current.unwrap_or(0) + 1, now],
        )?;

        tx.commit()?;

        Ok(())
    }
}
