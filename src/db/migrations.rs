// src/db/migrations.rs
//
// Database schema initialization and migrations
//
// PRINCIPLES:
// - Explicit schema versions
// - Additive migrations only (adding columns/tables with defaults)
// - Idempotent operations
// - No data loss across upgrades

use crate::error::{AppError, AppResult};
use rusqlite::Connection;

/// Current schema version
/// Increment this when adding migrations
const CURRENT_SCHEMA_VERSION: i32 = 4;

/// Initialize the database schema
///
/// This function:
/// 1. Checks current schema version
/// 2. Applies pending migrations in order
/// 3. Updates version tracking
///
/// Safe to call multiple times (idempotent).
pub fn initialize_database(conn: &Connection) -> AppResult<()> {
    let mut current_version = get_schema_version(conn)?;

    if current_version > CURRENT_SCHEMA_VERSION {
        return Err(AppError::Other(format!(
            "Schema version {} is newer than supported {}. Update the application.",
            current_version, CURRENT_SCHEMA_VERSION
        )));
    }

    if current_version == 0 {
        // Fresh database - apply initial schema
        apply_initial_schema(conn)?;
        set_schema_version(conn, 1)?;
        current_version = 1;
    }

    while current_version < CURRENT_SCHEMA_VERSION {
        let next = current_version + 1;
        apply_migration(conn, next)?;
        set_schema_version(conn, next)?;
        current_version = next;
    }

    Ok(())
}

/// Get current schema version
/// Returns 0 if schema_version table doesn't exist (fresh database)
pub fn get_schema_version(conn: &Connection) -> AppResult<i32> {
    let table_exists: bool = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )
        .map_err(AppError::Database)?;

    if !table_exists {
        return Ok(0);
    }

    let version: Option<i32> = conn
        .query_row("SELECT MAX(version) FROM schema_version", [], |row| {
            row.get(0)
        })
        .map_err(AppError::Database)?;

    Ok(version.unwrap_or(0))
}

/// Set schema version
fn set_schema_version(conn: &Connection, version: i32) -> AppResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (?1, datetime('now'))",
        [version],
    )
    .map_err(AppError::Database)?;

    Ok(())
}

/// Apply initial schema (version 1)
fn apply_initial_schema(conn: &Connection) -> AppResult<()> {
    let schema = include_str!("../../schema.sql");

    conn.execute_batch(schema)
        .map_err(|e| AppError::Other(format!("Failed to apply initial schema: {}", e)))?;

    Ok(())
}

/// Apply a single incremental migration
///
/// Migrations mirror the app's release history and are strictly additive:
/// existing rows must survive every step.
fn apply_migration(conn: &Connection, version: i32) -> AppResult<()> {
    match version {
        // Write timestamps, used as the insertion-order surrogate for pruning.
        // ALTER TABLE only accepts constant defaults, so backfill separately.
        2 => conn.execute_batch(
            "ALTER TABLE movies ADD COLUMN timestamp INTEGER NOT NULL DEFAULT 0;
             ALTER TABLE movie_details ADD COLUMN timestamp INTEGER NOT NULL DEFAULT 0;
             UPDATE movies SET timestamp = CAST(strftime('%s','now') AS INTEGER) * 1000;
             UPDATE movie_details SET timestamp = CAST(strftime('%s','now') AS INTEGER) * 1000;",
        ),
        // Resolved trailer URLs (write-back cache)
        3 => conn.execute_batch(
            "ALTER TABLE movies ADD COLUMN trailer TEXT;
             ALTER TABLE movie_details ADD COLUMN trailer TEXT;",
        ),
        // Engagement tracking
        4 => conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS movie_interactions (
                imdb_id     TEXT NOT NULL,
                open_count  INTEGER NOT NULL,
                last_opened INTEGER NOT NULL,
                PRIMARY KEY (imdb_id)
            );",
        ),
        other => {
            return Err(AppError::Other(format!(
                "No migration defined for schema version {}",
                other
            )))
        }
    }
    .map_err(|e| AppError::Other(format!("Migration to version {} failed: {}", version, e)))?;

    Ok(())
}

/// Verify database integrity
///
/// Runs SQLite's integrity check.
pub fn verify_database_integrity(conn: &Connection) -> AppResult<()> {
    let result: String = conn
        .query_row("PRAGMA integrity_check", [], |row| row.get(0))
        .map_err(AppError::Database)?;

    if result != "ok" {
        return Err(AppError::Other(format!(
            "Database integrity check failed: {}",
            result
        )));
    }

    Ok(())
}

/// Get database statistics
///
/// Returns useful info for debugging and monitoring
pub fn get_database_stats(conn: &Connection) -> AppResult<DatabaseStats> {
    let page_count: i64 = conn
        .query_row("PRAGMA page_count", [], |row| row.get(0))
        .map_err(AppError::Database)?;

    let page_size: i64 = conn
        .query_row("PRAGMA page_size", [], |row| row.get(0))
        .map_err(AppError::Database)?;

    let size_bytes = page_count * page_size;

    let movie_count: i64 = conn
        .query_row("SELECT COUNT(*) FROM movies", [], |row| row.get(0))
        .unwrap_or(0);

    let detail_count: i64 = conn
        .query_row("SELECT COUNT(*) FROM movie_details", [], |row| row.get(0))
        .unwrap_or(0);

    let interaction_count: i64 = conn
        .query_row("SELECT COUNT(*) FROM movie_interactions", [], |row| {
            row.get(0)
        })
        .unwrap_or(0);

    Ok(DatabaseStats {
        size_bytes,
        page_count,
        page_size,
        movie_count,
        detail_count,
        interaction_count,
    })
}

/// Database statistics
#[derive(Debug)]
pub struct DatabaseStats {
    pub size_bytes: i64,
    pub page_count: i64,
    pub page_size: i64,
    pub movie_count: i64,
    pub detail_count: i64,
    pub interaction_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::create_test_connection;

    #[test]
    fn test_initialize_fresh_database() {
        let conn = create_test_connection().unwrap();

        let version = get_schema_version(&conn).unwrap();
        assert_eq!(version, 0);

        initialize_database(&conn).unwrap();

        let version = get_schema_version(&conn).unwrap();
        assert_eq!(version, CURRENT_SCHEMA_VERSION);

        // All tables exist, including the v4 interactions table
        let table_count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table'
                 AND name IN ('movies', 'movie_details', 'movie_interactions', 'schema_version')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(table_count, 4);
    }

    #[test]
    fn test_initialize_idempotent() {
        let conn = create_test_connection().unwrap();

        initialize_database(&conn).unwrap();
        initialize_database(&conn).unwrap();

        let version = get_schema_version(&conn).unwrap();
        assert_eq!(version, CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn test_upgrade_from_v1_preserves_rows() {
        let conn = create_test_connection().unwrap();

        // Simulate a database created by the very first release
        conn.execute_batch(include_str!("../../schema.sql")).unwrap();
        conn.execute(
            "INSERT INTO schema_version (version, applied_at) VALUES (1, datetime('now'))",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO movies (imdb_id, search_query, title, year, poster)
             VALUES ('tt1375666', 'inception', 'Inception', '2010', 'http://poster')",
            [],
        )
        .unwrap();

        initialize_database(&conn).unwrap();

        // Row survived and gained the new columns with usable defaults
        let (title, timestamp, trailer): (String, i64, Option<String>) = conn
            .query_row(
                "SELECT title, timestamp, trailer FROM movies WHERE imdb_id = 'tt1375666'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();
        assert_eq!(title, "Inception");
        assert!(timestamp > 0);
        assert!(trailer.is_none());

        assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn test_newer_schema_rejected() {
        let conn = create_test_connection().unwrap();
        initialize_database(&conn).unwrap();

        conn.execute(
            "INSERT INTO schema_version (version, applied_at) VALUES (99, datetime('now'))",
            [],
        )
        .unwrap();

        assert!(initialize_database(&conn).is_err());
    }

    #[test]
    fn test_database_stats() {
        let conn = create_test_connection().unwrap();
        initialize_database(&conn).unwrap();

        let stats = get_database_stats(&conn).unwrap();

        assert!(stats.size_bytes > 0);
        assert_eq!(stats.movie_count, 0);
        assert_eq!(stats.detail_count, 0);
        assert_eq!(stats.interaction_count, 0);
    }

    #[test]
    fn test_integrity_check() {
        let conn = create_test_connection().unwrap();
        initialize_database(&conn).unwrap();

        verify_database_integrity(&conn).unwrap();
    }
}
