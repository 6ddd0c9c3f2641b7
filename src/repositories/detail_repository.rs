// src/repositories/detail_repository.rs
//
// Full movie record persistence (movie_details table)
//
// The ratings list is stored as a JSON text column.

use std::sync::Arc;

use chrono::Utc;
use rusqlite::{params, Row};

use crate::db::ConnectionPool;
use crate::domain::{MovieDetail, Rating};
use crate::error::{AppError, AppResult};

pub trait DetailRepository: Send + Sync {
    /// Insert-or-replace one record (last write wins)
    fn save(&self, detail: &MovieDetail) -> AppResult<()>;

    fn get(&self, imdb_id: &str) -> AppResult<Option<MovieDetail>>;

    fn count(&self) -> AppResult<i64>;

    /// Delete the N rows with the oldest write timestamps
    fn delete_oldest(&self, limit: i64) -> AppResult<()>;

    /// Best-rated records whose comma-joined genre field contains `genre`,
    /// ordered by numeric rating descending
    fn top_rated_by_genre(&self, genre: &str, limit: u32) -> AppResult<Vec<MovieDetail>>;

    fn top_rated_overall(&self, limit: u32) -> AppResult<Vec<MovieDetail>>;

    /// Most recent releases currently on hand (year descending)
    fn recently_added(&self, limit: u32) -> AppResult<Vec<MovieDetail>>;

    /// Distinct first genre of every stored record
    fn first_genres(&self) -> AppResult<Vec<String>>;

    fn trailer_url(&self, imdb_id: &str) -> AppResult<Option<String>>;

    fn set_trailer_url(&self, imdb_id: &str, trailer_url: &str) -> AppResult<()>;
}

pub struct SqliteDetailRepository {
    pool: Arc<ConnectionPool>,
}

const DETAIL_COLUMNS: &str = "imdb_id, title, year, rated, released, runtime, genre, director, \
     writer, actors, plot, language, country, awards, poster, ratings, metascore, imdb_rating, \
     imdb_votes, kind, dvd, box_office, production, website, trailer";

impl SqliteDetailRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_detail(row: &Row) -> Result<MovieDetail, rusqlite::Error> {
        let ratings_json: String = row.get("ratings")?;
        let ratings: Vec<Rating> = serde_json::from_str(&ratings_json)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        Ok(MovieDetail {
            imdb_id: row.get("imdb_id")?,
            title: row.get("title")?,
            year: row.get("year")?,
            rated: row.get("rated")?,
            released: row.get("released")?,
            runtime: row.get("runtime")?,
            genre: row.get("genre")?,
            director: row.get("director")?,
            writer: row.get("writer")?,
            actors: row.get("actors")?,
            plot: row.get("plot")?,
            language: row.get("language")?,
            country: row.get("country")?,
            awards: row.get("awards")?,
            poster: row.get("poster")?,
            ratings,
            metascore: row.get("metascore")?,
            imdb_rating: row.get("imdb_rating")?,
            imdb_votes: row.get("imdb_votes")?,
            kind: row.get("kind")?,
            dvd: row.get("dvd")?,
            box_office: row.get("box_office")?,
            production: row.get("production")?,
            website: row.get("website")?,
            trailer: row.get("trailer")?,
        })
    }

    fn query_details(&self, sql: &str, query_params: impl rusqlite::Params) -> AppResult<Vec<MovieDetail>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(sql)?;
        let details: Vec<MovieDetail> = stmt
            .query_map(query_params, Self::row_to_detail)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(details)
    }
}

impl DetailRepository for SqliteDetailRepository {
    fn save(&self, detail: &MovieDetail) -> AppResult<()> {
        let conn = self.pool.get()?;

        let ratings_json = serde_json::to_string(&detail.ratings)?;
        let now = Utc::now().timestamp_millis();

        conn.execute(
            "INSERT OR REPLACE INTO movie_details (
                imdb_id, title, year, rated, released, runtime, genre, director,
                writer, actors, plot, language, country, awards, poster, ratings,
                metascore, imdb_rating, imdb_votes, kind, dvd, box_office,
                production, website, trailer, timestamp
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                      ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26)",
            params![
                detail.imdb_id,
                detail.title,
                detail.year,
                detail.rated,
                detail.released,
                detail.runtime,
                detail.genre,
                detail.director,
                detail.writer,
                detail.actors,
                detail.plot,
                detail.language,
                detail.country,
                detail.awards,
                detail.poster,
                ratings_json,
                detail.metascore,
                detail.imdb_rating,
                detail.imdb_votes,
                detail.kind,
                detail.dvd,
                detail.box_office,
                detail.production,
                detail.website,
                detail.trailer,
                now,
            ],
        )?;

        Ok(())
    }

    fn get(&self, imdb_id: &str) -> AppResult<Option<MovieDetail>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM movie_details WHERE imdb_id = ?1",
            DETAIL_COLUMNS
        ))?;

        match stmt.query_row(params![imdb_id], Self::row_to_detail) {
            Ok(detail) => Ok(Some(detail)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn count(&self) -> AppResult<i64> {
        let conn = self.pool.get()?;

        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM movie_details", [], |row| row.get(0))?;

        Ok(count)
    }

    fn delete_oldest(&self, limit: i64) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "DELETE FROM movie_details WHERE imdb_id IN
                (SELECT imdb_id FROM movie_details ORDER BY timestamp ASC LIMIT ?1)",
            params![limit],
        )?;

        Ok(())
    }

    fn top_rated_by_genre(&self, genre: &str, limit: u32) -> AppResult<Vec<MovieDetail>> {
        self.query_details(
            &format!(
                "SELECT {} FROM movie_details
                 WHERE genre LIKE '%' || ?1 || '%'
                 AND imdb_rating IS NOT NULL
                 ORDER BY CAST(imdb_rating AS REAL) DESC
                 LIMIT ?2",
                DETAIL_COLUMNS
            ),
            params![genre, limit],
        )
    }

    fn top_rated_overall(&self, limit: u32) -> AppResult<Vec<MovieDetail>> {
        self.query_details(
            &format!(
                "SELECT {} FROM movie_details
                 WHERE imdb_rating IS NOT NULL
                 ORDER BY CAST(imdb_rating AS REAL) DESC
                 LIMIT ?1",
                DETAIL_COLUMNS
            ),
            params![limit],
        )
    }

    fn recently_added(&self, limit: u32) -> AppResult<Vec<MovieDetail>> {
        self.query_details(
            &format!(
                "SELECT {} FROM movie_details ORDER BY year DESC LIMIT ?1",
                DETAIL_COLUMNS
            ),
            params![limit],
        )
    }

    fn first_genres(&self) -> AppResult<Vec<String>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT DISTINCT substr(trim(genre), 1, instr(trim(genre) || ',', ',') - 1) AS genre
             FROM movie_details
             WHERE genre IS NOT NULL AND genre != ''",
        )?;

        let genres: Vec<String> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(genres)
    }

    fn trailer_url(&self, imdb_id: &str) -> AppResult<Option<String>> {
        let conn = self.pool.get()?;

        match conn.query_row(
            "SELECT trailer FROM movie_details WHERE imdb_id = ?1",
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
            "UPDATE movie_details SET trailer = ?2 WHERE imdb_id = ?1",
            params![imdb_id, trailer_url],
        )?;

        Ok(())
    }
}
