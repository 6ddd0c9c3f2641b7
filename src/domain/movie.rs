// src/domain/movie.rs
use serde::{Deserialize, Serialize};

/// Upstream placeholder for fields the catalog has no data for
pub const FIELD_PLACEHOLDER: &str = "N/A";

/// A movie as it appears in search result lists
///
/// Produced by search; immutable once fetched except for trailer-URL
/// enrichment, which is applied by re-persisting the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieSummary {
    /// External catalog identifier (IMDb id), globally unique
    pub imdb_id: String,

    pub title: String,

    /// Release year as reported upstream ("2010", "2012–2014")
    pub year: String,

    /// Poster image reference
    pub poster: String,

    /// Resolved trailer URL, if one has been found
    pub trailer: Option<String>,
}

impl MovieSummary {
    /// Data-quality gate applied at every list write path: entries with a
    /// missing or placeholder title, year, or poster never reach the cache
    /// or the persisted store.
    pub fn is_listable(&self) -> bool {
        !self.title.is_empty()
            && self.title != FIELD_PLACEHOLDER
            && !self.year.is_empty()
            && self.year != FIELD_PLACEHOLDER
            && !self.poster.is_empty()
            && self.poster != FIELD_PLACEHOLDER
    }
}

/// A single {source, value} rating pair ("Internet Movie Database" / "8.8/10")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub source: String,
    pub value: String,
}

/// Full movie record
///
/// One record per identifier; idempotently replaceable by re-fetch
/// (last write wins).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub imdb_id: String,
    pub title: String,
    pub year: String,
    pub rated: Option<String>,
    pub released: Option<String>,
    pub runtime: Option<String>,

    /// Comma-joined genre list as reported upstream ("Action, Sci-Fi")
    pub genre: Option<String>,

    pub director: Option<String>,
    pub writer: Option<String>,
    pub actors: Option<String>,
    pub plot: Option<String>,
    pub language: Option<String>,
    pub country: Option<String>,
    pub awards: Option<String>,
    pub poster: String,
    pub ratings: Vec<Rating>,
    pub metascore: Option<String>,

    /// Aggregate score as a decimal string ("8.8"); kept textual because
    /// upstream also sends "N/A"
    pub imdb_rating: Option<String>,

    pub imdb_votes: Option<String>,

    /// Media type ("movie", "series", "episode")
    pub kind: String,

    /// Physical release date
    pub dvd: Option<String>,

    pub box_office: Option<String>,
    pub production: Option<String>,
    pub website: Option<String>,

    /// Resolved trailer URL, if one has been found
    pub trailer: Option<String>,
}

/// Engagement tracking: how often a movie's detail view was opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionRecord {
    pub imdb_id: String,
    pub open_count: i64,
    /// Millisecond timestamp of the most recent open
    pub last_opened: i64,
}
