// src/domain/search.rs
use crate::domain::movie::MovieSummary;

/// Composite key for one cached page of search results
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageKey {
    pub query: String,
    pub page: u32,
}

impl PageKey {
    pub fn new(query: impl Into<String>, page: u32) -> Self {
        Self {
            query: query.into(),
            page,
        }
    }
}

/// What the remote search endpoint answered, translated once at the adapter
/// boundary: upstream signals success with the string sentinel `"True"`,
/// which never leaks past the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(Vec<MovieSummary>),
    NotFound {
        /// Upstream explanation ("Movie not found!"), when present
        reason: Option<String>,
    },
}

/// One page of search results as served to consumers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPage {
    pub movies: Vec<MovieSummary>,
    /// Upstream explanation when the page came back empty
    pub message: Option<String>,
}

impl SearchPage {
    pub fn with_movies(movies: Vec<MovieSummary>) -> Self {
        Self {
            movies,
            message: None,
        }
    }

    pub fn empty(message: Option<String>) -> Self {
        Self {
            movies: Vec::new(),
            message,
        }
    }

    /// An empty page marks the end of results for its query
    pub fn is_exhausted(&self) -> bool {
        self.movies.is_empty()
    }
}
