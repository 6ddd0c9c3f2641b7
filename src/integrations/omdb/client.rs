// src/integrations/omdb/client.rs
//
// Remote movie-metadata API integration
//
// ARCHITECTURE:
// - Keyed REST client for the OMDb-style metadata service
// - Maps wire payloads → domain types (NO domain mutation)
// - Used by CatalogService
//
// CRITICAL RULES:
// - This is INFRASTRUCTURE, not DOMAIN
// - The upstream "True"/"False" status sentinel is translated HERE, once;
//   core logic only ever sees SearchOutcome / AppError
// - Returns domain values that services can use directly

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::domain::{MovieDetail, MovieSummary, Rating, SearchOutcome};
use crate::error::{AppError, AppResult};

/// Media type filter accepted by the search endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Movie,
    Series,
    Episode,
}

impl MediaKind {
    fn as_param(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Series => "series",
            MediaKind::Episode => "episode",
        }
    }
}

/// Remote movie-metadata service interface
///
/// Implementations append the caller-held access credential to every
/// request; consumers never see it.
#[async_trait]
pub trait MovieApi: Send + Sync {
    /// Paged free-text search, optionally narrowed by release year and type
    async fn search(
        &self,
        query: &str,
        page: u32,
        year: Option<&str>,
        kind: Option<MediaKind>,
    ) -> AppResult<SearchOutcome>;

    /// Full record by identifier. Unknown ids are `AppError::NotFound`.
    async fn details(&self, imdb_id: &str) -> AppResult<MovieDetail>;

    /// Resolve a free-text title to its best catalog match, if any
    async fn lookup_by_title(&self, title: &str) -> AppResult<Option<MovieSummary>>;
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct OmdbConfig {
    pub base_url: String,
    pub api_key: String,
}

impl OmdbConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: "https://www.omdbapi.com".to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

// ============================================================================
// Wire payloads (upstream PascalCase field names)
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(rename = "Search")]
    search: Option<Vec<SummaryPayload>>,
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SummaryPayload {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year")]
    year: String,
    #[serde(rename = "Poster")]
    poster: String,
    #[serde(rename = "imdbID")]
    imdb_id: String,
}

#[derive(Debug, Deserialize)]
struct DetailEnvelope {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    #[allow(dead_code)] // Part of the upstream error response schema
    error: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "Rated")]
    rated: Option<String>,
    #[serde(rename = "Released")]
    released: Option<String>,
    #[serde(rename = "Runtime")]
    runtime: Option<String>,
    #[serde(rename = "Genre")]
    genre: Option<String>,
    #[serde(rename = "Director")]
    director: Option<String>,
    #[serde(rename = "Writer")]
    writer: Option<String>,
    #[serde(rename = "Actors")]
    actors: Option<String>,
    #[serde(rename = "Plot")]
    plot: Option<String>,
    #[serde(rename = "Language")]
    language: Option<String>,
    #[serde(rename = "Country")]
    country: Option<String>,
    #[serde(rename = "Awards")]
    awards: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "Ratings", default)]
    ratings: Vec<RatingPayload>,
    #[serde(rename = "Metascore")]
    metascore: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "imdbVotes")]
    imdb_votes: Option<String>,
    #[serde(rename = "Type")]
    kind: Option<String>,
    #[serde(rename = "DVD")]
    dvd: Option<String>,
    #[serde(rename = "BoxOffice")]
    box_office: Option<String>,
    #[serde(rename = "Production")]
    production: Option<String>,
    #[serde(rename = "Website")]
    website: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RatingPayload {
    #[serde(rename = "Source")]
    source: String,
    #[serde(rename = "Value")]
    value: String,
}

const RESPONSE_TRUE: &str = "True";

/// OMDb-style API client
pub struct OmdbClient {
    config: OmdbConfig,
    http_client: Client,
}

impl OmdbClient {
    pub fn new(config: OmdbConfig) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(AppError::Http)?;

        Ok(Self {
            config,
            http_client,
        })
    }

    async fn get_json<T>(&self, query_params: &[(&str, &str)]) -> AppResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = self
            .http_client
            .get(&self.config.base_url)
            .query(&[("apikey", self.config.api_key.as_str())])
            .query(query_params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Api(format!(
                "Metadata API returned status: {}",
                response.status()
            )));
        }

        let payload = response.json::<T>().await?;
        Ok(payload)
    }

    fn map_summary(payload: SummaryPayload) -> MovieSummary {
        MovieSummary {
            imdb_id: payload.imdb_id,
            title: payload.title,
            year: payload.year,
            poster: payload.poster,
            trailer: None,
        }
    }

    fn map_search(envelope: SearchEnvelope) -> SearchOutcome {
        if envelope.response == RESPONSE_TRUE {
            let movies = envelope
                .search
                .unwrap_or_default()
                .into_iter()
                .map(Self::map_summary)
                .collect();
            SearchOutcome::Found(movies)
        } else {
            SearchOutcome::NotFound {
                reason: envelope.error,
            }
        }
    }

    fn map_detail(envelope: DetailEnvelope) -> AppResult<MovieDetail> {
        if envelope.response != RESPONSE_TRUE {
            return Err(AppError::NotFound);
        }

        // A "True" record without its key fields violates the wire contract
        let imdb_id = envelope
            .imdb_id
            .ok_or_else(|| AppError::Api("Detail payload missing imdbID".to_string()))?;
        let title = envelope
            .title
            .ok_or_else(|| AppError::Api("Detail payload missing Title".to_string()))?;

        Ok(MovieDetail {
            imdb_id,
            title,
            year: envelope.year.unwrap_or_default(),
            rated: envelope.rated,
            released: envelope.released,
            runtime: envelope.runtime,
            genre: envelope.genre,
            director: envelope.director,
            writer: envelope.writer,
            actors: envelope.actors,
            plot: envelope.plot,
            language: envelope.language,
            country: envelope.country,
            awards: envelope.awards,
            poster: envelope.poster.unwrap_or_default(),
            ratings: envelope
                .ratings
                .into_iter()
                .map(|r| Rating {
                    source: r.source,
                    value: r.value,
                })
                .collect(),
            metascore: envelope.metascore,
            imdb_rating: envelope.imdb_rating,
            imdb_votes: envelope.imdb_votes,
            kind: envelope.kind.unwrap_or_else(|| "movie".to_string()),
            dvd: envelope.dvd,
            box_office: envelope.box_office,
            production: envelope.production,
            website: envelope.website,
            trailer: None,
        })
    }
}

#[async_trait]
impl MovieApi for OmdbClient {
    async fn search(
        &self,
        query: &str,
        page: u32,
        year: Option<&str>,
        kind: Option<MediaKind>,
    ) -> AppResult<SearchOutcome> {
        let page_param = page.to_string();
        let mut query_params = vec![("s", query), ("page", page_param.as_str())];
        if let Some(year) = year {
            query_params.push(("y", year));
        }
        if let Some(kind) = kind {
            query_params.push(("type", kind.as_param()));
        }

        let envelope: SearchEnvelope = self.get_json(&query_params).await?;
        Ok(Self::map_search(envelope))
    }

    async fn details(&self, imdb_id: &str) -> AppResult<MovieDetail> {
        let envelope: DetailEnvelope = self.get_json(&[("i", imdb_id)]).await?;
        Self::map_detail(envelope)
    }

    async fn lookup_by_title(&self, title: &str) -> AppResult<Option<MovieSummary>> {
        let envelope: SearchEnvelope = self.get_json(&[("s", title), ("page", "1")]).await?;

        match Self::map_search(envelope) {
            SearchOutcome::Found(movies) => Ok(movies.into_iter().next()),
            SearchOutcome::NotFound { .. } => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = OmdbClient::new(OmdbConfig::new("test_key")).unwrap();
        assert_eq!(client.config.base_url, "https://www.omdbapi.com");
    }

    #[test]
    fn test_search_sentinel_translated_to_outcome() {
        let envelope: SearchEnvelope = serde_json::from_str(
            r#"{
                "Search": [
                    {"Title": "Inception", "Year": "2010",
                     "Poster": "http://poster", "imdbID": "tt1375666"}
                ],
                "totalResults": "1",
                "Response": "True"
            }"#,
        )
        .unwrap();

        match OmdbClient::map_search(envelope) {
            SearchOutcome::Found(movies) => {
                assert_eq!(movies.len(), 1);
                assert_eq!(movies[0].imdb_id, "tt1375666");
                assert!(movies[0].trailer.is_none());
            }
            other => panic!("expected Found, got {:?}", other),
        }
    }

    #[test]
    fn test_search_false_sentinel_is_not_found() {
        let envelope: SearchEnvelope = serde_json::from_str(
            r#"{"Response": "False", "Error": "Movie not found!"}"#,
        )
        .unwrap();

        match OmdbClient::map_search(envelope) {
            SearchOutcome::NotFound { reason } => {
                assert_eq!(reason.as_deref(), Some("Movie not found!"));
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_detail_mapping() {
        let envelope: DetailEnvelope = serde_json::from_str(
            r#"{
                "Title": "Inception", "Year": "2010", "Rated": "PG-13",
                "Genre": "Action, Sci-Fi",
                "Ratings": [{"Source": "Internet Movie Database", "Value": "8.8/10"}],
                "imdbRating": "8.8", "imdbID": "tt1375666", "Type": "movie",
                "Poster": "http://poster", "Response": "True"
            }"#,
        )
        .unwrap();

        let detail = OmdbClient::map_detail(envelope).unwrap();
        assert_eq!(detail.imdb_id, "tt1375666");
        assert_eq!(detail.ratings.len(), 1);
        assert_eq!(detail.imdb_rating.as_deref(), Some("8.8"));
    }

    #[test]
    fn test_detail_false_sentinel_is_not_found() {
        let envelope: DetailEnvelope = serde_json::from_str(
            r#"{"Response": "False", "Error": "Incorrect IMDb ID."}"#,
        )
        .unwrap();

        assert!(matches!(
            OmdbClient::map_detail(envelope),
            Err(AppError::NotFound)
        ));
    }
}
