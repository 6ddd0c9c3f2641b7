// src/services/suggestion_service.rs
//
// AI suggestion pipeline
//
// Derives a watched list from the best-rated stored movies, asks the
// recommendation service for similar titles, and resolves every suggestion
// back into a concrete catalog record through the normal three-tier detail
// path.
//
// The whole batch runs under one timeout and each validation under its own;
// both convert elapsed time into absence. The result is always a
// best-effort partial list, never an error.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::MovieDetail;
use crate::integrations::{
    MovieApi, MovieValidator, RecommendationService, SuggestionCandidate, SuggestionRequest,
};
use crate::services::catalog_service::CatalogService;

/// Budget for one whole recommendation batch
pub const BATCH_TIMEOUT: Duration = Duration::from_secs(25);

/// Budget for resolving a single suggested title
pub const VALIDATOR_TIMEOUT: Duration = Duration::from_secs(8);

/// Watched movies described to the recommender
pub const WATCHED_LIST_LIMIT: u32 = 20;

/// Resolves free-text titles against the remote catalog.
///
/// Every failure mode (lookup error, empty result, per-item timeout) is
/// absence. The timeout is local to one validation; siblings running in the
/// same batch keep going.
pub struct CatalogValidator {
    api: Arc<dyn MovieApi>,
    timeout: Duration,
}

impl CatalogValidator {
    pub fn new(api: Arc<dyn MovieApi>) -> Self {
        Self {
            api,
            timeout: VALIDATOR_TIMEOUT,
        }
    }
}

#[async_trait]
impl MovieValidator for CatalogValidator {
    async fn validate(&self, title: String) -> Option<SuggestionCandidate> {
        match tokio::time::timeout(self.timeout, self.api.lookup_by_title(&title)).await {
            Ok(Ok(Some(movie))) => Some(SuggestionCandidate {
                title: movie.title,
                year: Some(movie.year),
                imdb_id: Some(movie.imdb_id),
            }),
            Ok(Ok(None)) => None,
            Ok(Err(e)) => {
                log::debug!("Validation lookup failed for '{}': {}", title, e);
                None
            }
            Err(_) => {
                log::debug!("Validation timed out for '{}'", title);
                None
            }
        }
    }
}

pub struct SuggestionService {
    catalog: Arc<CatalogService>,
    recommender: Arc<dyn RecommendationService>,
}

impl SuggestionService {
    pub fn new(catalog: Arc<CatalogService>, recommender: Arc<dyn RecommendationService>) -> Self {
        Self {
            catalog,
            recommender,
        }
    }

    /// Suggested movies as full catalog records.
    ///
    /// Degrades to an empty list on batch timeout or recommender failure,
    /// and silently drops individual suggestions that cannot be resolved.
    pub async fn ai_suggested_movies(&self) -> Vec<MovieDetail> {
        let watched = match self.catalog.top_rated_overall(WATCHED_LIST_LIMIT) {
            Ok(watched) => watched,
            Err(e) => {
                log::error!("Could not assemble watched list: {}", e);
                return Vec::new();
            }
        };

        if watched.is_empty() {
            log::debug!("No rated movies stored yet, skipping suggestions");
            return Vec::new();
        }

        let requests: Vec<SuggestionRequest> = watched
            .into_iter()
            .map(|detail| SuggestionRequest {
                title: detail.title,
                year: Some(detail.year),
                director: detail.director,
                synopsis: detail.plot,
                genre: detail.genre,
            })
            .collect();

        let validator: Arc<dyn MovieValidator> = Arc::new(self.catalog.suggestion_validator());

        let suggested = match tokio::time::timeout(
            BATCH_TIMEOUT,
            self.recommender.suggest_relevant_movies(requests, validator),
        )
        .await
        {
            Ok(Ok(suggested)) => suggested,
            Ok(Err(e)) => {
                log::error!("Recommendation service failed: {}", e);
                return Vec::new();
            }
            Err(_) => {
                log::warn!("Recommendation batch timed out");
                return Vec::new();
            }
        };

        let mut movies = Vec::new();
        for (candidate, _reason) in suggested {
            let Some(imdb_id) = candidate.imdb_id else {
                log::debug!("Suggestion '{}' resolved without an id, dropped", candidate.title);
                continue;
            };

            match self.catalog.movie_details(&imdb_id).await {
                Ok(detail) => movies.push(detail),
                Err(e) => {
                    log::warn!(
                        "Failed to get details for suggested movie '{}': {}",
                        candidate.title,
                        e
                    );
                }
            }
        }

        movies
    }
}
