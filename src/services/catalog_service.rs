// src/services/catalog_service.rs
//
// Central catalog orchestrator
//
// Implements the three-tier read path (memory cache → persisted store →
// remote API) and the matching write path: remote results flow back into
// the store and the caches, and every insert batch is followed by a
// capacity sweep that prunes the oldest rows.
//
// Error policy: single-item, user-initiated lookups surface remote errors;
// the aggregate paths (genre rows, latest refresh) log and fall back to
// whatever is available locally.

use std::sync::Arc;

use crate::cache::MovieCaches;
use crate::domain::{Genre, MovieDetail, MovieSummary, PageKey, SearchOutcome, SearchPage};
use crate::error::AppResult;
use crate::integrations::{MediaKind, MovieApi};
use crate::repositories::{DetailRepository, InteractionRepository, MovieRepository};
use crate::services::suggestion_service::CatalogValidator;

/// Ceiling for rows in the movies table
pub const MAX_STORED_MOVIES: i64 = 200;

/// Ceiling for rows in the movie_details table
pub const MAX_STORED_DETAILS: i64 = 200;

/// Search results per page, matching the remote API's page size
pub const PAGE_SIZE: u32 = 10;

/// Movies per carousel row
pub const GENRE_ROW_LIMIT: u32 = 10;

/// Query and release-year filter for the "latest movies" seed page
const LATEST_QUERY: &str = "movie";
const LATEST_RELEASE_YEAR: &str = "2026";

pub struct CatalogService {
    api: Arc<dyn MovieApi>,
    movies: Arc<dyn MovieRepository>,
    details: Arc<dyn DetailRepository>,
    interactions: Arc<dyn InteractionRepository>,
    caches: MovieCaches,
}

impl CatalogService {
    pub fn new(
        api: Arc<dyn MovieApi>,
        movies: Arc<dyn MovieRepository>,
        details: Arc<dyn DetailRepository>,
        interactions: Arc<dyn InteractionRepository>,
    ) -> Self {
        Self::with_caches(api, movies, details, interactions, MovieCaches::new())
    }

    /// Construct with explicitly sized caches (tests use small capacities)
    pub fn with_caches(
        api: Arc<dyn MovieApi>,
        movies: Arc<dyn MovieRepository>,
        details: Arc<dyn DetailRepository>,
        interactions: Arc<dyn InteractionRepository>,
        caches: MovieCaches,
    ) -> Self {
        Self {
            api,
            movies,
            details,
            interactions,
            caches,
        }
    }

    /// One page of search results: memory cache, then persisted store,
    /// then the remote API.
    ///
    /// A non-empty local page is trusted as authoritative even when it holds
    /// fewer than PAGE_SIZE rows; the remote is not consulted for the rest.
    /// This trades completeness for fewer network calls.
    pub async fn search_movies(&self, query: &str, page: u32) -> AppResult<SearchPage> {
        let key = PageKey::new(query, page);

        if let Some(cached) = self.caches.get_page(&key) {
            return Ok(cached);
        }

        let offset = page.saturating_sub(1) * PAGE_SIZE;
        let stored = self
            .movies
            .list_by_query_paginated(query, PAGE_SIZE, offset)?;
        if !stored.is_empty() {
            let listable: Vec<MovieSummary> =
                stored.into_iter().filter(|m| m.is_listable()).collect();
            let result = SearchPage::with_movies(listable);
            self.caches.put_page(key, result.clone());
            return Ok(result);
        }

        match self.api.search(query, page, None, None).await? {
            SearchOutcome::Found(results) => {
                // The quality gate applies to every write path, the page
                // cache included: placeholder entries never leave the
                // adapter boundary.
                let listable: Vec<MovieSummary> = results
                    .into_iter()
                    .filter(|m| m.is_listable())
                    .collect();
                self.movies.save_all(&listable, query)?;
                self.enforce_store_limits()?;

                let result = SearchPage::with_movies(listable);
                self.caches.put_page(key, result.clone());
                Ok(result)
            }
            SearchOutcome::NotFound { reason } => Ok(SearchPage::empty(reason)),
        }
    }

    /// Full record for one movie: memory cache, then persisted store, then
    /// remote fetch-persist-cache. Remote errors surface to the caller.
    pub async fn movie_details(&self, imdb_id: &str) -> AppResult<MovieDetail> {
        if let Some(cached) = self.caches.get_details(imdb_id) {
            return Ok(cached);
        }

        if let Some(stored) = self.details.get(imdb_id)? {
            self.caches.put_details(stored.clone());
            return Ok(stored);
        }

        let fetched = self.api.details(imdb_id).await?;
        self.details.save(&fetched)?;
        self.enforce_store_limits()?;
        self.caches.put_details(fetched.clone());
        Ok(fetched)
    }

    /// Top-rated movies for one genre row.
    ///
    /// Unless forced, existing local rows win. Otherwise the remote search
    /// seeds the store (summaries plus a per-movie detail backfill) and the
    /// local top-rated query produces the answer. Remote-phase failures are
    /// logged and never fail the row.
    pub async fn movies_by_genre(
        &self,
        genre_name: &str,
        force_refresh: bool,
    ) -> AppResult<Vec<MovieDetail>> {
        let normalized = Genre::from_name(genre_name)
            .map(|g| g.display_name().to_string())
            .unwrap_or_else(|| genre_name.to_string());

        if !force_refresh {
            let stored = self
                .details
                .top_rated_by_genre(&normalized, GENRE_ROW_LIMIT)?;
            if !stored.is_empty() {
                return Ok(stored);
            }
        }

        match self
            .api
            .search(&normalized, 1, None, Some(MediaKind::Movie))
            .await
        {
            Ok(SearchOutcome::Found(results)) => {
                let batch: Vec<MovieSummary> = results
                    .into_iter()
                    .take(GENRE_ROW_LIMIT as usize)
                    .filter(|m| m.is_listable())
                    .collect();

                if let Err(e) = self.movies.save_all(&batch, &normalized) {
                    log::error!("Failed to store genre batch for {}: {}", normalized, e);
                }
                for movie in &batch {
                    if let Err(e) = self.movie_details(&movie.imdb_id).await {
                        log::warn!(
                            "Failed to fetch details for {} ({}): {}",
                            movie.imdb_id,
                            normalized,
                            e
                        );
                    }
                }
                if let Err(e) = self.enforce_store_limits() {
                    log::error!("Capacity sweep failed after genre {}: {}", normalized, e);
                }
            }
            Ok(SearchOutcome::NotFound { reason }) => {
                log::debug!(
                    "No remote results for genre {}: {}",
                    normalized,
                    reason.unwrap_or_default()
                );
            }
            Err(e) => {
                log::error!("Failed to search movies for genre {}: {}", normalized, e);
            }
        }

        self.details.top_rated_by_genre(&normalized, GENRE_ROW_LIMIT)
    }

    /// Fetch the fixed "latest movies" page, persist it, and backfill the
    /// details table one movie at a time. Used to seed the Recently Added
    /// row.
    pub async fn refresh_latest(&self) -> AppResult<()> {
        let outcome = self
            .api
            .search(LATEST_QUERY, 1, Some(LATEST_RELEASE_YEAR), None)
            .await?;

        if let SearchOutcome::Found(results) = outcome {
            let listable: Vec<MovieSummary> = results
                .into_iter()
                .filter(|m| m.is_listable())
                .collect();
            self.movies.save_all(&listable, LATEST_QUERY)?;
            self.enforce_store_limits()?;

            for movie in &listable {
                if let Err(e) = self.movie_details(&movie.imdb_id).await {
                    log::warn!("Failed to backfill details for {}: {}", movie.imdb_id, e);
                }
            }
        }

        Ok(())
    }

    /// Latest releases on hand, refreshing from the remote first when
    /// possible. A failed refresh degrades to whatever is stored.
    pub async fn recently_added(&self) -> AppResult<Vec<MovieDetail>> {
        if let Err(e) = self.refresh_latest().await {
            log::warn!("Latest-movies refresh failed, serving local data: {}", e);
        }
        self.details.recently_added(GENRE_ROW_LIMIT)
    }

    /// Best-rated stored movies overall; source of the AI watched list
    pub fn top_rated_overall(&self, limit: u32) -> AppResult<Vec<MovieDetail>> {
        self.details.top_rated_overall(limit)
    }

    /// Distinct first genre of every stored record
    pub fn stored_genres(&self) -> AppResult<Vec<String>> {
        self.details.first_genres()
    }

    /// Already-resolved trailer URL, if any (details table first)
    pub fn trailer_url(&self, imdb_id: &str) -> AppResult<Option<String>> {
        if let Some(url) = self.details.trailer_url(imdb_id)? {
            return Ok(Some(url));
        }
        self.movies.trailer_url(imdb_id)
    }

    /// Persist a resolved trailer URL into both tables and refresh the
    /// cached detail record so readers see the enrichment immediately.
    pub fn set_trailer_url(&self, imdb_id: &str, trailer_url: &str) -> AppResult<()> {
        self.details.set_trailer_url(imdb_id, trailer_url)?;
        self.movies.set_trailer_url(imdb_id, trailer_url)?;

        let url = trailer_url.to_string();
        self.caches
            .update_details(imdb_id, move |detail| detail.trailer = Some(url));

        Ok(())
    }

    pub fn increment_open_count(&self, imdb_id: &str) -> AppResult<()> {
        self.interactions.increment_open_count(imdb_id)
    }

    /// Validator handed to the recommendation service; resolves free-text
    /// titles against the same remote API this catalog uses.
    pub fn suggestion_validator(&self) -> CatalogValidator {
        CatalogValidator::new(Arc::clone(&self.api))
    }

    /// Count-then-delete sweep down to the table ceilings. Two steps, not
    /// one transaction: this service is the only writer of both tables, so
    /// a transient overshoot between the steps is harmless.
    fn enforce_store_limits(&self) -> AppResult<()> {
        let movie_count = self.movies.count()?;
        if movie_count > MAX_STORED_MOVIES {
            log::info!(
                "Movies table over capacity, pruning {} oldest rows",
                movie_count - MAX_STORED_MOVIES
            );
            self.movies.delete_oldest(movie_count - MAX_STORED_MOVIES)?;
        }

        let detail_count = self.details.count()?;
        if detail_count > MAX_STORED_DETAILS {
            log::info!(
                "Details table over capacity, pruning {} oldest rows",
                detail_count - MAX_STORED_DETAILS
            );
            self.details
                .delete_oldest(detail_count - MAX_STORED_DETAILS)?;
        }

        Ok(())
    }
}
