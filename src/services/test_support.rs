// src/services/test_support.rs
//
// Shared fixtures for service-layer tests.
//
// FakeApi is a scripted MovieApi with per-endpoint call counters, backing
// the cache-hit and degradation assertions. Unscripted searches answer the
// upstream "not found" outcome; unscripted detail lookups error.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use crate::db::ConnectionPool;
use crate::domain::{MovieDetail, MovieSummary, SearchOutcome};
use crate::error::{AppError, AppResult};
use crate::integrations::{MediaKind, MovieApi};
use crate::repositories::repository_tests::test_pool;
use crate::repositories::{
    SqliteDetailRepository, SqliteInteractionRepository, SqliteMovieRepository,
};
use crate::services::catalog_service::CatalogService;

#[derive(Default)]
pub(crate) struct FakeApi {
    search_outcomes: Mutex<HashMap<(String, u32), SearchOutcome>>,
    details: Mutex<HashMap<String, MovieDetail>>,
    titles: Mutex<HashMap<String, MovieSummary>>,
    hanging_titles: Mutex<Vec<String>>,
    failing_searches: Mutex<Vec<(String, u32)>>,
    pub search_calls: AtomicUsize,
    pub detail_calls: AtomicUsize,
    pub title_calls: AtomicUsize,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_search(&self, query: &str, page: u32, outcome: SearchOutcome) {
        self.search_outcomes
            .lock()
            .unwrap()
            .insert((query.to_string(), page), outcome);
    }

    pub fn on_details(&self, detail: MovieDetail) {
        self.details
            .lock()
            .unwrap()
            .insert(detail.imdb_id.clone(), detail);
    }

    pub fn on_title(&self, title: &str, summary: MovieSummary) {
        self.titles
            .lock()
            .unwrap()
            .insert(title.to_string(), summary);
    }

    /// Make lookup_by_title for this title hang forever
    pub fn hang_title(&self, title: &str) {
        self.hanging_titles.lock().unwrap().push(title.to_string());
    }

    /// Make search for this (query, page) fail with a transport error
    pub fn fail_search(&self, query: &str, page: u32) {
        self.failing_searches
            .lock()
            .unwrap()
            .push((query.to_string(), page));
    }

    pub fn search_call_count(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn detail_call_count(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }

    pub fn title_call_count(&self) -> usize {
        self.title_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MovieApi for FakeApi {
    async fn search(
        &self,
        query: &str,
        page: u32,
        _year: Option<&str>,
        _kind: Option<MediaKind>,
    ) -> AppResult<SearchOutcome> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);

        if self
            .failing_searches
            .lock()
            .unwrap()
            .iter()
            .any(|(q, p)| q == query && *p == page)
        {
            return Err(AppError::Api("connection reset".to_string()));
        }

        let outcome = self
            .search_outcomes
            .lock()
            .unwrap()
            .get(&(query.to_string(), page))
            .cloned();

        Ok(outcome.unwrap_or(SearchOutcome::NotFound {
            reason: Some("Movie not found!".to_string()),
        }))
    }

    async fn details(&self, imdb_id: &str) -> AppResult<MovieDetail> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);

        self.details
            .lock()
            .unwrap()
            .get(imdb_id)
            .cloned()
            .ok_or(AppError::NotFound)
    }

    async fn lookup_by_title(&self, title: &str) -> AppResult<Option<MovieSummary>> {
        self.title_calls.fetch_add(1, Ordering::SeqCst);

        if self
            .hanging_titles
            .lock()
            .unwrap()
            .iter()
            .any(|hung| hung == title)
        {
            std::future::pending::<()>().await;
        }

        Ok(self.titles.lock().unwrap().get(title).cloned())
    }
}

/// Catalog service over a real temp-file SQLite store and a scripted API
pub(crate) fn fake_catalog(
    api: Arc<FakeApi>,
) -> (TempDir, Arc<ConnectionPool>, Arc<CatalogService>) {
    let (dir, pool) = test_pool();
    let catalog = CatalogService::new(
        api,
        Arc::new(SqliteMovieRepository::new(Arc::clone(&pool))),
        Arc::new(SqliteDetailRepository::new(Arc::clone(&pool))),
        Arc::new(SqliteInteractionRepository::new(Arc::clone(&pool))),
    );
    (dir, pool, Arc::new(catalog))
}
