// src/cache/memory.rs
//
// In-memory cache tier
//
// Two independent bounded LRU caches sit in front of the persisted store:
// one for single-movie detail records, one for whole search-result pages.
// Strict least-recently-used eviction; a get refreshes recency. Entries
// have no expiry and live until capacity pressure or process restart.

use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};

use lru::LruCache;

use crate::domain::{MovieDetail, PageKey, SearchPage};

/// Detail records kept hot (keyed by imdb id)
pub const DETAILS_CACHE_CAPACITY: usize = 50;

/// Search-result pages kept hot (keyed by query + page)
pub const PAGE_CACHE_CAPACITY: usize = 20;

/// The repository's in-memory tier. One instance per catalog service;
/// nothing here is process-global, so tests get a fresh cache each time.
pub struct MovieCaches {
    details: Mutex<LruCache<String, MovieDetail>>,
    pages: Mutex<LruCache<PageKey, SearchPage>>,
}

impl MovieCaches {
    pub fn new() -> Self {
        Self::with_capacity(DETAILS_CACHE_CAPACITY, PAGE_CACHE_CAPACITY)
    }

    pub fn with_capacity(detail_capacity: usize, page_capacity: usize) -> Self {
        Self {
            details: Mutex::new(LruCache::new(non_zero(detail_capacity))),
            pages: Mutex::new(LruCache::new(non_zero(page_capacity))),
        }
    }

    pub fn get_details(&self, imdb_id: &str) -> Option<MovieDetail> {
        lock(&self.details).get(imdb_id).cloned()
    }

    pub fn put_details(&self, detail: MovieDetail) {
        lock(&self.details).put(detail.imdb_id.clone(), detail);
    }

    /// Update an already-cached detail record in place, without touching
    /// recency of other entries. Used for trailer-URL enrichment.
    pub fn update_details<F>(&self, imdb_id: &str, apply: F)
    where
        F: FnOnce(&mut MovieDetail),
    {
        if let Some(detail) = lock(&self.details).peek_mut(imdb_id) {
            apply(detail);
        }
    }

    pub fn get_page(&self, key: &PageKey) -> Option<SearchPage> {
        lock(&self.pages).get(key).cloned()
    }

    pub fn put_page(&self, key: PageKey, page: SearchPage) {
        lock(&self.pages).put(key, page);
    }
}

impl Default for MovieCaches {
    fn default() -> Self {
        Self::new()
    }
}

fn non_zero(capacity: usize) -> NonZeroUsize {
    NonZeroUsize::new(capacity.max(1)).unwrap_or_else(|| unreachable!("capacity clamped to >= 1"))
}

/// A poisoned lock only means another thread panicked mid-access; the cache
/// itself stays usable.
fn lock<K, V>(cache: &Mutex<LruCache<K, V>>) -> MutexGuard<'_, LruCache<K, V>>
where
    K: std::hash::Hash + Eq,
{
    match cache.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(id: &str) -> MovieDetail {
        MovieDetail {
            imdb_id: id.to_string(),
            title: format!("Movie {}", id),
            year: "2010".to_string(),
            rated: None,
            released: None,
            runtime: None,
            genre: None,
            director: None,
            writer: None,
            actors: None,
            plot: None,
            language: None,
            country: None,
            awards: None,
            poster: "http://poster".to_string(),
            ratings: Vec::new(),
            metascore: None,
            imdb_rating: None,
            imdb_votes: None,
            kind: "movie".to_string(),
            dvd: None,
            box_office: None,
            production: None,
            website: None,
            trailer: None,
        }
    }

    #[test]
    fn test_get_returns_cached_value() {
        let caches = MovieCaches::with_capacity(2, 2);
        caches.put_details(detail("tt1"));
        assert_eq!(caches.get_details("tt1").unwrap().imdb_id, "tt1");
        assert!(caches.get_details("tt2").is_none());
    }

    #[test]
    fn test_capacity_overflow_evicts_least_recently_used() {
        let caches = MovieCaches::with_capacity(50, 2);

        for i in 1..=50 {
            caches.put_details(detail(&format!("tt{}", i)));
        }

        // Touch #1 so #2 becomes the coldest entry
        assert!(caches.get_details("tt1").is_some());

        caches.put_details(detail("tt51"));

        assert!(caches.get_details("tt1").is_some());
        assert!(caches.get_details("tt2").is_none());
        assert!(caches.get_details("tt51").is_some());
    }

    #[test]
    fn test_page_cache_keyed_by_query_and_page() {
        let caches = MovieCaches::with_capacity(2, 2);
        caches.put_page(
            PageKey::new("batman", 1),
            SearchPage::with_movies(Vec::new()),
        );

        assert!(caches.get_page(&PageKey::new("batman", 1)).is_some());
        assert!(caches.get_page(&PageKey::new("batman", 2)).is_none());
        assert!(caches.get_page(&PageKey::new("superman", 1)).is_none());
    }

    #[test]
    fn test_update_details_applies_in_place() {
        let caches = MovieCaches::with_capacity(2, 2);
        caches.put_details(detail("tt1"));

        caches.update_details("tt1", |d| {
            d.trailer = Some("https://www.youtube.com/watch?v=YoHD9XEInc0".to_string())
        });

        assert!(caches.get_details("tt1").unwrap().trailer.is_some());
        // Unknown keys are a no-op
        caches.update_details("tt9", |d| d.trailer = None);
    }
}
