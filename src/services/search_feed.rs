// src/services/search_feed.rs
//
// Pagination / search coordination
//
// Owns the mutable cursor for one search surface: current page, end-of-
// results flag, in-flight flag, last query, accumulated results. A new
// query resets the cursor and cancels any in-flight request (single-flight
// per feed); every dispatch is preceded by a debounce delay; an empty page
// marks the end of results and further load-more calls are no-ops until the
// query changes.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::domain::MovieSummary;
use crate::services::catalog_service::CatalogService;

/// Delay between the last keystroke and the actual fetch
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Default)]
struct FeedState {
    query: String,
    /// Next page to fetch (1-based)
    page: u32,
    end_reached: bool,
    in_flight: bool,
    movies: Vec<MovieSummary>,
    error: Option<String>,
    /// Bumped on every dispatch and reset; stale tasks must not write back
    generation: u64,
}

/// Read-only view of the feed for consumers
#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    pub query: String,
    pub movies: Vec<MovieSummary>,
    pub end_reached: bool,
    pub in_flight: bool,
    pub error: Option<String>,
}

pub struct SearchFeed {
    catalog: Arc<CatalogService>,
    debounce: Duration,
    state: Arc<Mutex<FeedState>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SearchFeed {
    pub fn new(catalog: Arc<CatalogService>) -> Self {
        Self::with_debounce(catalog, SEARCH_DEBOUNCE)
    }

    pub fn with_debounce(catalog: Arc<CatalogService>, debounce: Duration) -> Self {
        Self {
            catalog,
            debounce,
            state: Arc::new(Mutex::new(FeedState {
                page: 1,
                ..FeedState::default()
            })),
            task: Mutex::new(None),
        }
    }

    /// React to a changed search box.
    ///
    /// A blank query clears the feed. A different query resets the cursor,
    /// cancels the in-flight request and dispatches a fresh page-1 fetch.
    /// Repeating the current query while a request is in flight is a no-op;
    /// repeating it when idle continues from the current cursor, so page 1
    /// results are never appended twice.
    pub fn submit_query(&self, query: &str) {
        if query.trim().is_empty() {
            self.abort_current();
            let mut state = lock(&self.state);
            state.generation += 1;
            state.query.clear();
            state.page = 1;
            state.end_reached = false;
            state.in_flight = false;
            state.movies.clear();
            state.error = None;
            return;
        }

        {
            let mut state = lock(&self.state);
            if query != state.query {
                state.query = query.to_string();
                state.page = 1;
                state.end_reached = false;
                state.movies.clear();
                state.error = None;
            } else if state.in_flight || state.end_reached {
                return;
            }
        }

        self.dispatch();
    }

    /// Fetch the next page of the current query, unless the feed is idle,
    /// exhausted, or already fetching.
    pub fn load_more(&self) {
        {
            let state = lock(&self.state);
            if state.query.is_empty() || state.end_reached || state.in_flight {
                return;
            }
        }

        self.dispatch();
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        let state = lock(&self.state);
        FeedSnapshot {
            query: state.query.clone(),
            movies: state.movies.clone(),
            end_reached: state.end_reached,
            in_flight: state.in_flight,
            error: state.error.clone(),
        }
    }

    /// Await completion of the current fetch task, if any. Test hook, but
    /// also useful to embedders that need a settled feed.
    pub async fn wait_idle(&self) {
        let handle = lock_task(&self.task).take();
        if let Some(handle) = handle {
            // Aborted tasks report a cancellation error; that is expected
            let _ = handle.await;
        }
    }

    fn abort_current(&self) {
        if let Some(handle) = lock_task(&self.task).take() {
            handle.abort();
        }
    }

    fn dispatch(&self) {
        let generation = {
            let mut state = lock(&self.state);
            state.generation += 1;
            state.in_flight = true;
            state.generation
        };

        self.abort_current();

        let catalog = Arc::clone(&self.catalog);
        let state_arc = Arc::clone(&self.state);
        let debounce = self.debounce;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;

            let (query, page) = {
                let state = lock(&state_arc);
                if state.generation != generation {
                    return;
                }
                (state.query.clone(), state.page)
            };

            let result = catalog.search_movies(&query, page).await;

            let mut state = lock(&state_arc);
            if state.generation != generation {
                return;
            }

            match result {
                Ok(fetched) => {
                    if fetched.is_exhausted() {
                        state.end_reached = true;
                    } else {
                        state.movies.extend(fetched.movies);
                        state.page += 1;
                    }
                    state.error = None;
                }
                Err(e) => {
                    state.error = Some(e.to_string());
                }
            }
            state.in_flight = false;
        });

        *lock_task(&self.task) = Some(handle);
    }
}

fn lock(state: &Mutex<FeedState>) -> MutexGuard<'_, FeedState> {
    match state.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn lock_task(task: &Mutex<Option<JoinHandle<()>>>) -> MutexGuard<'_, Option<JoinHandle<()>>> {
    match task.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
