// src/services/carousel_service.rs
//
// Genre carousel loading
//
// Every row loads as an independent sibling task; rows land in the shared
// map in completion order, so callers must not assume any row ordering.
// A failed or empty row is simply omitted.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::task::JoinSet;

use crate::domain::{Genre, MovieDetail};
use crate::services::catalog_service::CatalogService;
use crate::services::suggestion_service::SuggestionService;

/// Rows rendered on the home screen, in display order
pub const CAROUSEL_ROWS: [Genre; 9] = [
    Genre::AiSuggestions,
    Genre::RecentlyAdded,
    Genre::Action,
    Genre::Comedy,
    Genre::SciFi,
    Genre::Drama,
    Genre::Horror,
    Genre::Musical,
    Genre::Thriller,
];

pub struct CarouselService {
    catalog: Arc<CatalogService>,
    suggestions: Arc<SuggestionService>,
}

impl CarouselService {
    pub fn new(catalog: Arc<CatalogService>, suggestions: Arc<SuggestionService>) -> Self {
        Self {
            catalog,
            suggestions,
        }
    }

    /// Row labels in display order, for consumers that render placeholders
    /// before the data lands
    pub fn row_labels(&self) -> Vec<&'static str> {
        CAROUSEL_ROWS.iter().map(|g| g.display_name()).collect()
    }

    /// Load every carousel row concurrently and merge the results.
    ///
    /// Each task owns exactly one key of the result map, so merging is
    /// append-only regardless of completion order. Failures are logged
    /// inside the task and produce an absent row, never an error.
    pub async fn load_carousels(
        &self,
        force_refresh: bool,
    ) -> HashMap<&'static str, Vec<MovieDetail>> {
        let mut tasks: JoinSet<(&'static str, Vec<MovieDetail>)> = JoinSet::new();

        for genre in CAROUSEL_ROWS {
            let label = genre.display_name();

            match genre {
                Genre::RecentlyAdded => {
                    let catalog = Arc::clone(&self.catalog);
                    tasks.spawn(async move {
                        match catalog.recently_added().await {
                            Ok(movies) => (label, movies),
                            Err(e) => {
                                log::error!("Failed to load Recently Added row: {}", e);
                                (label, Vec::new())
                            }
                        }
                    });
                }
                Genre::AiSuggestions => {
                    let suggestions = Arc::clone(&self.suggestions);
                    tasks.spawn(async move { (label, suggestions.ai_suggested_movies().await) });
                }
                _ => {
                    let catalog = Arc::clone(&self.catalog);
                    tasks.spawn(async move {
                        match catalog.movies_by_genre(label, force_refresh).await {
                            Ok(movies) => (label, movies),
                            Err(e) => {
                                log::error!("Failed to load genre row {}: {}", label, e);
                                (label, Vec::new())
                            }
                        }
                    });
                }
            }
        }

        let mut rows: HashMap<&'static str, Vec<MovieDetail>> = HashMap::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((label, movies)) => {
                    if !movies.is_empty() {
                        rows.insert(label, movies);
                    }
                }
                Err(e) => log::error!("Carousel row task failed: {}", e),
            }
        }

        rows
    }
}
