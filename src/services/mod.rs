// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod carousel_service;
pub mod catalog_service;
pub mod search_feed;
pub mod suggestion_service;
pub mod trailer_service;

#[cfg(test)]
pub(crate) mod test_support;



// Re-export all services and their types
pub use catalog_service::{
    CatalogService, GENRE_ROW_LIMIT, MAX_STORED_DETAILS, MAX_STORED_MOVIES, PAGE_SIZE,
};

pub use suggestion_service::{
    CatalogValidator, SuggestionService, BATCH_TIMEOUT, VALIDATOR_TIMEOUT, WATCHED_LIST_LIMIT,
};

pub use trailer_service::TrailerService;

pub use carousel_service::{CarouselService, CAROUSEL_ROWS};

pub use search_feed::{FeedSnapshot, SearchFeed, SEARCH_DEBOUNCE};
