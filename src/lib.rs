// src/lib.rs
// MovieHub - Local-first movie catalog engine
//
// Architecture:
// - Three-tier read path: in-memory LRU caches -> SQLite store -> remote API
// - Capacity-bounded store: every insert batch is followed by an
//   oldest-first pruning sweep
// - Best-effort enrichment: genre carousels, AI suggestions and trailer
//   resolution degrade to partial or empty results, never to errors
// - Explicit: all state is per-instance and constructor-injected

pub mod cache;
pub mod db;
pub mod domain;
pub mod error;
pub mod integrations;
pub mod repositories;
pub mod services;

// ============================================================================
// PUBLIC API - Domain Types
// ============================================================================

pub use domain::{
    sort_display_name,
    sort_movies,
    Genre,
    InteractionRecord,
    // Movie records
    MovieDetail,
    MovieSummary,
    // Search
    PageKey,
    Rating,
    SearchOutcome,
    SearchPage,
    SortOption,
    SortOrder,
};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Database
// ============================================================================

pub use db::{
    create_connection_pool, create_connection_pool_at, initialize_database, ConnectionPool,
};

// ============================================================================
// PUBLIC API - Caching
// ============================================================================

pub use cache::MovieCaches;

// ============================================================================
// PUBLIC API - Repositories
// ============================================================================

pub use repositories::{
    DetailRepository,
    InteractionRepository,
    MovieRepository,
    SqliteDetailRepository,
    SqliteInteractionRepository,
    SqliteMovieRepository,
};

// ============================================================================
// PUBLIC API - Integrations
// ============================================================================

pub use integrations::{
    extract_video_id,
    GeminiClient,
    GeminiConfig,
    MediaKind,
    // Remote metadata service
    MovieApi,
    // Recommendations
    MovieValidator,
    OmdbClient,
    OmdbConfig,
    RecommendationService,
    SuggestionCandidate,
    SuggestionRequest,
    // Trailers
    TrailerFinder,
    TrailerQuery,
    YouTubeConfig,
    YouTubeTrailerClient,
};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    // Carousels
    CarouselService,
    // Catalog orchestrator
    CatalogService,
    CatalogValidator,
    FeedSnapshot,
    // Search feed
    SearchFeed,
    // AI suggestions
    SuggestionService,
    // Trailers
    TrailerService,
};
