// src/integrations/mod.rs
//
// External service integrations
//
// Infrastructure only: each client maps wire payloads to domain values and
// keeps upstream quirks (string status sentinels, credential parameters)
// from leaking into core logic.

pub mod gemini;
pub mod omdb;
pub mod youtube;

pub use gemini::{
    GeminiClient, GeminiConfig, MovieValidator, RecommendationService, SuggestionCandidate,
    SuggestionRequest,
};
pub use omdb::{MediaKind, MovieApi, OmdbClient, OmdbConfig};
pub use youtube::{extract_video_id, TrailerFinder, TrailerQuery, YouTubeConfig, YouTubeTrailerClient};
