// src/integrations/gemini/mod.rs

pub mod client;

pub use client::{
    GeminiClient, GeminiConfig, MovieValidator, RecommendationService, SuggestionCandidate,
    SuggestionRequest, MAX_SUGGESTIONS,
};

#[cfg(test)]
pub use client::MockMovieValidator;
#[cfg(test)]
pub use client::MockRecommendationService;
