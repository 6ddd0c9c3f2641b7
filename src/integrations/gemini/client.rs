// src/integrations/gemini/client.rs
//
// AI movie recommendation integration
//
// ARCHITECTURE:
// - REST client for a Gemini-style text-generation API
// - Prompts with the caller's watched list, parses one suggestion per line
// - Each suggested title is resolved back to a concrete catalog entry
//   through a caller-supplied validator before it is returned
//
// CRITICAL RULES:
// - A validator that finds nothing answers None, never an error
// - One slow or failed validation must not abort its siblings
// - Model ranking order is preserved in the returned list

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Upper bound on suggestions requested per batch
pub const MAX_SUGGESTIONS: usize = 10;

/// Lightweight record describing one watched movie to the recommender
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRequest {
    pub title: String,
    pub year: Option<String>,
    pub director: Option<String>,
    pub synopsis: Option<String>,
    pub genre: Option<String>,
}

/// A suggested movie after validation against the real catalog
///
/// The identifier is an explicit optional field; absence means the title
/// could not be resolved to a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionCandidate {
    pub title: String,
    pub year: Option<String>,
    pub imdb_id: Option<String>,
}

/// Per-candidate resolver supplied by the caller
///
/// Contract: attempt to resolve a free-text title to a real catalog entry;
/// on any failure, including a per-item timeout, answer None. Never raises.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovieValidator: Send + Sync {
    async fn validate(&self, title: String) -> Option<SuggestionCandidate>;
}

/// External recommendation service interface
///
/// Returns (candidate, one-line reason) pairs, best match first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecommendationService: Send + Sync {
    async fn suggest_relevant_movies(
        &self,
        watched: Vec<SuggestionRequest>,
        validator: Arc<dyn MovieValidator>,
    ) -> AppResult<Vec<(SuggestionCandidate, String)>>;
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-1.5-flash".to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

// ============================================================================
// Wire payloads
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<ContentPayload>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ContentPayload {
    parts: Vec<PartPayload>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PartPayload {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<CandidatePayload>>,
}

#[derive(Debug, Deserialize)]
struct CandidatePayload {
    content: ContentPayload,
}

/// Gemini-backed recommendation client
pub struct GeminiClient {
    config: GeminiConfig,
    http_client: Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(AppError::Http)?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn build_prompt(watched: &[SuggestionRequest]) -> String {
        let mut prompt = String::from(
            "You are a movie recommendation engine. The user has watched and \
             enjoyed the following movies:\n",
        );

        for movie in watched {
            prompt.push_str("- ");
            prompt.push_str(&movie.title);
            if let Some(year) = &movie.year {
                prompt.push_str(&format!(" ({})", year));
            }
            if let Some(genre) = &movie.genre {
                prompt.push_str(&format!(" [{}]", genre));
            }
            if let Some(director) = &movie.director {
                prompt.push_str(&format!(", directed by {}", director));
            }
            if let Some(synopsis) = &movie.synopsis {
                prompt.push_str(&format!(": {}", synopsis));
            }
            prompt.push('\n');
        }

        prompt.push_str(&format!(
            "\nRecommend up to {} other movies this user would enjoy. \
             Do not repeat movies from the list above. \
             Answer with exactly one movie per line in the format:\n\
             Title - short reason\n\
             No numbering, no extra commentary.",
            MAX_SUGGESTIONS
        ));

        prompt
    }

    /// Strip a leading list marker ("1.", "2)", "-", "*") without touching
    /// titles that legitimately start with digits ("12 Angry Men").
    fn strip_list_marker(line: &str) -> &str {
        let trimmed = line.trim();

        if let Some(rest) = trimmed.strip_prefix(['-', '*']) {
            return rest.trim_start();
        }

        let digits = trimmed.chars().take_while(char::is_ascii_digit).count();
        if digits > 0 {
            if let Some(rest) = trimmed[digits..].strip_prefix(['.', ')']) {
                return rest.trim_start();
            }
        }

        trimmed
    }

    /// Parse the model reply into (title, reason) pairs, one per line.
    /// List markers and empty lines are tolerated; lines without a reason
    /// keep an empty reason.
    fn parse_suggestion_lines(text: &str) -> Vec<(String, String)> {
        text.lines()
            .filter_map(|line| {
                let line = Self::strip_list_marker(line);
                if line.is_empty() {
                    return None;
                }

                let (title, reason) = match line.split_once(" - ") {
                    Some((title, reason)) => (title.trim(), reason.trim()),
                    None => (line, ""),
                };

                if title.is_empty() {
                    None
                } else {
                    Some((title.to_string(), reason.to_string()))
                }
            })
            .take(MAX_SUGGESTIONS)
            .collect()
    }

    async fn generate(&self, prompt: String) -> AppResult<String> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        );

        let body = GenerateRequest {
            contents: vec![ContentPayload {
                parts: vec![PartPayload { text: prompt }],
            }],
        };

        let response = self
            .http_client
            .post(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Api(format!(
                "Recommendation API returned status: {}",
                response.status()
            )));
        }

        let payload: GenerateResponse = response.json().await?;

        let text = payload
            .candidates
            .and_then(|mut candidates| {
                if candidates.is_empty() {
                    None
                } else {
                    candidates.remove(0).content.parts.into_iter().next()
                }
            })
            .map(|part| part.text)
            .ok_or_else(|| AppError::Api("Recommendation API returned no text".to_string()))?;

        Ok(text)
    }
}

/// Run one validation per parsed suggestion, concurrently.
///
/// Each validation is an independent task; a hung or failed item resolves to
/// absence inside the validator and never cancels its siblings. Results come
/// back in the model's ranking order.
pub(crate) async fn resolve_candidates(
    lines: Vec<(String, String)>,
    validator: Arc<dyn MovieValidator>,
) -> Vec<(SuggestionCandidate, String)> {
    let mut tasks = tokio::task::JoinSet::new();

    for (index, (title, reason)) in lines.into_iter().enumerate() {
        let validator = Arc::clone(&validator);
        tasks.spawn(async move {
            let candidate = validator.validate(title).await;
            (index, candidate, reason)
        });
    }

    let mut resolved: Vec<(usize, SuggestionCandidate, String)> = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, Some(candidate), reason)) => resolved.push((index, candidate, reason)),
            Ok((_, None, _)) => {}
            Err(e) => log::warn!("Suggestion validation task failed: {}", e),
        }
    }

    resolved.sort_by_key(|(index, _, _)| *index);
    resolved
        .into_iter()
        .map(|(_, candidate, reason)| (candidate, reason))
        .collect()
}

#[async_trait]
impl RecommendationService for GeminiClient {
    async fn suggest_relevant_movies(
        &self,
        watched: Vec<SuggestionRequest>,
        validator: Arc<dyn MovieValidator>,
    ) -> AppResult<Vec<(SuggestionCandidate, String)>> {
        let prompt = Self::build_prompt(&watched);
        let reply = self.generate(prompt).await?;

        let lines = Self::parse_suggestion_lines(&reply);
        log::debug!("Recommendation reply parsed into {} suggestions", lines.len());

        Ok(resolve_candidates(lines, validator).await)
    }
}
