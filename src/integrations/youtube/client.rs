// src/integrations/youtube/client.rs
//
// Trailer resolution integration
//
// Finds an official trailer for a movie via a YouTube-style search API and
// answers a playable watch URL. Absence of a trailer is a normal outcome,
// not an error.

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use std::sync::OnceLock;
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// What the caller knows about the movie being resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrailerQuery {
    pub title: String,
    pub year: Option<String>,
}

/// External trailer-resolution service interface
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrailerFinder: Send + Sync {
    /// Resolve a trailer URL, or None when no trailer exists
    async fn find_trailer(&self, request: TrailerQuery) -> AppResult<Option<String>>;
}

/// Extract the 11-character video id from any of the usual YouTube URL
/// shapes (watch, embed, short link, shorts).
pub fn extract_video_id(url: &str) -> Option<String> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"(?:v=|/v/|/embed/|youtu\.be/|/shorts/|/watch\?v=|&v=)([a-zA-Z0-9_-]{11})")
            .unwrap_or_else(|e| unreachable!("video id pattern is valid: {}", e))
    });

    pattern
        .captures(url)
        .map(|captures| captures[1].to_string())
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct YouTubeConfig {
    pub base_url: String,
    pub api_key: String,
}

impl YouTubeConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: "https://www.googleapis.com/youtube/v3".to_string(),
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

#[derive(Debug, Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

/// YouTube Data API trailer search client
pub struct YouTubeTrailerClient {
    config: YouTubeConfig,
    http_client: Client,
}

impl YouTubeTrailerClient {
    pub fn new(config: YouTubeConfig) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(AppError::Http)?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn search_term(request: &TrailerQuery) -> String {
        match &request.year {
            Some(year) => format!("{} {} official trailer", request.title, year),
            None => format!("{} official trailer", request.title),
        }
    }

    fn watch_url(video_id: &str) -> String {
        format!("https://www.youtube.com/watch?v={}", video_id)
    }
}

#[async_trait]
impl TrailerFinder for YouTubeTrailerClient {
    async fn find_trailer(&self, request: TrailerQuery) -> AppResult<Option<String>> {
        let url = format!("{}/search", self.config.base_url);
        let term = Self::search_term(&request);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("part", "snippet"),
                ("q", term.as_str()),
                ("type", "video"),
                ("maxResults", "1"),
                ("key", self.config.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Api(format!(
                "Trailer API returned status: {}",
                response.status()
            )));
        }

        let payload: SearchListResponse = response.json().await?;

        Ok(payload
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .next()
            .map(|video_id| Self::watch_url(&video_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_video_id_from_common_shapes() {
        let expected = Some("YoHD9XEInc0".to_string());
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=YoHD9XEInc0"),
            expected
        );
        assert_eq!(extract_video_id("https://youtu.be/YoHD9XEInc0"), expected);
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/YoHD9XEInc0"),
            expected
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/shorts/YoHD9XEInc0"),
            expected
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?list=PL1&v=YoHD9XEInc0"),
            expected
        );
    }

    #[test]
    fn test_extract_video_id_rejects_non_video_urls() {
        assert_eq!(extract_video_id("https://example.com/watch"), None);
        assert_eq!(extract_video_id("not a url"), None);
    }

    #[test]
    fn test_search_term_includes_year_when_known() {
        let with_year = YouTubeTrailerClient::search_term(&TrailerQuery {
            title: "Inception".to_string(),
            year: Some("2010".to_string()),
        });
        assert_eq!(with_year, "Inception 2010 official trailer");

        let without_year = YouTubeTrailerClient::search_term(&TrailerQuery {
            title: "Inception".to_string(),
            year: None,
        });
        assert_eq!(without_year, "Inception official trailer");
    }

    #[test]
    fn test_watch_url_round_trips_through_extractor() {
        let url = YouTubeTrailerClient::watch_url("YoHD9XEInc0");
        assert_eq!(extract_video_id(&url).as_deref(), Some("YoHD9XEInc0"));
    }
}
