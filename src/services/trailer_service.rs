// src/services/trailer_service.rs
//
// Trailer resolution
//
// Write-back cache over the external trailer-resolution service: the store
// is consulted first, and a successful external lookup is persisted into
// both tables so the expensive call happens at most once per identifier for
// the lifetime of the store. Absence and failure both surface as None.

use std::sync::Arc;

use crate::error::AppResult;
use crate::integrations::youtube::extract_video_id;
use crate::integrations::{TrailerFinder, TrailerQuery};
use crate::services::catalog_service::CatalogService;

pub struct TrailerService {
    catalog: Arc<CatalogService>,
    finder: Arc<dyn TrailerFinder>,
}

impl TrailerService {
    pub fn new(catalog: Arc<CatalogService>, finder: Arc<dyn TrailerFinder>) -> Self {
        Self { catalog, finder }
    }

    /// Trailer URL for a movie, resolved lazily.
    ///
    /// Store errors propagate; external-lookup failures degrade to None
    /// (the UI shows "unavailable", not an error).
    pub async fn trailer_for_movie(
        &self,
        imdb_id: &str,
        title: &str,
        year: Option<&str>,
    ) -> AppResult<Option<String>> {
        if title.trim().is_empty() {
            return Ok(None);
        }

        if let Some(url) = self.catalog.trailer_url(imdb_id)? {
            return Ok(Some(url));
        }

        let request = TrailerQuery {
            title: title.to_string(),
            year: year.map(str::to_string),
        };

        match self.finder.find_trailer(request).await {
            Ok(Some(url)) => {
                self.catalog.set_trailer_url(imdb_id, &url)?;
                Ok(Some(url))
            }
            Ok(None) => Ok(None),
            Err(e) => {
                log::warn!("Trailer lookup failed for {}: {}", imdb_id, e);
                Ok(None)
            }
        }
    }

    /// Same resolution, answering the bare YouTube video id for embedding
    /// in a player. URLs the extractor cannot parse count as absent.
    pub async fn trailer_video_id(
        &self,
        imdb_id: &str,
        title: &str,
        year: Option<&str>,
    ) -> AppResult<Option<String>> {
        let url = self.trailer_for_movie(imdb_id, title, year).await?;
        Ok(url.as_deref().and_then(extract_video_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::error::AppError;
    use crate::integrations::youtube::MockTrailerFinder;
    use crate::repositories::repository_tests::summary;
    use crate::repositories::{MovieRepository, SqliteMovieRepository};
    use crate::services::test_support::{fake_catalog, FakeApi};

    const TRAILER_URL: &str = "https://www.youtube.com/watch?v=YoHD9XEInc0";

    fn seeded_catalog() -> (
        tempfile::TempDir,
        Arc<crate::db::ConnectionPool>,
        Arc<crate::services::catalog_service::CatalogService>,
    ) {
        let (dir, pool, catalog) = fake_catalog(Arc::new(FakeApi::new()));
        SqliteMovieRepository::new(Arc::clone(&pool))
            .save_all(&[summary("tt1375666", "Inception")], "inception")
            .unwrap();
        (dir, pool, catalog)
    }

    #[tokio::test]
    async fn test_write_back_resolves_externally_once() {
        let (_dir, _pool, catalog) = seeded_catalog();

        let mut finder = MockTrailerFinder::new();
        finder
            .expect_find_trailer()
            .times(1)
            .returning(|_| Ok(Some(TRAILER_URL.to_string())));

        let service = TrailerService::new(catalog, Arc::new(finder));

        let first = service
            .trailer_for_movie("tt1375666", "Inception", Some("2010"))
            .await
            .unwrap();
        assert_eq!(first.as_deref(), Some(TRAILER_URL));

        // Second call is served from the store; times(1) above fails the
        // test if the finder is consulted again
        let second = service
            .trailer_for_movie("tt1375666", "Inception", Some("2010"))
            .await
            .unwrap();
        assert_eq!(second, first);
    }

    #[tokio::test]
    async fn test_absence_is_not_persisted() {
        let (_dir, _pool, catalog) = seeded_catalog();

        let mut finder = MockTrailerFinder::new();
        finder.expect_find_trailer().times(2).returning(|_| Ok(None));

        let service = TrailerService::new(catalog, Arc::new(finder));

        // No negative caching: absence asks again next time
        assert!(service
            .trailer_for_movie("tt1375666", "Inception", None)
            .await
            .unwrap()
            .is_none());
        assert!(service
            .trailer_for_movie("tt1375666", "Inception", None)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_lookup_failure_degrades_to_none() {
        let (_dir, _pool, catalog) = seeded_catalog();

        let mut finder = MockTrailerFinder::new();
        finder
            .expect_find_trailer()
            .returning(|_| Err(AppError::Api("quota exceeded".to_string())));

        let service = TrailerService::new(catalog, Arc::new(finder));

        let resolved = service
            .trailer_for_movie("tt1375666", "Inception", None)
            .await
            .unwrap();
        assert!(resolved.is_none());
    }

    #[tokio::test]
    async fn test_blank_title_never_reaches_the_finder() {
        let (_dir, _pool, catalog) = seeded_catalog();

        let finder = MockTrailerFinder::new();
        let service = TrailerService::new(catalog, Arc::new(finder));

        assert!(service
            .trailer_for_movie("tt1375666", "  ", None)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_video_id_for_player() {
        let (_dir, _pool, catalog) = seeded_catalog();

        let mut finder = MockTrailerFinder::new();
        finder
            .expect_find_trailer()
            .times(1)
            .returning(|_| Ok(Some(TRAILER_URL.to_string())));

        let service = TrailerService::new(catalog, Arc::new(finder));

        let video_id = service
            .trailer_video_id("tt1375666", "Inception", Some("2010"))
            .await
            .unwrap();
        assert_eq!(video_id.as_deref(), Some("YoHD9XEInc0"));
    }
}
