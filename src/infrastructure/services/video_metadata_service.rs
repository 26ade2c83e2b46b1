//! Video metadata service - cache lookup, resolution and population

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::video::{
    normalize_metadata, MetadataCache, MetadataResolver, SourceUrl, VideoMetadata,
};
use crate::domain::DomainError;
use crate::infrastructure::observability::record_cache_lookup;

/// Whether a response was served from the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hit => "HIT",
            Self::Miss => "MISS",
        }
    }
}

/// Metadata for one request together with its cache outcome
#[derive(Debug, Clone)]
pub struct FetchedMetadata {
    pub metadata: Arc<VideoMetadata>,
    pub cache_status: CacheStatus,
}

/// Coordinates one metadata request.
///
/// A hit is returned as is. On a miss the resolver runs, its output is
/// normalized and the result stored before returning. Failures leave the cache
/// untouched. Concurrent misses for the same URL each resolve independently
/// and the last store wins.
#[derive(Debug, Clone)]
pub struct VideoMetadataService {
    cache: Arc<dyn MetadataCache>,
    resolver: Arc<dyn MetadataResolver>,
}

impl VideoMetadataService {
    pub fn new(cache: Arc<dyn MetadataCache>, resolver: Arc<dyn MetadataResolver>) -> Self {
        Self { cache, resolver }
    }

    /// Fetch metadata for a source URL, resolving it on a cache miss
    pub async fn fetch(&self, url: &SourceUrl) -> Result<FetchedMetadata, DomainError> {
        if let Some(metadata) = self.cache.lookup(url).await? {
            debug!(url = %url, "Metadata cache hit");
            record_cache_lookup(CacheStatus::Hit);

            return Ok(FetchedMetadata {
                metadata,
                cache_status: CacheStatus::Hit,
            });
        }

        debug!(url = %url, "Metadata cache miss");
        record_cache_lookup(CacheStatus::Miss);

        let raw = self.resolver.resolve(url).await?;
        let metadata = Arc::new(normalize_metadata(&raw)?);

        self.cache.store(url.clone(), metadata.clone()).await?;
        info!(
            url = %url,
            title = %metadata.title,
            links = metadata.links.len(),
            "Metadata resolved and cached"
        );

        Ok(FetchedMetadata {
            metadata,
            cache_status: CacheStatus::Miss,
        })
    }

    /// Number of cached entries
    pub async fn cached_entries(&self) -> Result<usize, DomainError> {
        self.cache.len().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::video::{MockMetadataResolver, VideoLink};
    use crate::infrastructure::cache::InMemoryMetadataCache;

    const CAT_VIDEO: &str = r#"{"title":"Cat Video","duration":125.7,"categories":["Pets"],"formats":[{"url":"http://x/1","format":"360p"},{"url":"http://x/2"}]}"#;

    fn url(raw: &str) -> SourceUrl {
        SourceUrl::new(raw).unwrap()
    }

    fn service_with(
        resolver: MockMetadataResolver,
    ) -> (VideoMetadataService, Arc<InMemoryMetadataCache>) {
        let cache = Arc::new(InMemoryMetadataCache::new());
        let service = VideoMetadataService::new(cache.clone(), Arc::new(resolver));
        (service, cache)
    }

    #[tokio::test]
    async fn test_miss_resolves_normalizes_and_caches() {
        let mut resolver = MockMetadataResolver::new();
        resolver
            .expect_resolve()
            .withf(|u| u.as_str() == "https://x/cat")
            .times(1)
            .returning(|_| Ok(CAT_VIDEO.as_bytes().to_vec()));

        let (service, cache) = service_with(resolver);

        let fetched = service.fetch(&url("https://x/cat")).await.unwrap();

        assert_eq!(fetched.cache_status, CacheStatus::Miss);
        assert_eq!(fetched.metadata.title, "Cat Video");
        assert_eq!(fetched.metadata.thumbnail, "No Thumbnail");
        assert_eq!(fetched.metadata.duration_seconds, 125);
        assert_eq!(fetched.metadata.category, "Pets");
        assert_eq!(fetched.metadata.links, vec![VideoLink::new("http://x/1", "360p")]);

        let cached = cache.lookup(&url("https://x/cat")).await.unwrap().unwrap();
        assert_eq!(cached, fetched.metadata);
    }

    #[tokio::test]
    async fn test_second_request_is_served_from_cache() {
        let mut resolver = MockMetadataResolver::new();
        resolver
            .expect_resolve()
            .times(1)
            .returning(|_| Ok(CAT_VIDEO.as_bytes().to_vec()));

        let (service, _cache) = service_with(resolver);

        let first = service.fetch(&url("https://x/cat")).await.unwrap();
        let second = service.fetch(&url("https://x/cat")).await.unwrap();

        assert_eq!(second.cache_status, CacheStatus::Hit);
        assert_eq!(
            serde_json::to_vec(&*first.metadata).unwrap(),
            serde_json::to_vec(&*second.metadata).unwrap()
        );
    }

    #[tokio::test]
    async fn test_resolution_failure_is_not_cached() {
        let mut resolver = MockMetadataResolver::new();
        resolver
            .expect_resolve()
            .times(2)
            .returning(|_| Err(DomainError::resolution_failed("ERROR: Unsupported URL")));

        let (service, cache) = service_with(resolver);

        let err = service.fetch(&url("https://x/bad")).await.unwrap_err();
        assert!(matches!(err, DomainError::ResolutionFailed { .. }));
        assert!(cache.lookup(&url("https://x/bad")).await.unwrap().is_none());

        // not retried internally, but a later request resolves again
        let err = service.fetch(&url("https://x/bad")).await.unwrap_err();
        assert!(matches!(err, DomainError::ResolutionFailed { .. }));
    }

    #[tokio::test]
    async fn test_malformed_output_is_not_cached() {
        let mut resolver = MockMetadataResolver::new();
        resolver
            .expect_resolve()
            .times(1)
            .returning(|_| Ok(b"<html>rate limited</html>".to_vec()));

        let (service, cache) = service_with(resolver);

        let err = service.fetch(&url("https://x/html")).await.unwrap_err();
        assert!(matches!(err, DomainError::MalformedMetadata { .. }));
        assert_eq!(cache.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_distinct_urls_resolve_separately() {
        let mut resolver = MockMetadataResolver::new();
        resolver
            .expect_resolve()
            .times(2)
            .returning(|u| Ok(format!(r#"{{"title":"{}"}}"#, u.as_str()).into_bytes()));

        let (service, _cache) = service_with(resolver);

        let a = service.fetch(&url("https://x/a")).await.unwrap();
        let b = service.fetch(&url("https://x/b")).await.unwrap();

        assert_eq!(a.metadata.title, "https://x/a");
        assert_eq!(b.metadata.title, "https://x/b");
        assert_eq!(service.cached_entries().await.unwrap(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_misses_resolve_independently() {
        let mut resolver = MockMetadataResolver::new();
        resolver.expect_resolve().returning(|_| {
            std::thread::sleep(std::time::Duration::from_millis(20));
            Ok(CAT_VIDEO.as_bytes().to_vec())
        });

        let (service, cache) = service_with(resolver);

        let requests = (0..4).map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.fetch(&url("https://x/cat")).await })
        });

        let results = futures::future::join_all(requests).await;

        for result in results {
            let fetched = result.unwrap().unwrap();
            assert_eq!(fetched.metadata.title, "Cat Video");
        }

        assert_eq!(cache.len().await.unwrap(), 1);
    }
}
