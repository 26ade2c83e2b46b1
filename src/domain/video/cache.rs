//! Metadata cache trait definition

use std::sync::Arc;

use async_trait::async_trait;

use super::entity::{SourceUrl, VideoMetadata};
use crate::domain::DomainError;

/// Shared mapping from source URL to resolved metadata.
///
/// Lookups may run concurrently with each other; a store excludes every other
/// access, so a reader observes either the previous or the new entry in full.
/// Entries are never evicted.
#[async_trait]
pub trait MetadataCache: Send + Sync + std::fmt::Debug {
    /// Returns the cached metadata, if any
    async fn lookup(&self, url: &SourceUrl) -> Result<Option<Arc<VideoMetadata>>, DomainError>;

    /// Inserts or overwrites the entry for the URL
    async fn store(&self, url: SourceUrl, metadata: Arc<VideoMetadata>) -> Result<(), DomainError>;

    /// Number of cached entries
    async fn len(&self) -> Result<usize, DomainError>;
}
