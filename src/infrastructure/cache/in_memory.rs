//! In-memory metadata cache

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::domain::video::{MetadataCache, SourceUrl, VideoMetadata};
use crate::domain::DomainError;

/// Process-wide metadata cache guarded by a reader-writer lock
///
/// Many lookups proceed in parallel; a store takes the write lock and swaps
/// in a complete entry. Data lives until the process terminates.
#[derive(Debug, Default)]
pub struct InMemoryMetadataCache {
    entries: RwLock<HashMap<SourceUrl, Arc<VideoMetadata>>>,
}

impl InMemoryMetadataCache {
    /// Creates a new empty cache
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MetadataCache for InMemoryMetadataCache {
    async fn lookup(&self, url: &SourceUrl) -> Result<Option<Arc<VideoMetadata>>, DomainError> {
        let entries = self.entries.read().map_err(|e| {
            DomainError::cache(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(entries.get(url).cloned())
    }

    async fn store(&self, url: SourceUrl, metadata: Arc<VideoMetadata>) -> Result<(), DomainError> {
        let mut entries = self.entries.write().map_err(|e| {
            DomainError::cache(format!("Failed to acquire write lock: {}", e))
        })?;

        entries.insert(url, metadata);
        Ok(())
    }

    async fn len(&self) -> Result<usize, DomainError> {
        let entries = self.entries.read().map_err(|e| {
            DomainError::cache(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(entries.len())
    }
}
