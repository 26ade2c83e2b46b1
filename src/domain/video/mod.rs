//! Video domain - metadata entities, normalization and collaborator traits

mod cache;
mod entity;
mod normalizer;
mod resolver;

pub use cache::MetadataCache;
pub use entity::{SourceUrl, VideoLink, VideoMetadata};
pub use normalizer::{normalize_document, normalize_metadata};
pub use resolver::MetadataResolver;

#[cfg(test)]
pub use resolver::MockMetadataResolver;
