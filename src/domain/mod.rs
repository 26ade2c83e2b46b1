//! Domain layer - Core entities, pure logic and collaborator traits

pub mod error;
pub mod image;
pub mod video;

pub use error::DomainError;
pub use self::image::{ConvertedImage, OutputFormat};
pub use video::{
    normalize_metadata, MetadataCache, MetadataResolver, SourceUrl, VideoLink, VideoMetadata,
};
