//! Application services

mod image_conversion_service;
mod video_metadata_service;

pub use image_conversion_service::{encode, ImageConversionConfig, ImageConversionService};
pub use video_metadata_service::{CacheStatus, FetchedMetadata, VideoMetadataService};
