//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::services::{ImageConversionService, VideoMetadataService};

/// Application state shared by every request handler
#[derive(Clone)]
pub struct AppState {
    pub video_service: Arc<VideoMetadataService>,
    pub image_service: Arc<ImageConversionService>,
}

impl AppState {
    pub fn new(video_service: VideoMetadataService, image_service: ImageConversionService) -> Self {
        Self {
            video_service: Arc::new(video_service),
            image_service: Arc::new(image_service),
        }
    }
}
