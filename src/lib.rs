//! Media Fetch Gateway
//!
//! HTTP service that:
//! - resolves video URLs into playable-stream metadata through an external
//!   extraction tool (yt-dlp), caching results in memory for the process
//!   lifetime
//! - converts uploaded images into PNG, JPEG, WebP and ICO copies

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use crate::config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use infrastructure::{
    cache::InMemoryMetadataCache,
    resolver::ProcessResolver,
    services::{ImageConversionConfig, ImageConversionService, VideoMetadataService},
};
use tracing::info;

/// Create the application state with default configuration
pub fn create_app_state() -> AppState {
    create_app_state_with_config(&AppConfig::default())
}

/// Create the application state with custom configuration
pub fn create_app_state_with_config(config: &AppConfig) -> AppState {
    let resolver = ProcessResolver::from_config(&config.resolver);

    info!(
        program = %config.resolver.program,
        timeout_secs = config.resolver.timeout_secs,
        kill_on_disconnect = config.resolver.kill_on_disconnect,
        "Metadata resolver configured"
    );

    let video_service = VideoMetadataService::new(
        Arc::new(InMemoryMetadataCache::new()),
        Arc::new(resolver),
    );

    let image_service = ImageConversionService::new(ImageConversionConfig {
        output_dir: config.uploads.dir.clone(),
        jpeg_quality: config.convert.jpeg_quality,
        ..ImageConversionConfig::default()
    });

    AppState::new(video_service, image_service)
}
