//! Image conversion service - re-encodes an upload into every output format

use std::io::Cursor;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use image::codecs::ico::IcoEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ImageFormat};
use tracing::{debug, info};

use crate::domain::image::{output_stem, ConvertedImage, OutputFormat};
use crate::domain::DomainError;
use crate::infrastructure::observability::record_image_conversion;

/// Largest edge an ICO entry can hold
const ICO_MAX_DIMENSION: u32 = 256;

/// Settings for image conversion
#[derive(Debug, Clone)]
pub struct ImageConversionConfig {
    /// Directory the converted files are written to
    pub output_dir: PathBuf,
    /// URL prefix under which the output directory is served
    pub public_prefix: String,
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
}

impl Default for ImageConversionConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("uploads"),
            public_prefix: "/uploads".to_string(),
            jpeg_quality: 70,
        }
    }
}

/// Service converting uploaded images into the supported output formats
#[derive(Debug, Clone)]
pub struct ImageConversionService {
    config: ImageConversionConfig,
}

impl ImageConversionService {
    pub fn new(config: ImageConversionConfig) -> Self {
        Self { config }
    }

    pub fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }

    /// Decode the upload and write one copy per output format
    pub async fn convert(
        &self,
        file_name: Option<&str>,
        data: Bytes,
    ) -> Result<Vec<ConvertedImage>, DomainError> {
        let stem = output_stem(file_name);
        let config = self.config.clone();

        debug!(stem = %stem, bytes = data.len(), "Converting uploaded image");

        let images = tokio::task::spawn_blocking(move || convert_blocking(&config, &stem, &data))
            .await
            .map_err(|e| DomainError::internal(format!("Conversion task failed: {}", e)))??;

        info!(count = images.len(), "Image uploaded and converted");
        Ok(images)
    }
}

fn convert_blocking(
    config: &ImageConversionConfig,
    stem: &str,
    data: &[u8],
) -> Result<Vec<ConvertedImage>, DomainError> {
    let img = image::load_from_memory(data)
        .map_err(|e| DomainError::invalid_request(format!("Invalid image format: {}", e)))?;

    std::fs::create_dir_all(&config.output_dir).map_err(|e| {
        DomainError::storage(format!(
            "Failed to create {}: {}",
            config.output_dir.display(),
            e
        ))
    })?;

    let mut converted = Vec::with_capacity(OutputFormat::ALL.len());

    for format in OutputFormat::ALL {
        let result = encode(&img, format, config.jpeg_quality).and_then(|encoded| {
            let file_name = format!("{}.{}", stem, format.extension());
            let path = config.output_dir.join(&file_name);

            std::fs::write(&path, &encoded).map_err(|e| {
                DomainError::storage(format!("Failed to write {}: {}", path.display(), e))
            })?;

            Ok(ConvertedImage {
                url: format!("{}/{}", config.public_prefix.trim_end_matches('/'), file_name),
                size: encoded.len() as u64,
            })
        });

        record_image_conversion(format, result.is_ok());
        converted.push(result?);
    }

    Ok(converted)
}

/// Encode the image in one output format
pub fn encode(img: &DynamicImage, format: OutputFormat, jpeg_quality: u8) -> Result<Vec<u8>, DomainError> {
    let mut buf = Vec::new();

    let result = match format {
        OutputFormat::Png => img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png),
        OutputFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8())
            .write_with_encoder(JpegEncoder::new_with_quality(&mut buf, jpeg_quality.clamp(1, 100))),
        OutputFormat::Webp => DynamicImage::ImageRgba8(img.to_rgba8())
            .write_with_encoder(WebPEncoder::new_lossless(&mut buf)),
        OutputFormat::Ico => {
            let fitted = if img.width() > ICO_MAX_DIMENSION || img.height() > ICO_MAX_DIMENSION {
                img.thumbnail(ICO_MAX_DIMENSION, ICO_MAX_DIMENSION)
            } else {
                img.clone()
            };

            DynamicImage::ImageRgba8(fitted.to_rgba8()).write_with_encoder(IcoEncoder::new(&mut buf))
        }
    };

    result.map_err(|e| DomainError::image_conversion(format!("{} encoding failed: {}", format, e)))?;
    Ok(buf)
}
