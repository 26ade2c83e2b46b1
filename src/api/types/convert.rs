//! Image conversion response types

use serde::Serialize;

use crate::domain::ConvertedImage;

/// Response of `POST /convert`
#[derive(Debug, Clone, Serialize)]
pub struct ConvertResponse {
    pub message: String,
    pub images: Vec<ConvertedImage>,
}

impl ConvertResponse {
    pub fn new(images: Vec<ConvertedImage>) -> Self {
        Self {
            message: "Image uploaded and converted".to_string(),
            images,
        }
    }
}
