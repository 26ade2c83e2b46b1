//! Video metadata entities

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Identifier of a video resource, used as cache key and resolver input
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SourceUrl(String);

impl SourceUrl {
    /// Create a new SourceUrl; only emptiness is rejected
    pub fn new(url: impl Into<String>) -> Result<Self, DomainError> {
        let url = url.into();

        if url.trim().is_empty() {
            return Err(DomainError::invalid_request("Missing video URL"));
        }

        Ok(Self(url))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SourceUrl {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SourceUrl> for String {
    fn from(url: SourceUrl) -> Self {
        url.0
    }
}

impl std::fmt::Display for SourceUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One playable stream of a video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoLink {
    #[serde(rename = "link")]
    pub stream_url: String,
    #[serde(rename = "quality")]
    pub quality_label: String,
}

impl VideoLink {
    pub fn new(stream_url: impl Into<String>, quality_label: impl Into<String>) -> Self {
        Self {
            stream_url: stream_url.into(),
            quality_label: quality_label.into(),
        }
    }
}

/// Normalized metadata of a video.
///
/// Every field always carries a value; absent source data is replaced by the
/// sentinels in this module rather than left unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    pub thumbnail: String,
    #[serde(rename = "duration")]
    pub duration_seconds: u64,
    pub category: String,
    pub links: Vec<VideoLink>,
}

impl VideoMetadata {
    pub const UNKNOWN_TITLE: &'static str = "Unknown Title";
    pub const NO_THUMBNAIL: &'static str = "No Thumbnail";
    pub const UNCATEGORIZED: &'static str = "Uncategorized";
}

impl Default for VideoMetadata {
    fn default() -> Self {
        Self {
            title: Self::UNKNOWN_TITLE.to_string(),
            thumbnail: Self::NO_THUMBNAIL.to_string(),
            duration_seconds: 0,
            category: Self::UNCATEGORIZED.to_string(),
            links: Vec::new(),
        }
    }
}
