//! Image conversion entities

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Target formats produced for every uploaded image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    Jpeg,
    Webp,
    Ico,
}

impl OutputFormat {
    /// Conversion order
    pub const ALL: [OutputFormat; 4] = [Self::Png, Self::Jpeg, Self::Webp, Self::Ico];

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Webp => "webp",
            Self::Ico => "ico",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// A converted copy written to the uploads directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertedImage {
    pub url: String,
    pub size: u64,
}

/// File stem for converted copies: the client file name without directories
/// or extension, `image` when nothing usable remains
pub fn output_stem(file_name: Option<&str>) -> String {
    file_name
        .map(|name| name.rsplit(['/', '\\']).next().unwrap_or(name))
        .and_then(|name| Path::new(name).file_stem())
        .and_then(|stem| stem.to_str())
        .map(str::trim)
        .filter(|stem| !stem.is_empty() && *stem != "." && *stem != "..")
        .unwrap_or("image")
        .to_string()
}
