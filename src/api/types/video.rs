//! Video download request types

use serde::Deserialize;

/// Query parameters of `GET /download`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DownloadQuery {
    pub url: Option<String>,
}
