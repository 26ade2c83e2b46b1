//! Video metadata endpoint

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::HeaderName,
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, DownloadQuery};
use crate::domain::SourceUrl;

/// Response header reporting whether the metadata came from the cache
pub const CACHE_STATUS_HEADER: HeaderName = HeaderName::from_static("x-cache");

/// GET /download?url=<source url>
pub async fn download_video(
    State(state): State<AppState>,
    query: Result<Query<DownloadQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let url = query
        .url
        .ok_or_else(|| ApiError::bad_request("Missing video URL"))
        .and_then(|raw| SourceUrl::new(raw).map_err(ApiError::from))?;

    debug!(url = %url, "Fetching video metadata");

    let fetched = state
        .video_service
        .fetch(&url)
        .await
        .map_err(ApiError::from)?;

    Ok((
        [(CACHE_STATUS_HEADER, fetched.cache_status.as_str())],
        Json(fetched.metadata.as_ref()),
    )
        .into_response())
}

/// Any method other than GET on /download
pub async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed("Invalid Request Method")
}
