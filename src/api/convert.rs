//! Image conversion endpoint

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use tracing::{debug, warn};

use crate::api::state::AppState;
use crate::api::types::{ApiError, ConvertResponse};
use crate::domain::DomainError;

/// Multipart field carrying the uploaded image
pub const IMAGE_FIELD: &str = "image";

/// POST /convert
pub async fn convert_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ConvertResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| {
        debug!(error = %e, "Rejected convert request");
        ApiError::bad_request("Failed to read image")
    })?;

    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Failed to read image: {}", e)))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read image: {}", e)))?;

        upload = Some((file_name, data));
        break;
    }

    let (file_name, data) = upload.ok_or_else(|| ApiError::bad_request("Failed to read image"))?;

    debug!(file_name = ?file_name, bytes = data.len(), "Received image upload");

    let images = state
        .image_service
        .convert(file_name.as_deref(), data)
        .await
        .map_err(|e| {
            if !matches!(e, DomainError::InvalidRequest { .. }) {
                warn!(error = %e, "Image conversion failed");
            }
            ApiError::from(e)
        })?;

    Ok(Json(ConvertResponse::new(images)))
}

/// Any method other than POST on /convert
pub async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed("Only POST method is allowed")
}
