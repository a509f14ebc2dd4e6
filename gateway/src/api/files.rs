//! File download endpoint
//!
//! Serves raw artifact bytes from the execution service with a content type
//! sniffed from the filename extension. Unknown or ambiguous extensions
//! default to `application/octet-stream`.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;

use crate::api::assistants_error;
use crate::app_state::AppState;

/// Content type for a filename, by extension.
pub fn determine_content_type(filename: &str) -> &'static str {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "json" => "application/json",
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tiff" | "tif" => "image/tiff",
        "webp" => "image/webp",
        "csv" => "text/csv",
        _ => "application/octet-stream",
    }
}

/// Download a generated file artifact.
pub async fn get_file(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> impl IntoResponse {
    let metadata = match state.api().file_metadata(&file_id).await {
        Ok(metadata) => metadata,
        Err(e) => {
            tracing::error!(%file_id, error = %e, "Failed to fetch file metadata");
            return assistants_error(e);
        }
    };

    let content_type = determine_content_type(&metadata.filename);

    let bytes = match state.api().file_bytes(&file_id).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(%file_id, error = %e, "Failed to fetch file bytes");
            return assistants_error(e);
        }
    };

    tracing::info!(%file_id, content_type, size = bytes.len(), "Retrieved file");
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type)],
        bytes,
    )
        .into_response()
}
