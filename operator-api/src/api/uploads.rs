//! Serving stored uploads
//!
//! GET /uploads/{filename}. Names are content hashes, so responses are
//! cacheable forever.

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use http::header;
use shared::error::{AppError, ErrorCode};

use crate::state::AppState;

pub async fn serve_upload(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let path = state
        .upload_files
        .resolve(&filename)
        .ok_or_else(|| AppError::not_found("Upload"))?;

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::not_found("Upload"));
        }
        Err(e) => {
            tracing::error!(file = %filename, error = %e, "Failed to read upload");
            return Err(AppError::new(ErrorCode::FileStorageFailed));
        }
    };

    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    Ok((
        [
            (header::CONTENT_TYPE, mime.to_string()),
            (
                header::CACHE_CONTROL,
                "public, max-age=31536000, immutable".to_string(),
            ),
        ],
        bytes,
    )
        .into_response())
}
