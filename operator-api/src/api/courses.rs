//! Course catalog endpoints
//!
//! POST /api/operator/courses takes `multipart/form-data`: a `data` part with
//! the course JSON and any number of `files` parts with new images.

use axum::extract::multipart::MultipartError;
use axum::{Extension, Json, extract::Multipart, extract::State};
use shared::error::{AppError, ErrorCode};
use shared::models::{Course, CourseSave};
use shared::response::OpResult;
use serde::Serialize;

use super::ApiResult;
use super::extract::JsonBody;
use crate::auth::Principal;
use crate::services::IdRequest;
use crate::services::courses;
use crate::services::uploads::UploadedFile;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CourseList {
    pub data: Vec<Course>,
}

fn multipart_error(e: MultipartError) -> AppError {
    AppError::with_message(ErrorCode::InvalidRequest, format!("Multipart error: {e}"))
}

/// GET /api/operator/courses
pub async fn list_courses(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<CourseList> {
    let data = courses::list_courses(&state, &principal).await?;
    Ok(Json(CourseList { data }))
}

/// POST /api/operator/courses
pub async fn save_course(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    mut multipart: Multipart,
) -> ApiResult<OpResult> {
    let mut data: Option<CourseSave> = None;
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("data") => {
                let text = field.text().await.map_err(multipart_error)?;
                let parsed = serde_json::from_str(&text).map_err(|e| {
                    AppError::with_message(
                        ErrorCode::InvalidFormat,
                        format!("Invalid course data: {e}"),
                    )
                })?;
                data = Some(parsed);
            }
            Some("files") | Some("files[]") => {
                let file_name = field.file_name().map(|s| s.to_string());
                let bytes = field.bytes().await.map_err(multipart_error)?.to_vec();
                files.push(UploadedFile { file_name, bytes });
            }
            _ => {}
        }
    }

    let data = data.ok_or_else(|| {
        AppError::with_message(ErrorCode::RequiredField, "Missing 'data' field")
            .with_detail("field", "data")
    })?;

    let id = courses::save_course(&state, &principal, data, files).await?;
    Ok(Json(OpResult::saved(id)))
}

/// POST /api/operator/courses/remove
pub async fn remove_course(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    JsonBody(request): JsonBody<IdRequest>,
) -> ApiResult<OpResult> {
    courses::remove_course(&state, &principal, request.id).await?;
    Ok(Json(OpResult::ok()))
}
