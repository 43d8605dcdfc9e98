//! Course catalog write and listing

use shared::error::{AppError, ErrorCode};
use shared::models::{Course, CourseSave};
use validator::Validate;

use super::uploads::UploadedFile;
use super::validation_error;
use crate::auth::{Ability, Principal, assert_ability};
use crate::catalog;
use crate::db;
use crate::error::{ServiceError, ServiceResult};
use crate::state::AppState;

pub async fn list_courses(state: &AppState, principal: &Principal) -> ServiceResult<Vec<Course>> {
    assert_ability(principal, Ability::Operator)?;
    Ok(db::courses::list_courses(&state.pool).await?)
}

/// Store uploads, place them into free image slots, then write the course.
///
/// Files are uploaded before the transaction opens; a failed upload aborts
/// the save without touching the database.
pub async fn save_course(
    state: &AppState,
    principal: &Principal,
    data: CourseSave,
    files: Vec<UploadedFile>,
) -> ServiceResult<i64> {
    assert_ability(principal, Ability::Operator)?;
    data.validate().map_err(validation_error)?;

    let mut uploaded = Vec::with_capacity(files.len());
    for file in files {
        uploaded.push(state.uploads.upload(file).await?);
    }
    let slots = catalog::fill_slots(data.images.clone(), uploaded);

    let saved = db::courses::save_course(&state.pool, &data, &slots)
        .await
        .map_err(ServiceError::Transaction)?;

    match saved {
        Some(id) => {
            tracing::info!(
                course_id = id,
                images = slots.iter().flatten().count(),
                ingredients = data.ingredients.len(),
                "Course saved"
            );
            Ok(id)
        }
        None => Err(AppError::new(ErrorCode::CourseNotFound)
            .with_detail("id", data.id)
            .into()),
    }
}

pub async fn remove_course(
    state: &AppState,
    principal: &Principal,
    id: i64,
) -> ServiceResult<()> {
    assert_ability(principal, Ability::Operator)?;
    if id <= 0 {
        return Err(AppError::invalid_request("id must be positive")
            .with_detail("field", "id")
            .into());
    }

    let removed = db::courses::remove_course(&state.pool, id)
        .await
        .map_err(ServiceError::Transaction)?;
    tracing::info!(course_id = id, removed, "Course removed");
    Ok(())
}
