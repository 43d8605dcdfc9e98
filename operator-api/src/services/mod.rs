//! Operator services
//!
//! Every operation takes the caller's [`Principal`](crate::auth::Principal)
//! and checks its ability before validating input, storing uploads or
//! touching the database.

pub mod courses;
pub mod ingredients;
pub mod orders;
pub mod uploads;
pub mod users;

use serde::Deserialize;
use shared::error::AppError;

/// `{ "id": ... }` request body; a missing id reads as 0 and is rejected
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct IdRequest {
    #[serde(default)]
    pub id: i64,
}

fn validation_error(errors: validator::ValidationErrors) -> AppError {
    let mut err = AppError::validation(format!("Invalid request: {errors}"));
    for field in errors.field_errors().keys() {
        err = err.with_detail(field.to_string(), "invalid");
    }
    err
}
