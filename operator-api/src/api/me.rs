//! Current user endpoint

use axum::{Extension, Json, extract::State};
use shared::models::UserProfile;

use super::ApiResult;
use crate::auth::Principal;
use crate::services::users;
use crate::state::AppState;

/// GET /api/me
pub async fn current_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Option<UserProfile>> {
    let profile = users::current_user(&state, &principal).await?;
    Ok(Json(profile))
}
