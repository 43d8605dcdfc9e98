//! Ingredient endpoints

use axum::{Extension, Json, extract::State};
use shared::models::IngredientSave;
use shared::response::OpResult;

use super::ApiResult;
use super::extract::{JsonBody, QueryParams};
use crate::auth::Principal;
use crate::services::IdRequest;
use crate::services::ingredients::{self, IngredientList, IngredientQuery};
use crate::state::AppState;

/// GET /api/operator/ingredients
pub async fn list_ingredients(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    QueryParams(query): QueryParams<IngredientQuery>,
) -> ApiResult<IngredientList> {
    let list = ingredients::list_ingredients(&state, &principal, query).await?;
    Ok(Json(list))
}

/// POST /api/operator/ingredients
pub async fn save_ingredient(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    JsonBody(data): JsonBody<IngredientSave>,
) -> ApiResult<OpResult> {
    let id = ingredients::save_ingredient(&state, &principal, data).await?;
    Ok(Json(OpResult::saved(id)))
}

/// POST /api/operator/ingredients/delete
pub async fn delete_ingredient(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    JsonBody(request): JsonBody<IdRequest>,
) -> ApiResult<OpResult> {
    ingredients::delete_ingredient(&state, &principal, request.id).await?;
    Ok(Json(OpResult::ok()))
}
