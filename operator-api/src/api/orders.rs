//! Order listing endpoint

use axum::{Extension, Json, extract::State};

use super::ApiResult;
use super::extract::JsonBody;
use crate::auth::Principal;
use crate::services::orders::{self, OrderList, OrderListRequest};
use crate::state::AppState;

/// POST /api/operator/orders
pub async fn list_orders(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    JsonBody(request): JsonBody<OrderListRequest>,
) -> ApiResult<OrderList> {
    let list = orders::list_orders(&state, &principal, request).await?;
    Ok(Json(list))
}
