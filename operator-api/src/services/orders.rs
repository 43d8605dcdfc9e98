//! Order listing

use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::{OrderStatus, OrderView};

use crate::auth::{Ability, Principal, assert_ability};
use crate::db;
use crate::error::{ServiceError, ServiceResult};
use crate::state::AppState;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListRequest {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    #[serde(default)]
    pub filter: OrderFilter,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderFilter {
    /// Status names; empty means every status
    #[serde(default)]
    pub status: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct OrderList {
    pub data: Vec<OrderView>,
    pub total: i64,
}

pub async fn list_orders(
    state: &AppState,
    principal: &Principal,
    request: OrderListRequest,
) -> ServiceResult<OrderList> {
    assert_ability(principal, Ability::Operator)?;

    let codes = OrderStatus::codes_for_names(&request.filter.status).map_err(|e| {
        AppError::with_message(ErrorCode::UnknownOrderStatus, e.to_string())
            .with_detail("field", "filter.status")
    })?;
    let page = state.order_pages.resolve(request.page, request.per_page);

    let rows = db::orders::list_orders(&state.pool, &codes, page).await?;
    let total = rows.pagination.total_count.unwrap_or_default();
    let views = rows
        .try_map(OrderView::try_from)
        .map_err(|e| ServiceError::Db(Box::new(e)))?;

    Ok(OrderList {
        data: views.items,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::orders::insert_order;
    use crate::services::testing::{driver, operator, state};

    fn request(statuses: &[&str], per_page: Option<i64>) -> OrderListRequest {
        OrderListRequest {
            page: None,
            per_page,
            filter: OrderFilter {
                status: statuses.iter().map(|s| s.to_string()).collect(),
            },
        }
    }

    #[tokio::test]
    async fn test_list_orders_renders_status_names() {
        let (state, _) = state().await;
        insert_order(&state.pool, "Iryna", 1_539_207_714_000, OrderStatus::Delivering.code()).await;
        insert_order(&state.pool, "Petro", 1_539_207_715_000, OrderStatus::Canceled.code()).await;

        let list = list_orders(&state, &operator(), request(&["delivering"], None))
            .await
            .unwrap();
        assert_eq!(list.total, 1);
        assert_eq!(list.data[0].name, "Iryna");
        assert_eq!(list.data[0].status, OrderStatus::Delivering);
        assert_eq!(list.data[0].created_at, "2018-10-10T21:41:54+00:00");
    }

    #[tokio::test]
    async fn test_unknown_status_is_rejected() {
        let (state, _) = state().await;
        let err: AppError = list_orders(&state, &operator(), request(&["lost"], None))
            .await
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::UnknownOrderStatus);
    }

    #[tokio::test]
    async fn test_per_page_is_clamped_to_order_bounds() {
        let (state, _) = state().await;
        for i in 0..7 {
            insert_order(&state.pool, "bulk", i, OrderStatus::New.code()).await;
        }
        let list = list_orders(&state, &operator(), request(&[], Some(1)))
            .await
            .unwrap();
        assert_eq!(list.total, 7);
        assert_eq!(list.data.len(), 5);
    }

    #[tokio::test]
    async fn test_requires_operator() {
        let (state, _) = state().await;
        let err: AppError = list_orders(&state, &driver(), OrderListRequest::default())
            .await
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
    }
}
