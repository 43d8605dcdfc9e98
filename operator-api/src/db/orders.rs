//! Order listing

use shared::models::OrderRow;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::pagination::{Listing, Page, PageRequest, fetch_page};

const ORDER_LISTING: Listing<'static> = Listing {
    columns: "id, contact_name, phone, created_at, price, status, address, latitude, longitude, driver_id",
    from: "orders",
    order_by: "created_at DESC, id DESC",
};

/// Orders newest first, restricted to `status_codes` when non-empty
pub async fn list_orders(
    pool: &SqlitePool,
    status_codes: &[i64],
    page: PageRequest,
) -> Result<Page<OrderRow>, sqlx::Error> {
    fetch_page(
        pool,
        ORDER_LISTING,
        |query: &mut QueryBuilder<'_, Sqlite>| {
            if status_codes.is_empty() {
                return;
            }
            query.push(" WHERE status IN (");
            let mut codes = query.separated(", ");
            for &code in status_codes {
                codes.push_bind(code);
            }
            codes.push_unseparated(")");
        },
        Some(page),
    )
    .await
}

#[cfg(test)]
pub(crate) async fn insert_order(
    pool: &SqlitePool,
    contact_name: &str,
    created_at: i64,
    status: i64,
) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO orders (contact_name, phone, created_at, price, status, address) \
         VALUES (?, '+380000000000', ?, 250.5, ?, 'Khreshchatyk 1') RETURNING id",
    )
    .bind(contact_name)
    .bind(created_at)
    .bind(status)
    .fetch_one(pool)
    .await
    .unwrap()
}
