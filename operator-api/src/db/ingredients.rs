//! Ingredient database operations

use shared::models::{Ingredient, IngredientSave, IngredientSort};
use sqlx::SqlitePool;

use super::pagination::{Listing, Page, PageRequest, fetch_page, no_filter};

/// Insert when `data.id` is absent, otherwise update in place.
///
/// Returns `None` when updating an id that matches no row.
pub async fn upsert_ingredient(
    pool: &SqlitePool,
    data: &IngredientSave,
) -> Result<Option<i64>, sqlx::Error> {
    match data.id {
        Some(id) => {
            let rows = sqlx::query(
                "UPDATE ingredients SET title = ?, price = ?, unit = ?, floating = ? WHERE id = ?",
            )
            .bind(&data.title)
            .bind(data.price)
            .bind(&data.unit)
            .bind(data.floating)
            .bind(id)
            .execute(pool)
            .await?
            .rows_affected();
            Ok((rows > 0).then_some(id))
        }
        None => {
            let id: i64 = sqlx::query_scalar(
                "INSERT INTO ingredients (title, price, unit, floating) VALUES (?, ?, ?, ?) RETURNING id",
            )
            .bind(&data.title)
            .bind(data.price)
            .bind(&data.unit)
            .bind(data.floating)
            .fetch_one(pool)
            .await?;
            Ok(Some(id))
        }
    }
}

/// Delete an ingredient and every course amount referencing it.
///
/// Returns `false` when no ingredient has this id.
pub async fn delete_ingredient(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let rows = sqlx::query("DELETE FROM ingredients WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    if rows == 0 {
        return Ok(false);
    }

    sqlx::query("DELETE FROM course_ingredients WHERE ingredient_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(true)
}

/// Ingredients sorted by `sort` (ties broken by id); unpaged when `page` is `None`
pub async fn list_ingredients(
    pool: &SqlitePool,
    sort: IngredientSort,
    descending: bool,
    page: Option<PageRequest>,
) -> Result<Page<Ingredient>, sqlx::Error> {
    let direction = if descending { "DESC" } else { "ASC" };
    let order_by = format!("{} {direction}, id {direction}", sort.column());
    let listing = Listing {
        columns: "id, title, price, unit, floating",
        from: "ingredients",
        order_by: &order_by,
    };
    fetch_page(pool, listing, no_filter, page).await
}
