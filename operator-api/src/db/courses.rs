//! Course database operations
//!
//! A course row, its ingredient amounts and its image rows are written in a
//! single transaction; children are always replaced wholesale.

use shared::models::{Course, CourseImageRow, CourseIngredientRow, CourseRow, CourseSave};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::collections::{BTreeMap, HashMap};

use super::push_id_list;
use crate::catalog;

/// Every course newest id first, with ingredients and images attached
pub async fn list_courses(pool: &SqlitePool) -> Result<Vec<Course>, sqlx::Error> {
    let rows: Vec<CourseRow> = sqlx::query_as(
        "SELECT id, title, description, price, visible FROM courses ORDER BY id DESC",
    )
    .fetch_all(pool)
    .await?;

    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    if ids.is_empty() {
        return Ok(vec![]);
    }

    let mut query = QueryBuilder::<Sqlite>::new(
        "SELECT course_id, ingredient_id, amount FROM course_ingredients WHERE course_id IN ",
    );
    push_id_list(&mut query, &ids);
    let ingredient_rows: Vec<CourseIngredientRow> =
        query.build_query_as().fetch_all(pool).await?;

    let mut query = QueryBuilder::<Sqlite>::new(
        "SELECT course_id, position, src FROM course_images WHERE course_id IN ",
    );
    push_id_list(&mut query, &ids);
    query.push(" ORDER BY course_id, position, id");
    let image_rows: Vec<CourseImageRow> = query.build_query_as().fetch_all(pool).await?;

    let mut ingredient_map: HashMap<i64, BTreeMap<i64, f64>> = HashMap::new();
    for r in ingredient_rows {
        ingredient_map
            .entry(r.course_id)
            .or_default()
            .insert(r.ingredient_id, r.amount);
    }

    let mut image_map: HashMap<i64, Vec<String>> = HashMap::new();
    for r in image_rows {
        image_map.entry(r.course_id).or_default().push(r.src);
    }

    Ok(rows
        .into_iter()
        .map(|r| {
            let ingredients = ingredient_map.remove(&r.id).unwrap_or_default();
            let images = image_map.remove(&r.id).unwrap_or_default();
            Course::from_row(r, ingredients, images)
        })
        .collect())
}

/// Write a course with its ingredient amounts and its occupied image slots.
///
/// `data.id` selects update over insert. Returns `None` when updating an id
/// that matches no row; the transaction is rolled back in that case.
pub async fn save_course(
    pool: &SqlitePool,
    data: &CourseSave,
    slots: &[Option<String>],
) -> Result<Option<i64>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let id = match data.id {
        Some(id) => {
            sqlx::query("DELETE FROM course_ingredients WHERE course_id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            sqlx::query("DELETE FROM course_images WHERE course_id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            let rows = sqlx::query(
                "UPDATE courses SET title = ?, description = ?, price = ?, visible = ? WHERE id = ?",
            )
            .bind(&data.title)
            .bind(&data.description)
            .bind(data.price)
            .bind(data.visible)
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
            if rows == 0 {
                return Ok(None);
            }
            id
        }
        None => {
            sqlx::query_scalar::<_, i64>(
                "INSERT INTO courses (title, description, price, visible) VALUES (?, ?, ?, ?) RETURNING id",
            )
            .bind(&data.title)
            .bind(&data.description)
            .bind(data.price)
            .bind(data.visible)
            .fetch_one(&mut *tx)
            .await?
        }
    };

    if !data.ingredients.is_empty() {
        let mut query = QueryBuilder::<Sqlite>::new(
            "INSERT INTO course_ingredients (course_id, ingredient_id, amount) ",
        );
        query.push_values(&data.ingredients, |mut row, (&ingredient_id, &amount)| {
            row.push_bind(id).push_bind(ingredient_id).push_bind(amount);
        });
        query.build().execute(&mut *tx).await?;
    }

    let images = catalog::occupied(slots);
    if !images.is_empty() {
        let mut query =
            QueryBuilder::<Sqlite>::new("INSERT INTO course_images (course_id, position, src) ");
        query.push_values(images, |mut row, (position, src)| {
            row.push_bind(id)
                .push_bind(position)
                .push_bind(src.to_string());
        });
        query.build().execute(&mut *tx).await?;
    }

    tx.commit().await?;
    Ok(Some(id))
}

/// Delete a course with its ingredient amounts and images; absent ids are a no-op
pub async fn remove_course(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM course_ingredients WHERE course_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM course_images WHERE course_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let rows = sqlx::query("DELETE FROM courses WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;
    Ok(rows > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn payload(id: Option<i64>, title: &str, ingredients: &[(i64, f64)]) -> CourseSave {
        CourseSave {
            id,
            title: title.to_string(),
            description: "Homemade".to_string(),
            price: 9500,
            visible: true,
            ingredients: ingredients.iter().copied().collect(),
            images: vec![],
        }
    }

    fn filled(items: &[&str]) -> Vec<Option<String>> {
        items.iter().map(|s| Some(s.to_string())).collect()
    }

    async fn count(pool: &SqlitePool, sql: &str) -> i64 {
        sqlx::query_scalar(sql).fetch_one(pool).await.unwrap()
    }

    #[tokio::test]
    async fn test_list_courses_empty() {
        let pool = test_pool().await;
        assert!(list_courses(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_and_list_groups_children() {
        let pool = test_pool().await;
        let borscht = save_course(
            &pool,
            &payload(None, "Borscht", &[(1, 2.5), (2, 1.0)]),
            &[Some("urlA".into()), None, Some("urlB".into())],
        )
        .await
        .unwrap()
        .unwrap();
        let kvass = save_course(&pool, &payload(None, "Kvass", &[]), &[])
            .await
            .unwrap()
            .unwrap();

        let courses = list_courses(&pool).await.unwrap();
        assert_eq!(courses.len(), 2);
        assert_eq!(courses[0].id, kvass);
        assert!(courses[0].ingredients.is_empty());
        assert!(courses[0].images.is_empty());

        assert_eq!(courses[1].id, borscht);
        assert_eq!(courses[1].images, vec!["urlA", "urlB"]);
        assert_eq!(
            courses[1].ingredients,
            BTreeMap::from([(1, 2.5), (2, 1.0)])
        );
    }

    #[tokio::test]
    async fn test_update_replaces_children() {
        let pool = test_pool().await;
        let original = payload(None, "Borscht", &[(1, 2.5), (2, 1.0)]);
        let id = save_course(&pool, &original, &filled(&["a", "b"]))
            .await
            .unwrap()
            .unwrap();

        let changed = payload(Some(id), "Green borscht", &[(3, 0.5)]);
        let saved = save_course(&pool, &changed, &filled(&["c"])).await.unwrap();
        assert_eq!(saved, Some(id));

        let courses = list_courses(&pool).await.unwrap();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].title, "Green borscht");
        assert_eq!(courses[0].ingredients, BTreeMap::from([(3, 0.5)]));
        assert_eq!(courses[0].images, vec!["c"]);
    }

    #[tokio::test]
    async fn test_update_of_missing_course_rolls_back() {
        let pool = test_pool().await;
        let ghost = payload(Some(99), "Ghost", &[(1, 1.0)]);
        let result = save_course(&pool, &ghost, &filled(&["x"])).await.unwrap();
        assert_eq!(result, None);
        assert_eq!(count(&pool, "SELECT COUNT(*) FROM course_ingredients").await, 0);
        assert_eq!(count(&pool, "SELECT COUNT(*) FROM course_images").await, 0);
    }

    #[tokio::test]
    async fn test_failed_image_insert_reverts_everything() {
        let pool = test_pool().await;
        let id = save_course(&pool, &payload(None, "Borscht", &[(1, 2.5)]), &filled(&["a"]))
            .await
            .unwrap()
            .unwrap();

        sqlx::query(
            "CREATE TRIGGER poison_image BEFORE INSERT ON course_images \
             WHEN NEW.src = 'poison' BEGIN SELECT RAISE(ABORT, 'forced failure'); END;",
        )
        .execute(&pool)
        .await
        .unwrap();

        let result = save_course(
            &pool,
            &payload(Some(id), "Changed", &[(7, 9.0), (8, 1.0)]),
            &filled(&["ok", "poison"]),
        )
        .await;
        assert!(result.is_err());

        let courses = list_courses(&pool).await.unwrap();
        assert_eq!(courses[0].title, "Borscht");
        assert_eq!(courses[0].ingredients, BTreeMap::from([(1, 2.5)]));
        assert_eq!(courses[0].images, vec!["a"]);

        let fresh = payload(None, "New", &[(1, 1.0)]);
        let created = save_course(&pool, &fresh, &filled(&["poison"])).await;
        assert!(created.is_err());
        assert_eq!(count(&pool, "SELECT COUNT(*) FROM courses").await, 1);
        assert_eq!(count(&pool, "SELECT COUNT(*) FROM course_ingredients").await, 1);
    }

    #[tokio::test]
    async fn test_remove_course() {
        let pool = test_pool().await;
        let id = save_course(&pool, &payload(None, "Borscht", &[(1, 2.5)]), &filled(&["a"]))
            .await
            .unwrap()
            .unwrap();

        assert!(remove_course(&pool, id).await.unwrap());
        assert!(list_courses(&pool).await.unwrap().is_empty());
        assert_eq!(count(&pool, "SELECT COUNT(*) FROM course_ingredients").await, 0);
        assert_eq!(count(&pool, "SELECT COUNT(*) FROM course_images").await, 0);

        assert!(!remove_course(&pool, id).await.unwrap());
    }
}
