//! Storage (kitchen location) lookups

use shared::models::Storage;
use sqlx::{SqliteConnection, SqlitePool};

pub async fn list_storages(pool: &SqlitePool) -> Result<Vec<Storage>, sqlx::Error> {
    sqlx::query_as("SELECT id, name FROM storages ORDER BY name, id")
        .fetch_all(pool)
        .await
}

pub async fn storage_exists(conn: &mut SqliteConnection, id: i64) -> Result<bool, sqlx::Error> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM storages WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(found.is_some())
}

#[cfg(test)]
pub(crate) async fn insert_storage(pool: &SqlitePool, name: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO storages (name) VALUES (?) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn test_list_and_lookup() {
        let pool = test_pool().await;
        let podil = insert_storage(&pool, "Podil").await;
        insert_storage(&pool, "Obolon").await;

        let names: Vec<_> = list_storages(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Obolon", "Podil"]);

        let mut conn = pool.acquire().await.unwrap();
        assert!(storage_exists(&mut conn, podil).await.unwrap());
        assert!(!storage_exists(&mut conn, 404).await.unwrap());
    }
}
