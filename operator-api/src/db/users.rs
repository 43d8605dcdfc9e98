//! User database operations
//!
//! Some roles carry extra per-user data in their own table. Each such role
//! registers a [`RoleExtension`]; listings attach that data with one batched
//! query per extension, and role assignment writes it in the same
//! transaction as the role set.

use async_trait::async_trait;
use serde_json::{Map, Value};
use shared::models::{Role, SetUserRoles, UserRow, UserView};
use sqlx::types::Json;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use std::collections::HashMap;

use super::pagination::{Listing, Page, PageRequest, fetch_page};
use super::{push_id_list, storages};

/// Role-specific data stored beside the user row
#[async_trait]
pub trait RoleExtension: Send + Sync {
    fn role(&self) -> Role;

    /// Extension data for each of `user_ids`, all of which hold the role
    async fn load(
        &self,
        pool: &SqlitePool,
        user_ids: &[i64],
    ) -> Result<HashMap<i64, Map<String, Value>>, sqlx::Error>;

    /// Persist the extension for a user who now holds the role
    async fn save(
        &self,
        conn: &mut SqliteConnection,
        user_id: i64,
        request: &SetUserRoles,
    ) -> Result<(), sqlx::Error>;

    /// Drop the extension for a user who no longer holds the role
    async fn clear(&self, conn: &mut SqliteConnection, user_id: i64) -> Result<(), sqlx::Error>;
}

/// Cooks belong to a storage (`storage_id`, null when unassigned)
pub struct CookExtension;

#[async_trait]
impl RoleExtension for CookExtension {
    fn role(&self) -> Role {
        Role::Cook
    }

    async fn load(
        &self,
        pool: &SqlitePool,
        user_ids: &[i64],
    ) -> Result<HashMap<i64, Map<String, Value>>, sqlx::Error> {
        let mut query =
            QueryBuilder::<Sqlite>::new("SELECT user_id, storage_id FROM cooks WHERE user_id IN ");
        push_id_list(&mut query, user_ids);
        let rows: Vec<(i64, Option<i64>)> = query.build_query_as().fetch_all(pool).await?;
        let storage_by_user: HashMap<i64, Option<i64>> = rows.into_iter().collect();

        Ok(user_ids
            .iter()
            .map(|&user_id| {
                let storage_id = storage_by_user.get(&user_id).copied().flatten();
                let mut data = Map::new();
                data.insert("storage_id".to_string(), Value::from(storage_id));
                (user_id, data)
            })
            .collect())
    }

    async fn save(
        &self,
        conn: &mut SqliteConnection,
        user_id: i64,
        request: &SetUserRoles,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO cooks (user_id, storage_id) VALUES (?, ?) \
             ON CONFLICT (user_id) DO UPDATE SET storage_id = excluded.storage_id",
        )
        .bind(user_id)
        .bind(request.storage_id)
        .execute(conn)
        .await?;
        Ok(())
    }

    async fn clear(&self, conn: &mut SqliteConnection, user_id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM cooks WHERE user_id = ?")
            .bind(user_id)
            .execute(conn)
            .await?;
        Ok(())
    }
}

/// Extensions keyed by the role they belong to
pub struct RoleExtensions {
    extensions: Vec<Box<dyn RoleExtension>>,
}

impl RoleExtensions {
    pub fn new(extensions: Vec<Box<dyn RoleExtension>>) -> Self {
        Self { extensions }
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn RoleExtension> {
        self.extensions.iter().map(|e| e.as_ref())
    }
}

impl Default for RoleExtensions {
    fn default() -> Self {
        Self::new(vec![Box::new(CookExtension)])
    }
}

const USER_LISTING: Listing<'static> = Listing {
    columns: "id, username, email, phone, avatar, roles",
    from: "users",
    order_by: "id DESC",
};

/// Users holding any of `roles` (all users when empty), newest first
pub async fn list_users(
    pool: &SqlitePool,
    extensions: &RoleExtensions,
    roles: &[Role],
    page: PageRequest,
) -> Result<Page<UserView>, sqlx::Error> {
    let rows: Page<UserRow> = fetch_page(
        pool,
        USER_LISTING,
        |query: &mut QueryBuilder<'_, Sqlite>| {
            if roles.is_empty() {
                return;
            }
            query.push(
                " WHERE EXISTS (SELECT 1 FROM json_each(users.roles) WHERE json_each.value IN (",
            );
            let mut names = query.separated(", ");
            for role in roles {
                names.push_bind(role.name());
            }
            names.push_unseparated("))");
        },
        Some(page),
    )
    .await?;

    let mut extra: HashMap<i64, Map<String, Value>> = HashMap::new();
    for extension in extensions.iter() {
        let holders: Vec<i64> = rows
            .items
            .iter()
            .filter(|u| u.has_role(extension.role()))
            .map(|u| u.id)
            .collect();
        if holders.is_empty() {
            continue;
        }
        for (user_id, data) in extension.load(pool, &holders).await? {
            extra.entry(user_id).or_default().extend(data);
        }
    }

    Ok(rows.map(|row| {
        let additional = extra.remove(&row.id).unwrap_or_default();
        UserView {
            additional,
            ..UserView::from(row)
        }
    }))
}

pub async fn find_user(pool: &SqlitePool, id: i64) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as("SELECT id, username, email, phone, avatar, roles FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Result of a role assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetRolesOutcome {
    Updated,
    UserNotFound,
    StorageNotFound,
}

/// Replace a user's roles and their extension rows in one transaction.
///
/// The stored set always starts with `user`, followed by the requested
/// roles in display order without duplicates.
pub async fn set_user_roles(
    pool: &SqlitePool,
    extensions: &RoleExtensions,
    user_id: i64,
    roles: &[Role],
    request: &SetUserRoles,
) -> Result<SetRolesOutcome, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        return Ok(SetRolesOutcome::UserNotFound);
    }

    if let Some(storage_id) = request.storage_id
        && roles.contains(&Role::Cook)
        && !storages::storage_exists(&mut tx, storage_id).await?
    {
        return Ok(SetRolesOutcome::StorageNotFound);
    }

    let stored: Vec<&str> = std::iter::once(Role::User)
        .chain(Role::ASSIGNABLE.into_iter().filter(|r| roles.contains(r)))
        .map(|r| r.name())
        .collect();
    sqlx::query("UPDATE users SET roles = ? WHERE id = ?")
        .bind(Json(&stored))
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    for extension in extensions.iter() {
        if roles.contains(&extension.role()) {
            extension.save(&mut tx, user_id, request).await?;
        } else {
            extension.clear(&mut tx, user_id).await?;
        }
    }

    tx.commit().await?;
    tracing::info!(user_id, roles = ?stored, "User roles updated");
    Ok(SetRolesOutcome::Updated)
}

#[cfg(test)]
pub(crate) async fn insert_user(pool: &SqlitePool, username: &str, roles: &[&str]) -> i64 {
    sqlx::query_scalar("INSERT INTO users (username, email, roles) VALUES (?, ?, ?) RETURNING id")
        .bind(username)
        .bind(format!("{username}@example.com"))
        .bind(Json(roles))
        .fetch_one(pool)
        .await
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::storages::insert_storage;
    use crate::db::test_pool;

    fn page() -> PageRequest {
        PageRequest {
            page: 1,
            per_page: 50,
        }
    }

    fn request(roles: &[&str], storage_id: Option<i64>) -> SetUserRoles {
        SetUserRoles {
            roles: roles.iter().map(|r| r.to_string()).collect(),
            storage_id,
        }
    }

    #[tokio::test]
    async fn test_role_filter_is_an_or() {
        let pool = test_pool().await;
        let driver = insert_user(&pool, "driver", &["user", "driver"]).await;
        let cook = insert_user(&pool, "cook", &["user", "cook"]).await;
        let both = insert_user(&pool, "both", &["user", "driver", "cook"]).await;
        insert_user(&pool, "plain", &["user"]).await;
        insert_user(&pool, "stats", &["user", "stats"]).await;

        let result = list_users(
            &pool,
            &RoleExtensions::default(),
            &[Role::Driver, Role::Cook],
            page(),
        )
        .await
        .unwrap();

        let mut ids: Vec<i64> = result.items.iter().map(|u| u.id).collect();
        ids.sort();
        assert_eq!(ids, vec![driver, cook, both]);
        assert_eq!(result.pagination.total_count, Some(3));
    }

    #[tokio::test]
    async fn test_empty_filter_lists_everyone() {
        let pool = test_pool().await;
        insert_user(&pool, "a", &["user"]).await;
        insert_user(&pool, "b", &["user", "operator"]).await;

        let result = list_users(&pool, &RoleExtensions::default(), &[], page())
            .await
            .unwrap();
        assert_eq!(result.items.len(), 2);
        assert_eq!(result.items[0].username, "b");
    }

    #[tokio::test]
    async fn test_cook_extension_attaches_storage() {
        let pool = test_pool().await;
        let storage = insert_storage(&pool, "Podil").await;
        let assigned = insert_user(&pool, "assigned", &["user", "cook"]).await;
        let unassigned = insert_user(&pool, "unassigned", &["user", "cook"]).await;
        let driver = insert_user(&pool, "driver", &["user", "driver"]).await;
        sqlx::query("INSERT INTO cooks (user_id, storage_id) VALUES (?, ?)")
            .bind(assigned)
            .bind(storage)
            .execute(&pool)
            .await
            .unwrap();

        let result = list_users(&pool, &RoleExtensions::default(), &[], page())
            .await
            .unwrap();
        let by_id: HashMap<i64, &UserView> = result.items.iter().map(|u| (u.id, u)).collect();

        assert_eq!(by_id[&assigned].additional["storage_id"], Value::from(storage));
        assert_eq!(by_id[&unassigned].additional["storage_id"], Value::Null);
        assert!(by_id[&driver].additional.is_empty());
    }

    #[tokio::test]
    async fn test_set_roles_writes_roles_and_extension() {
        let pool = test_pool().await;
        let storage = insert_storage(&pool, "Obolon").await;
        let user = insert_user(&pool, "olena", &["user"]).await;
        let extensions = RoleExtensions::default();

        let outcome = set_user_roles(
            &pool,
            &extensions,
            user,
            &[Role::Cook, Role::Driver, Role::Cook],
            &request(&["cook", "driver", "cook"], Some(storage)),
        )
        .await
        .unwrap();
        assert_eq!(outcome, SetRolesOutcome::Updated);

        let row = find_user(&pool, user).await.unwrap().unwrap();
        assert_eq!(row.roles, vec!["user", "driver", "cook"]);
        let storage_id: Option<i64> =
            sqlx::query_scalar("SELECT storage_id FROM cooks WHERE user_id = ?")
                .bind(user)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(storage_id, Some(storage));

        set_user_roles(&pool, &extensions, user, &[Role::Driver], &request(&["driver"], None))
            .await
            .unwrap();
        let cooks: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cooks")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(cooks, 0);
    }

    #[tokio::test]
    async fn test_set_roles_reports_missing_targets() {
        let pool = test_pool().await;
        let extensions = RoleExtensions::default();

        let outcome = set_user_roles(&pool, &extensions, 404, &[Role::Driver], &request(&["driver"], None))
            .await
            .unwrap();
        assert_eq!(outcome, SetRolesOutcome::UserNotFound);

        let user = insert_user(&pool, "taras", &["user"]).await;
        let outcome = set_user_roles(&pool, &extensions, user, &[Role::Cook], &request(&["cook"], Some(404)))
            .await
            .unwrap();
        assert_eq!(outcome, SetRolesOutcome::StorageNotFound);

        let row = find_user(&pool, user).await.unwrap().unwrap();
        assert_eq!(row.roles, vec!["user"]);
    }
}
