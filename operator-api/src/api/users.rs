//! User management endpoints

use axum::{Extension, Json, extract::State};
use shared::models::SetUserRoles;
use shared::response::OpResult;

use super::ApiResult;
use super::extract::{JsonBody, PathParam, QueryParams};
use crate::auth::Principal;
use crate::services::users::{self, UserList, UserQuery};
use crate::state::AppState;

/// GET /api/operator/users
pub async fn list_users(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    QueryParams(query): QueryParams<UserQuery>,
) -> ApiResult<UserList> {
    let list = users::list_users(&state, &principal, query).await?;
    Ok(Json(list))
}

/// POST /api/operator/users/{id}/roles
pub async fn set_user_roles(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    PathParam(user_id): PathParam<i64>,
    JsonBody(request): JsonBody<SetUserRoles>,
) -> ApiResult<OpResult> {
    let result = users::set_user_roles(&state, &principal, user_id, request).await?;
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::*;
    use crate::db::storages::insert_storage;
    use crate::db::users::insert_user;
    use crate::services::testing::state;
    use http::StatusCode;

    #[tokio::test]
    async fn test_assign_cook_and_list() {
        let (state, _) = state().await;
        let storage = insert_storage(&state.pool, "Podil").await;
        let user = insert_user(&state.pool, "olena", &["user"]).await;
        let auth = bearer(&state, &["operator"]);

        let body = serde_json::json!({ "roles": ["cook"], "storage_id": storage });
        let uri = format!("/api/operator/users/{user}/roles");
        let response = send(&state, post_json(&uri, &auth, body)).await;
        assert_eq!(json_body(response).await, serde_json::json!({ "status": "ok" }));

        let response = send(&state, get("/api/operator/users?roles=cook", &auth)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let list = json_body(response).await;
        assert_eq!(list["data"][0]["username"], "olena");
        assert_eq!(list["data"][0]["additional"]["storage_id"], storage);
        assert_eq!(list["storages"][0]["name"], "Podil");
        assert_eq!(list["roles"]["cook"], "Кухар");
        assert_eq!(list["meta"]["totalCount"], 1);
    }

    #[tokio::test]
    async fn test_missing_user_is_not_exists() {
        let (state, _) = state().await;
        let auth = bearer(&state, &["operator"]);

        let body = serde_json::json!({ "roles": ["driver"] });
        let response = send(&state, post_json("/api/operator/users/404/roles", &auth, body)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({ "status": "not-exists" })
        );
    }

    #[tokio::test]
    async fn test_non_numeric_user_id_is_bad_request() {
        let (state, _) = state().await;
        let auth = bearer(&state, &["operator"]);

        let body = serde_json::json!({ "roles": ["driver"] });
        let response = send(&state, post_json("/api/operator/users/olena/roles", &auth, body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["reason"], "bad_request");
    }
}
