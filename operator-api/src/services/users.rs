//! User listing and role assignment

use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::{Role, SetUserRoles, Storage, UserProfile, UserView};
use shared::response::{OpResult, Pagination};
use std::collections::BTreeMap;

use crate::auth::{Ability, Principal, assert_ability};
use crate::db;
use crate::db::users::SetRolesOutcome;
use crate::error::{ServiceError, ServiceResult};
use crate::state::AppState;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    /// Comma-separated role names; a user matches when holding any of them
    pub roles: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListMeta {
    pub total_count: i64,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct UserList {
    pub storages: Vec<Storage>,
    /// role name → label
    pub roles: BTreeMap<&'static str, &'static str>,
    pub data: Vec<UserView>,
    pub meta: UserListMeta,
}

fn parse_role(name: &str) -> Result<Role, AppError> {
    Role::from_name(name).ok_or_else(|| {
        AppError::with_message(ErrorCode::UnknownRole, format!("Unknown role '{name}'"))
            .with_detail("role", name)
    })
}

pub async fn list_users(
    state: &AppState,
    principal: &Principal,
    query: UserQuery,
) -> ServiceResult<UserList> {
    assert_ability(principal, Ability::Operator)?;

    let roles = query
        .roles
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(parse_role)
        .collect::<Result<Vec<_>, _>>()?;
    let page = state.list_pages.resolve(query.page, query.per_page);

    let users = db::users::list_users(&state.pool, &state.role_extensions, &roles, page).await?;
    let storages = db::storages::list_storages(&state.pool).await?;

    Ok(UserList {
        storages,
        roles: Role::labels(),
        meta: UserListMeta {
            total_count: users.pagination.total_count.unwrap_or_default(),
            pagination: users.pagination,
        },
        data: users.items,
    })
}

/// Replace a user's roles; a missing user is answered with `not-exists`
pub async fn set_user_roles(
    state: &AppState,
    principal: &Principal,
    user_id: i64,
    request: SetUserRoles,
) -> ServiceResult<OpResult> {
    assert_ability(principal, Ability::Operator)?;

    let roles = request
        .roles
        .iter()
        .map(|name| parse_role(name))
        .collect::<Result<Vec<_>, _>>()?;

    let outcome = db::users::set_user_roles(
        &state.pool,
        &state.role_extensions,
        user_id,
        &roles,
        &request,
    )
    .await
    .map_err(ServiceError::Transaction)?;

    match outcome {
        SetRolesOutcome::Updated => Ok(OpResult::ok()),
        SetRolesOutcome::UserNotFound => Ok(OpResult::not_exists()),
        SetRolesOutcome::StorageNotFound => Err(AppError::new(ErrorCode::StorageNotFound)
            .with_detail("storage_id", request.storage_id)
            .into()),
    }
}

/// Profile of the caller, `None` when the account no longer exists
pub async fn current_user(
    state: &AppState,
    principal: &Principal,
) -> ServiceResult<Option<UserProfile>> {
    let row = db::users::find_user(&state.pool, principal.user_id).await?;
    Ok(row.map(UserProfile::from))
}
