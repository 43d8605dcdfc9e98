//! Ingredient master data

use serde::{Deserialize, Deserializer, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::{Ingredient, IngredientSave, IngredientSort};
use shared::response::Pagination;
use validator::Validate;

use super::validation_error;
use crate::auth::{Ability, Principal, assert_ability};
use crate::db;
use crate::error::{ServiceError, ServiceResult};
use crate::state::AppState;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientQuery {
    /// Return every row, unpaged
    #[serde(default, deserialize_with = "flag")]
    pub all: bool,
    pub sort_by: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub descending: bool,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Query flag: set only by the literal `true`, any other value reads as false
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.as_deref() == Some("true"))
}

#[derive(Debug, Serialize)]
pub struct IngredientList {
    pub data: Vec<Ingredient>,
    pub pagination: Pagination,
}

pub async fn list_ingredients(
    state: &AppState,
    principal: &Principal,
    query: IngredientQuery,
) -> ServiceResult<IngredientList> {
    assert_ability(principal, Ability::Operator)?;

    let sort = match query.sort_by.as_deref() {
        None | Some("") => IngredientSort::default(),
        Some(name) => IngredientSort::from_name(name).ok_or_else(|| {
            AppError::invalid_request(format!("Cannot sort ingredients by '{name}'"))
                .with_detail("field", "sortBy")
        })?,
    };
    let page = (!query.all).then(|| state.list_pages.resolve(query.page, query.per_page));

    let result =
        db::ingredients::list_ingredients(&state.pool, sort, query.descending, page).await?;
    Ok(IngredientList {
        data: result.items,
        pagination: result.pagination,
    })
}

pub async fn save_ingredient(
    state: &AppState,
    principal: &Principal,
    data: IngredientSave,
) -> ServiceResult<i64> {
    assert_ability(principal, Ability::Operator)?;
    data.validate().map_err(validation_error)?;

    match db::ingredients::upsert_ingredient(&state.pool, &data).await? {
        Some(id) => {
            tracing::info!(ingredient_id = id, title = %data.title, "Ingredient saved");
            Ok(id)
        }
        None => Err(AppError::new(ErrorCode::IngredientNotFound)
            .with_detail("id", data.id)
            .into()),
    }
}

/// Delete an ingredient together with every course amount that uses it
pub async fn delete_ingredient(
    state: &AppState,
    principal: &Principal,
    id: i64,
) -> ServiceResult<()> {
    assert_ability(principal, Ability::Operator)?;
    if id <= 0 {
        return Err(AppError::invalid_request("id must be positive")
            .with_detail("field", "id")
            .into());
    }

    let deleted = db::ingredients::delete_ingredient(&state.pool, id)
        .await
        .map_err(ServiceError::Transaction)?;
    if !deleted {
        return Err(AppError::new(ErrorCode::IngredientNotFound)
            .with_detail("id", id)
            .into());
    }
    tracing::info!(ingredient_id = id, "Ingredient deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{driver, operator, state};

    fn flour() -> IngredientSave {
        IngredientSave {
            id: None,
            title: "Flour".into(),
            price: 1800,
            unit: "kg".into(),
            floating: true,
        }
    }

    fn error_of<T: std::fmt::Debug>(result: ServiceResult<T>) -> AppError {
        result.unwrap_err().into()
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let (state, _) = state().await;
        let id = save_ingredient(&state, &operator(), flour()).await.unwrap();

        delete_ingredient(&state, &operator(), id).await.unwrap();
        let err = error_of(delete_ingredient(&state, &operator(), id).await);
        assert_eq!(err.code, ErrorCode::IngredientNotFound);
        assert_eq!(err.code.reason(), "not_exist");
    }

    #[tokio::test]
    async fn test_delete_rejects_non_positive_id() {
        let (state, _) = state().await;
        for id in [0, -3] {
            let err = error_of(delete_ingredient(&state, &operator(), id).await);
            assert_eq!(err.code, ErrorCode::InvalidRequest);
            assert_eq!(err.code.reason(), "bad_request");
        }
    }

    #[tokio::test]
    async fn test_list_all_is_unpaged() {
        let (state, _) = state().await;
        for _ in 0..3 {
            save_ingredient(&state, &operator(), flour()).await.unwrap();
        }

        let query = IngredientQuery {
            all: true,
            per_page: Some(5),
            ..Default::default()
        };
        let list = list_ingredients(&state, &operator(), query).await.unwrap();
        assert_eq!(list.data.len(), 3);
        assert_eq!(list.pagination, Pagination::unpaged());

        let paged = list_ingredients(&state, &operator(), IngredientQuery::default())
            .await
            .unwrap();
        assert_eq!(paged.pagination, Pagination::new(1, 15, 3));
    }

    #[tokio::test]
    async fn test_unknown_sort_column() {
        let (state, _) = state().await;
        let query = IngredientQuery {
            sort_by: Some("calories".into()),
            ..Default::default()
        };
        let err = error_of(list_ingredients(&state, &operator(), query).await);
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn test_update_missing_and_forbidden() {
        let (state, _) = state().await;
        let ghost = IngredientSave {
            id: Some(404),
            ..flour()
        };
        let err = error_of(save_ingredient(&state, &operator(), ghost).await);
        assert_eq!(err.code, ErrorCode::IngredientNotFound);

        let err = error_of(save_ingredient(&state, &driver(), flour()).await);
        assert_eq!(err.code, ErrorCode::PermissionDenied);
    }
}
