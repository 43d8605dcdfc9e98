//! API Response types
//!
//! Write endpoints answer with a status envelope:
//! ```json
//! { "status": "ok", "id": 12 }
//! { "status": "error", "reason": "not_exist", "code": 6101, "message": "Ingredient not found" }
//! { "status": "not-exists" }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::error::AppError;

/// Outcome of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OpStatus {
    Ok,
    Error,
    /// Target of the operation does not exist (answered, not failed)
    NotExists,
}

/// Status envelope for write operations and expected failures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpResult {
    pub status: OpStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl OpResult {
    fn with_status(status: OpStatus) -> Self {
        Self {
            status,
            id: None,
            reason: None,
            code: None,
            message: None,
            details: None,
        }
    }

    pub fn ok() -> Self {
        Self::with_status(OpStatus::Ok)
    }

    pub fn saved(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::ok()
        }
    }

    pub fn not_exists() -> Self {
        Self::with_status(OpStatus::NotExists)
    }

    pub fn error(err: &AppError) -> Self {
        Self {
            reason: Some(err.code.reason().to_string()),
            code: Some(err.code.code()),
            message: Some(err.message.clone()),
            details: err.details.clone(),
            ..Self::with_status(OpStatus::Error)
        }
    }
}

impl axum::response::IntoResponse for OpResult {
    fn into_response(self) -> axum::response::Response {
        axum::Json(self).into_response()
    }
}

/// Pagination metadata
///
/// All fields are null when a listing was requested unpaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Current page number (1-based)
    pub page: Option<i64>,
    /// Items per page
    pub per_page: Option<i64>,
    /// Total number of matching rows, ignoring the page window
    pub total_count: Option<i64>,
}

impl Pagination {
    pub fn new(page: i64, per_page: i64, total_count: i64) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
            total_count: Some(total_count),
        }
    }

    pub fn unpaged() -> Self {
        Self {
            page: None,
            per_page: None,
            total_count: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_ok_serialize() {
        let json = serde_json::to_value(OpResult::ok()).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "ok" }));

        let json = serde_json::to_value(OpResult::saved(12)).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "ok", "id": 12 }));
    }

    #[test]
    fn test_not_exists_serialize() {
        let json = serde_json::to_value(OpResult::not_exists()).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "not-exists" }));
    }

    #[test]
    fn test_error_from_app_error() {
        let err = AppError::with_message(ErrorCode::InvalidRequest, "id must be positive")
            .with_detail("field", "id");
        let result = OpResult::error(&err);

        assert_eq!(result.status, OpStatus::Error);
        assert_eq!(result.reason.as_deref(), Some("bad_request"));
        assert_eq!(result.code, Some(5));
        assert_eq!(result.message.as_deref(), Some("id must be positive"));
        assert!(result.details.unwrap().contains_key("field"));
    }

    #[test]
    fn test_pagination_serialize() {
        let json = serde_json::to_value(Pagination::new(2, 15, 31)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "page": 2, "perPage": 15, "totalCount": 31 })
        );

        let json = serde_json::to_value(Pagination::unpaged()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "page": null, "perPage": null, "totalCount": null })
        );
    }
}
