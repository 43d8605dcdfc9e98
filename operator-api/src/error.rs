//! Unified service-layer error type
//!
//! `ServiceError` bridges DB-layer errors (`sqlx::Error`, `BoxError`), upload
//! failures and the API-layer error (`AppError`), so services and handlers
//! propagate with `?`.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

use crate::services::uploads::UploadError;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Service-layer error
///
/// - `Db`: database/infrastructure errors (logged, mapped to InternalError)
/// - `Transaction`: a multi-table write failed and was rolled back
/// - `Upload`: storing an uploaded file failed
/// - `App`: business-rule errors (transparent pass-through to client)
#[derive(Debug)]
pub enum ServiceError {
    Db(BoxError),
    Transaction(sqlx::Error),
    Upload(UploadError),
    App(AppError),
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Db(e.into())
    }
}

impl From<BoxError> for ServiceError {
    fn from(e: BoxError) -> Self {
        ServiceError::Db(e)
    }
}

impl From<UploadError> for ServiceError {
    fn from(e: UploadError) -> Self {
        ServiceError::Upload(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Service database error");
                AppError::new(ErrorCode::InternalError)
            }
            ServiceError::Transaction(tx_err) => {
                tracing::error!(error = %tx_err, "Transaction rolled back");
                AppError::new(ErrorCode::TransactionFailed)
            }
            ServiceError::Upload(upload_err) => upload_err.into(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Convenience type alias for service-layer results
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_passes_through() {
        let err: AppError = ServiceError::from(AppError::not_found("Course")).into();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_db_error_is_opaque() {
        let err: AppError = ServiceError::from(sqlx::Error::RowNotFound).into();
        assert_eq!(err.code, ErrorCode::InternalError);
        assert_eq!(err.message, ErrorCode::InternalError.message());
    }

    #[test]
    fn test_transaction_error_maps_to_transaction_failed() {
        let err: AppError = ServiceError::Transaction(sqlx::Error::PoolClosed).into();
        assert_eq!(err.code, ErrorCode::TransactionFailed);
        assert_eq!(err.http_status(), http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_upload_error_maps_to_file_codes() {
        let err: AppError = ServiceError::from(UploadError::Empty).into();
        assert_eq!(err.code, ErrorCode::EmptyFile);
    }
}
