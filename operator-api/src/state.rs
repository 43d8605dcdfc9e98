//! Application state

use shared::error::{AppError, ErrorCode};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::config::Config;
use crate::db;
use crate::db::pagination::{Paginator, PaginatorError};
use crate::db::users::RoleExtensions;
use crate::error::BoxError;
use crate::services::uploads::{LocalUploads, Uploads};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection pool
    pub pool: SqlitePool,
    /// JWT secret for operator authentication
    pub jwt_secret: String,
    /// Where uploaded course images go
    pub uploads: Arc<dyn Uploads>,
    /// Local upload directory, for serving stored files
    pub upload_files: LocalUploads,
    /// Page bounds for the orders listing
    pub order_pages: Paginator,
    /// Page bounds for every other listing
    pub list_pages: Paginator,
    /// Role-specific user data
    pub role_extensions: Arc<RoleExtensions>,
}

fn page_bounds_error(e: PaginatorError) -> AppError {
    AppError::with_message(ErrorCode::ConfigError, format!("Invalid page bounds: {e}"))
}

impl AppState {
    /// Create a new AppState
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let order_pages = Paginator::new(config.min_per_page, config.orders_max_per_page)
            .map_err(page_bounds_error)?;
        let list_pages = Paginator::new(config.min_per_page, config.list_max_per_page)
            .map_err(page_bounds_error)?;

        let pool = db::connect(&config.database_url).await?;

        let upload_files = LocalUploads::new(&config.upload_dir, &config.upload_public_url);
        tracing::info!(dir = %config.upload_dir, "Uploads stored on local disk");

        Ok(Self {
            pool,
            jwt_secret: config.jwt_secret.clone(),
            uploads: Arc::new(upload_files.clone()),
            upload_files,
            order_pages,
            list_pages,
            role_extensions: Arc::new(RoleExtensions::default()),
        })
    }

    #[cfg(test)]
    pub fn for_tests(pool: SqlitePool, uploads: Arc<dyn Uploads>) -> Self {
        Self {
            pool,
            jwt_secret: "test-secret".into(),
            uploads,
            upload_files: LocalUploads::new(std::env::temp_dir(), "/uploads"),
            order_pages: Paginator::new(5, 50).unwrap(),
            list_pages: Paginator::new(5, 100).unwrap(),
            role_extensions: Arc::new(RoleExtensions::default()),
        }
    }
}
