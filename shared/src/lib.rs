//! Shared types for the operator back office
//!
//! Data models, the error code system and response envelopes used by
//! the API crate and its tests.

pub mod error;
pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use axum::Json;
pub use error::{AppError, AppResult, ErrorCode};
pub use http;
pub use response::{OpResult, OpStatus, Pagination};
pub use serde::{Deserialize, Serialize};
