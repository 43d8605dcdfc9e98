//! Data models
//!
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod course;
pub mod ingredient;
pub mod order;
pub mod storage;
pub mod user;

// Re-exports
pub use course::*;
pub use ingredient::*;
pub use order::*;
pub use storage::*;
pub use user::*;
