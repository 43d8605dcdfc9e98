//! Storage Model
//!
//! A storage is a kitchen/café location. Cooks are attached to one.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Storage {
    pub id: i64,
    pub name: String,
}
