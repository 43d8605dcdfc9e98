//! Ingredient Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Ingredient master row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Ingredient {
    pub id: i64,
    pub title: String,
    /// Price in minor currency units
    pub price: i64,
    pub unit: String,
    /// Whether amounts of this ingredient may be fractional
    pub floating: bool,
}

/// Create/update ingredient payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct IngredientSave {
    /// Absent for a new ingredient
    #[serde(default)]
    #[validate(range(min = 1))]
    pub id: Option<i64>,
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(range(min = 0))]
    pub price: i64,
    #[validate(length(min = 1, max = 32))]
    pub unit: String,
    #[serde(default)]
    pub floating: bool,
}

/// Columns an ingredient listing may be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngredientSort {
    #[default]
    Title,
    Price,
    Unit,
}

impl IngredientSort {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "title" => Some(Self::Title),
            "price" => Some(Self::Price),
            "unit" => Some(Self::Unit),
            _ => None,
        }
    }

    /// Column name; safe to splice into SQL
    pub const fn column(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Price => "price",
            Self::Unit => "unit",
        }
    }
}
