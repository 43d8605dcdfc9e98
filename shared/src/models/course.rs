//! Course Model
//!
//! A course is a dish on the menu. It owns an ordered image list and an
//! ingredient → amount map; both are always replaced together on save.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::{Validate, ValidationError};

/// Course row as stored
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CourseRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Price in minor currency units
    pub price: i64,
    pub visible: bool,
}

/// Course ↔ ingredient junction row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CourseIngredientRow {
    pub course_id: i64,
    pub ingredient_id: i64,
    pub amount: f64,
}

/// Course image row; `position` is the slot index at save time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CourseImageRow {
    pub course_id: i64,
    pub position: i64,
    pub src: String,
}

/// Course with its ingredients and images attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
    pub price: i64,
    pub visible: bool,
    /// ingredient id → amount
    pub ingredients: BTreeMap<i64, f64>,
}

impl Course {
    pub fn from_row(
        row: CourseRow,
        ingredients: BTreeMap<i64, f64>,
        images: Vec<String>,
    ) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            images,
            price: row.price,
            visible: row.visible,
            ingredients,
        }
    }
}

/// Save course payload (the `data` part of the multipart request)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CourseSave {
    /// Absent for a new course
    #[serde(default)]
    #[validate(range(min = 1))]
    pub id: Option<i64>,
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 0))]
    pub price: i64,
    #[serde(default)]
    pub visible: bool,
    #[serde(default)]
    #[validate(custom(function = "validate_amounts"))]
    pub ingredients: BTreeMap<i64, f64>,
    /// Sparse slot list; `null` or `""` marks a slot free for an upload
    #[serde(default)]
    pub images: Vec<Option<String>>,
}

fn validate_amounts(amounts: &BTreeMap<i64, f64>) -> Result<(), ValidationError> {
    for (&ingredient_id, &amount) in amounts {
        if ingredient_id <= 0 {
            return Err(ValidationError::new("ingredient_id"));
        }
        if !amount.is_finite() || amount < 0.0 {
            return Err(ValidationError::new("amount"));
        }
    }
    Ok(())
}
