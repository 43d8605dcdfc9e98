//! Page/perPage validation and application to listing queries
//!
//! Every paged listing runs two statements built from the same filter: a
//! `COUNT(*)` that ignores the window, and the windowed `SELECT`.

use serde::Deserialize;
use shared::response::Pagination;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use thiserror::Error;

/// Per-page used when the request names none
pub const DEFAULT_PER_PAGE: i64 = 15;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaginatorError {
    #[error("per-page bounds must be positive (min {min}, max {max})")]
    NonPositive { min: i64, max: i64 },
    #[error("min per-page {min} exceeds max per-page {max}")]
    Inverted { min: i64, max: i64 },
}

/// Clamp bounds for one family of listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    min_per_page: i64,
    max_per_page: i64,
}

impl Paginator {
    pub fn new(min_per_page: i64, max_per_page: i64) -> Result<Self, PaginatorError> {
        if min_per_page <= 0 || max_per_page <= 0 {
            return Err(PaginatorError::NonPositive {
                min: min_per_page,
                max: max_per_page,
            });
        }
        if min_per_page > max_per_page {
            return Err(PaginatorError::Inverted {
                min: min_per_page,
                max: max_per_page,
            });
        }
        Ok(Self {
            min_per_page,
            max_per_page,
        })
    }

    /// `page` floors at 1; `per_page` is clamped into `[min, max]`.
    pub fn resolve(&self, page: Option<i64>, per_page: Option<i64>) -> PageRequest {
        PageRequest {
            page: page.unwrap_or(1).max(1),
            per_page: per_page
                .unwrap_or(DEFAULT_PER_PAGE)
                .clamp(self.min_per_page, self.max_per_page),
        }
    }
}

/// Query-string page parameters
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// A resolved, in-bounds page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    /// Append `LIMIT/OFFSET` for this window
    pub fn apply(&self, query: &mut QueryBuilder<'_, Sqlite>) {
        query
            .push(" LIMIT ")
            .push_bind(self.per_page)
            .push(" OFFSET ")
            .push_bind(self.offset());
    }

    pub fn pagination(&self, total_count: i64) -> Pagination {
        Pagination::new(self.page, self.per_page, total_count)
    }
}

/// One page of a listing
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }

    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Page<U>, E> {
        Ok(Page {
            items: self.items.into_iter().map(f).collect::<Result<_, _>>()?,
            pagination: self.pagination,
        })
    }
}

/// Shape of a listing statement; the filter appends its own ` WHERE ...`
#[derive(Debug, Clone, Copy)]
pub struct Listing<'a> {
    pub columns: &'a str,
    pub from: &'a str,
    pub order_by: &'a str,
}

/// Run `listing` windowed to `page`, or in full when `page` is `None`.
///
/// The count statement is skipped for unpaged listings and the returned
/// pagination is all-null.
pub async fn fetch_page<T, F>(
    pool: &SqlitePool,
    listing: Listing<'_>,
    filter: F,
    page: Option<PageRequest>,
) -> Result<Page<T>, sqlx::Error>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    F: for<'q> Fn(&mut QueryBuilder<'q, Sqlite>),
{
    let total_count = match page {
        Some(_) => {
            let mut count = QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", listing.from));
            filter(&mut count);
            Some(count.build_query_scalar::<i64>().fetch_one(pool).await?)
        }
        None => None,
    };

    let mut query = QueryBuilder::new(format!(
        "SELECT {} FROM {}",
        listing.columns, listing.from
    ));
    filter(&mut query);
    query.push(" ORDER BY ").push(listing.order_by);
    if let Some(page) = page {
        page.apply(&mut query);
    }
    let items = query.build_query_as::<T>().fetch_all(pool).await?;

    let pagination = match (page, total_count) {
        (Some(page), Some(total)) => page.pagination(total),
        _ => Pagination::unpaged(),
    };
    Ok(Page { items, pagination })
}

/// Filter that matches every row
pub fn no_filter(_: &mut QueryBuilder<'_, Sqlite>) {}
