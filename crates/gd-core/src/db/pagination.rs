//! Pagination and ordering for list queries.
//!
//! Page size defaults to [`DEFAULT_PAGE_SIZE`] and is clamped to
//! [`MAX_PAGE_SIZE`]. Sort columns are resolved against a per-entity
//! whitelist, so the column name that reaches SQL is always one of the
//! repository's own `&'static str` constants.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Maximum allowed items per page.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Pagination options for database queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Page number (1-indexed).
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// Creates a Pagination, clamping `page` to at least 1 and `per_page`
    /// to `1..=MAX_PAGE_SIZE`.
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Creates a Pagination from optional query parameters with defaults.
    pub fn from_query(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self::new(page.unwrap_or(1), per_page.unwrap_or(DEFAULT_PAGE_SIZE))
    }

    pub fn offset(&self) -> u32 {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }

    pub fn limit(&self) -> u32 {
        self.per_page
    }

    /// Number of pages needed for `total_items`, never less than 1.
    pub fn total_pages(&self, total_items: u64) -> u32 {
        if total_items == 0 {
            return 1;
        }
        let per_page = u64::from(self.per_page);
        let pages = total_items.div_ceil(per_page);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for SortOrder {
    type Err = InvalidSort;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ASC" => Ok(SortOrder::Asc),
            "DESC" => Ok(SortOrder::Desc),
            _ => Err(InvalidSort::Order(s.to_string())),
        }
    }
}

/// Rejected ordering parameters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidSort {
    #[error("Não é possível ordenar por '{0}'")]
    Column(String),

    #[error("Ordem inválida '{0}', use ASC ou DESC")]
    Order(String),
}

/// A whitelisted sort column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub column: &'static str,
    pub order: SortOrder,
}

impl Sort {
    /// Resolves a requested column against `allowed`.
    ///
    /// `None` (or an empty string) selects `default`. Unknown columns are
    /// rejected rather than silently replaced.
    pub fn parse(
        requested: Option<&str>,
        order: SortOrder,
        default: &'static str,
        allowed: &[&'static str],
    ) -> Result<Self, InvalidSort> {
        let column = match requested.map(str::trim).filter(|c| !c.is_empty()) {
            None => default,
            Some(name) => allowed
                .iter()
                .copied()
                .find(|candidate| *candidate == name)
                .ok_or_else(|| InvalidSort::Column(name.to_string()))?,
        };
        Ok(Self { column, order })
    }

    /// `ORDER BY` fragment, e.g. `orgao_nome ASC`.
    pub fn to_sql(&self) -> String {
        format!("{} {}", self.column, self.order.as_sql())
    }
}

/// Page and ordering for a repository `list` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    pub pagination: Pagination,
    pub sort: Sort,
}

/// A page of items plus totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    /// Total number of matching items across all pages.
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

impl<T> PaginatedResult<T> {
    pub fn new(items: Vec<T>, total: u64, pagination: &Pagination) -> Self {
        Self {
            items,
            total,
            page: pagination.page,
            per_page: pagination.per_page,
            total_pages: pagination.total_pages(total),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Maps the items to a different type.
    pub fn map<U, F>(self, f: F) -> PaginatedResult<U>
    where
        F: FnMut(T) -> U,
    {
        PaginatedResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            total_pages: self.total_pages,
        }
    }

    /// Maps the items with a fallible function, stopping at the first error.
    pub fn try_map<U, E, F>(self, f: F) -> Result<PaginatedResult<U>, E>
    where
        F: FnMut(T) -> Result<U, E>,
    {
        let items = self.items.into_iter().map(f).collect::<Result<Vec<U>, E>>()?;
        Ok(PaginatedResult {
            items,
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            total_pages: self.total_pages,
        })
    }
}
