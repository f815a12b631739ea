//! Offset-based pagination utilities for listing endpoints.

use serde::{Deserialize, Serialize};

/// Default number of rows returned by list endpoints.
pub const DEFAULT_LIMIT: i64 = 20;

/// Upper bound on rows returned by a single list request.
pub const MAX_LIMIT: i64 = 100;

/// Raw pagination query parameters (`?limit=&offset=`).
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Normalized pagination parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub limit: i64,
    pub offset: i64,
}

impl PageParams {
    /// Clamps limit to `1..=MAX_LIMIT` and offset to `>= 0`.
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
            offset: offset.unwrap_or(0).max(0),
        }
    }

    /// Applies the window to an in-memory iterator.
    pub fn apply<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset as usize)
            .take(self.limit as usize)
            .collect()
    }
}

impl Default for PageParams {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl From<PageQuery> for PageParams {
    fn from(query: PageQuery) -> Self {
        Self::new(query.limit, query.offset)
    }
}

/// A page of results with the total row count for the filter.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total: i64, params: PageParams) -> Self {
        Self {
            data,
            total,
            limit: params.limit,
            offset: params.offset,
        }
    }

    /// Converts the rows while keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            limit: self.limit,
            offset: self.offset,
        }
    }
}
