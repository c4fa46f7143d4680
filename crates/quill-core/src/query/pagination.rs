//! Page-based pagination and result envelopes.

use serde::Serialize;
use utoipa::ToSchema;

use super::QueryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    /// `(page - 1) * limit`
    pub skip: u64,
    /// Whether the client asked for a page explicitly. Only explicit pages
    /// are checked against the total count.
    pub explicit_page: bool,
}

impl Pagination {
    pub fn new(page: u64, limit: u64, explicit_page: bool) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);

        Self {
            page,
            limit,
            skip: (page - 1).saturating_mul(limit),
            explicit_page,
        }
    }

    pub fn ensure_in_range(&self, total: u64) -> Result<(), QueryError> {
        if self.explicit_page && self.skip >= total {
            return Err(QueryError::PageOutOfRange {
                page: self.page,
                skip: self.skip,
                total,
            });
        }
        Ok(())
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit)
    }
}

/// Coerces a raw numeric parameter. Values that are missing, not finite
/// numbers, or below 1 after truncation resolve to `default`.
pub fn coerce_positive(raw: Option<&str>, default: u64) -> u64 {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .map(f64::trunc)
        .filter(|v| *v >= 1.0)
        .map(|v| v as u64)
        .unwrap_or(default)
}

/// A page of results with its position in the full result set.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultPage<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> ResultPage<T> {
    pub fn map<U, F>(self, f: F) -> ResultPage<U>
    where
        F: FnMut(T) -> U,
    {
        ResultPage {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }
}
