//! Page/limit handling for list endpoints.
//!
//! Both values arrive as free text in the query string. Anything that does
//! not parse as a positive integer falls back to the default instead of
//! failing the request.

/// Page used when `page` is absent or unparseable.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when `limit` is absent or unparseable.
pub const DEFAULT_LIMIT: i64 = 10;

/// A resolved page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Coerce raw query values into a page request.
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            page: parse_positive(page).unwrap_or(DEFAULT_PAGE),
            limit: parse_positive(limit).unwrap_or(DEFAULT_LIMIT),
        }
    }

    /// Number of matching items to skip: `(page - 1) * limit`.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Ceiling of `total / limit`. Zero items means zero pages.
    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            0
        } else {
            total / self.limit + i64::from(total % self.limit != 0)
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

fn parse_positive(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| *n >= 1)
}
