//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Largest page size a caller may request.
pub const MAX_LIMIT: u64 = 100;

/// Request parameters for paginated queries (limit/offset style).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageRequest {
    /// Maximum number of items to return.
    #[serde(default = "default_limit")]
    pub limit: u64,
    /// Number of items to skip.
    #[serde(default)]
    pub offset: u64,
}

fn default_limit() -> u64 {
    50
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
        }
    }
}

impl PageRequest {
    /// Returns the limit clamped to [`MAX_LIMIT`].
    #[must_use]
    pub fn clamped_limit(&self) -> u64 {
        self.limit.min(MAX_LIMIT)
    }
}

/// A page of results together with the total row count.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Total number of matching rows.
    pub total: u64,
    /// The limit that was applied.
    pub limit: u64,
    /// The offset that was applied.
    pub offset: u64,
}

impl<T> Page<T> {
    /// Creates a new page.
    #[must_use]
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            limit: request.clamped_limit(),
            offset: request.offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_page_request() {
        let req = PageRequest::default();
        assert_eq!(req.limit, 50);
        assert_eq!(req.offset, 0);
    }

    #[test]
    fn test_limit_is_clamped() {
        let req = PageRequest {
            limit: 10_000,
            offset: 0,
        };
        assert_eq!(req.clamped_limit(), MAX_LIMIT);
    }

    #[test]
    fn test_limit_below_cap_is_kept() {
        let req = PageRequest {
            limit: 20,
            offset: 40,
        };
        assert_eq!(req.clamped_limit(), 20);
    }

    #[test]
    fn test_page_new() {
        let req = PageRequest {
            limit: 10,
            offset: 5,
        };
        let page = Page::new(vec![1, 2, 3], 42, req);
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.total, 42);
        assert_eq!(page.limit, 10);
        assert_eq!(page.offset, 5);
    }
}
