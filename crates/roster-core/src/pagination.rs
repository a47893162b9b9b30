//! Pagination types for list operations.

use serde::{Deserialize, Serialize};

/// A request for a window of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    /// The maximum number of items to return.
    pub limit: u32,
    /// The number of items to skip.
    pub offset: u64,
}

impl PageRequest {
    /// The default page size.
    pub const DEFAULT_LIMIT: u32 = 10;
    /// The maximum allowed page size.
    pub const MAX_LIMIT: u32 = 100;

    /// Creates a new page request, clamping the limit to `1..=MAX_LIMIT`.
    #[must_use]
    pub fn new(limit: u32, offset: u64) -> Self {
        Self {
            limit: limit.clamp(1, Self::MAX_LIMIT),
            offset,
        }
    }

    /// Creates a page request for the first page with default size.
    #[must_use]
    pub fn first() -> Self {
        Self::new(Self::DEFAULT_LIMIT, 0)
    }

    /// Returns the limit as a SQL-friendly integer.
    #[must_use]
    pub const fn sql_limit(&self) -> i64 {
        self.limit as i64
    }

    /// Returns the offset as a SQL-friendly integer.
    #[must_use]
    pub fn sql_offset(&self) -> i64 {
        i64::try_from(self.offset).unwrap_or(i64::MAX)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// A page of results together with the total number of items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Page<T> {
    /// The items on this page.
    pub data: Vec<T>,
    /// The total number of items across all pages.
    pub total: u64,
    /// The limit that produced this page.
    pub limit: u32,
    /// The offset that produced this page.
    pub offset: u64,
}

impl<T> Page<T> {
    /// Creates a new page.
    #[must_use]
    pub fn new(data: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            data,
            total,
            limit: request.limit,
            offset: request.offset,
        }
    }

    /// Creates an empty page.
    #[must_use]
    pub fn empty(request: PageRequest) -> Self {
        Self::new(Vec::new(), request, 0)
    }

    /// Maps the page content to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            limit: self.limit,
            offset: self.offset,
        }
    }

    /// Returns true if the page is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if more items exist beyond this page.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.offset + (self.data.len() as u64) < self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_clamps_limit() {
        assert_eq!(PageRequest::new(500, 0).limit, PageRequest::MAX_LIMIT);
        assert_eq!(PageRequest::new(0, 0).limit, 1);
        assert_eq!(PageRequest::new(25, 50).offset, 50);
    }

    #[test]
    fn test_page_request_default() {
        let request = PageRequest::default();
        assert_eq!(request.limit, PageRequest::DEFAULT_LIMIT);
        assert_eq!(request.offset, 0);
        assert_eq!(request.sql_limit(), 10);
        assert_eq!(request.sql_offset(), 0);
    }

    #[test]
    fn test_page_map() {
        let page = Page::new(vec![1, 2, 3], PageRequest::new(3, 0), 10);
        let mapped = page.map(|x| x * 2);
        assert_eq!(mapped.data, vec![2, 4, 6]);
        assert_eq!(mapped.total, 10);
        assert!(mapped.has_more());
    }

    #[test]
    fn test_page_last_window() {
        let page = Page::new(vec![1, 2], PageRequest::new(5, 8), 10);
        assert!(!page.has_more());
        assert_eq!(page.len(), 2);
    }

    #[test]
    fn test_empty_page_serializes_flat() {
        let page: Page<u8> = Page::empty(PageRequest::first());
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["data"], serde_json::json!([]));
        assert_eq!(json["total"], 0);
        assert_eq!(json["limit"], 10);
        assert_eq!(json["offset"], 0);
    }
}
