//! Pagination extractor.

use roster_core::PageRequest;
use serde::Deserialize;
use utoipa::IntoParams;

/// Query parameters for pagination.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    /// Page size, clamped to 1..=100 (default 10).
    #[serde(default)]
    pub limit: Option<u32>,
    /// Number of people to skip (default 0).
    #[serde(default)]
    pub offset: Option<u64>,
}

impl From<PaginationQuery> for PageRequest {
    fn from(query: PaginationQuery) -> Self {
        PageRequest::new(
            query.limit.unwrap_or(PageRequest::DEFAULT_LIMIT),
            query.offset.unwrap_or(0),
        )
    }
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            limit: Some(PageRequest::DEFAULT_LIMIT),
            offset: Some(0),
        }
    }
}
