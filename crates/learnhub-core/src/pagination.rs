//! Page-based pagination for list endpoints.
//!
//! List endpoints accept `page` (1-indexed) and `limit` query parameters. Each
//! resource picks its own default page size, so the effective limit is resolved
//! with [`PaginationParams::limit_or`]:
//!
//! - `limit` is clamped to the range [1, 100]
//! - `page` is clamped to [1, `MAX_PAGE`] so the offset cannot overflow
//! - empty strings (`?limit=`) count as absent
//!
//! # Example
//!
//! ```ignore
//! // GET /api/v1/course?page=3&limit=20
//! let limit = params.limit_or(100);   // 20
//! let offset = params.offset(limit);  // 40
//! let meta = PaginationMeta::new(total, limit, params.page());
//! ```

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::serde::deserialize_optional_parse;

pub const MAX_LIMIT: i64 = 100;
/// Largest page number for which `(page - 1) * MAX_LIMIT` fits in an `i64`.
pub const MAX_PAGE: i64 = i64::MAX / MAX_LIMIT;

/// Metadata about a paginated response.
///
/// ```json
/// { "total": 42, "limit": 10, "page": 2, "has_more": true }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    /// Total number of items matching the filters
    pub total: i64,
    /// Page size that was applied
    pub limit: i64,
    /// Current page number
    pub page: i64,
    /// Whether there are more items after this page
    pub has_more: bool,
}

impl PaginationMeta {
    pub fn new(total: i64, limit: i64, page: i64) -> Self {
        Self {
            total,
            limit,
            page,
            has_more: page.saturating_mul(limit) < total,
        }
    }
}

/// Query parameters for pagination.
#[derive(Debug, Clone, Default, Hash, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Items per page (1-100, default depends on the resource)
    #[serde(default, deserialize_with = "deserialize_optional_parse")]
    pub limit: Option<i64>,
    /// Page number (1-indexed, default: 1)
    #[serde(default, deserialize_with = "deserialize_optional_parse")]
    pub page: Option<i64>,
}

impl PaginationParams {
    /// Returns the effective limit, falling back to `default` and clamped to [1, 100].
    #[must_use]
    pub fn limit_or(&self, default: i64) -> i64 {
        self.limit.unwrap_or(default).clamp(1, MAX_LIMIT)
    }

    /// Returns the page number, clamped to [1, `MAX_PAGE`].
    #[must_use]
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).clamp(1, MAX_PAGE)
    }

    /// Rows to skip for the current page at the given page size.
    #[must_use]
    pub fn offset(&self, limit: i64) -> i64 {
        (self.page() - 1).saturating_mul(limit)
    }
}
