//! Success envelope for JSON responses.
//!
//! ```json
//! { "success": true, "message": "Course created", "data": { ... } }
//! { "success": true, "data": [ ... ], "meta": { "total": 3, "limit": 10, "page": 1, "has_more": false } }
//! ```
//!
//! Empty list results carry `"data": []` and a zero total.

use serde::Serialize;
use utoipa::ToSchema;

use crate::pagination::PaginationMeta;

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PaginationMeta>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
            meta: None,
        }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data,
            meta: None,
        }
    }

    pub fn paginated(data: T, meta: PaginationMeta) -> Self {
        Self {
            success: true,
            message: None,
            data,
            meta: Some(meta),
        }
    }
}

/// A page of rows plus its metadata, as returned by list services.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

impl<T> From<Page<T>> for ApiResponse<Vec<T>> {
    fn from(page: Page<T>) -> Self {
        ApiResponse::paginated(page.data, page.meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_omits_optional_fields() {
        let json = serde_json::to_value(ApiResponse::ok(42)).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": 42}));
    }

    #[test]
    fn test_page_conversion_keeps_meta() {
        let page = Page {
            data: vec!["a", "b"],
            meta: PaginationMeta::new(2, 10, 1),
        };
        let json = serde_json::to_value(ApiResponse::from(page)).unwrap();
        assert_eq!(json["data"], serde_json::json!(["a", "b"]));
        assert_eq!(json["meta"]["total"], 2);
        assert_eq!(json["meta"]["has_more"], false);
    }
}
