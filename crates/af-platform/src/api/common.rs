//! Shared API Types

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Machine-readable code, e.g. "NOT_FOUND".
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Page-based pagination query parameters.
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
pub struct PaginationParams {
    /// 1-based page number (default 1).
    pub page: Option<i64>,
    /// Items per page (default 20, max 100).
    pub page_size: Option<i64>,
}

impl PaginationParams {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn page_size(&self) -> i64 {
        self.page_size.unwrap_or(20).clamp(1, 100)
    }

    pub fn limit(&self) -> i64 {
        self.page_size()
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.page_size()
    }
}

/// A page of results plus the total count.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total: i64, params: &PaginationParams) -> Self {
        Self {
            items,
            total,
            page: params.page(),
            page_size: params.page_size(),
        }
    }
}

/// Generic acknowledgement body.
#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

impl SuccessResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_and_caps() {
        let params = PaginationParams {
            page: None,
            page_size: None,
        };
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 20);
        assert_eq!(params.offset(), 0);

        let params = PaginationParams {
            page: Some(3),
            page_size: Some(500),
        };
        assert_eq!(params.limit(), 100);
        assert_eq!(params.offset(), 200);

        let params = PaginationParams {
            page: Some(0),
            page_size: Some(0),
        };
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 1);
    }
}
