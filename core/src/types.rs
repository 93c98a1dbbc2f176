//! Parameter and result types for the menus API.
//!
//! # Design
//! Response bodies stay untyped (`serde_json::Value`): the client does not
//! own the API's schema. Only the inputs the client itself interprets, the
//! query parameters and the rate-limit headers, get dedicated types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Pagination parameters accepted by every endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl Pagination {
    pub fn new(per_page: Option<u32>, page: Option<u32>) -> Self {
        Self { per_page, page }
    }

    pub fn with_per_page(per_page: u32) -> Self {
        Self {
            per_page: Some(per_page),
            page: None,
        }
    }
}

/// Query parameters for `GET /menus`. Omitted fields are left out of the URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenusFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl MenusFilter {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.per_page, self.page)
    }
}

/// Daily quota counters reported by the `X-Ratelimit-*` response headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimit {
    pub limit: u32,
    pub remaining: u32,
}

/// Outcome of a completed exchange.
///
/// `NoResult` is returned for any status other than 200 and is distinct from
/// a successfully decoded empty body.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    Json(Value),
    NoResult,
}

impl ApiResponse {
    pub fn is_no_result(&self) -> bool {
        matches!(self, ApiResponse::NoResult)
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ApiResponse::Json(value) => Some(value),
            ApiResponse::NoResult => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            ApiResponse::Json(value) => Some(value),
            ApiResponse::NoResult => None,
        }
    }
}
