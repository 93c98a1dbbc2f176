//! Request builder, executor and response parser for the menus API.
//!
//! # Design
//! Every endpoint is split into a pure `build_*` method that produces an
//! `HttpRequest` and a shared `parse_response` that consumes an
//! `HttpResponse`. The public `get_*` methods glue the two together through
//! the client's `Transport`, one GET per call.
//!
//! The only state carried between calls is the last observed `RateLimit`.
//! Both counters are read from the same response and stored together.

use tracing::{debug, warn};

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport, UreqTransport};
use crate::params::{paramify, paramify_pages};
use crate::types::{ApiResponse, MenusFilter, Pagination, RateLimit};

/// Public endpoint of the What's on the Menu API.
pub const DEFAULT_BASE_URL: &str = "http://api.menus.nypl.org/";

pub const RATELIMIT_LIMIT_HEADER: &str = "X-Ratelimit-Limit";
pub const RATELIMIT_REMAINING_HEADER: &str = "X-Ratelimit-Remaining";

/// `min_year` used by the rate-limit probe; no menu matches it, so the
/// response body stays small.
const RATE_LIMIT_PROBE_YEAR: i32 = 9999;

/// Synchronous client for the menus API.
///
/// Mutating methods take `&mut self` because every exchange overwrites the
/// cached rate limit.
#[derive(Debug, Clone)]
pub struct MenusClient<T = UreqTransport> {
    base_url: String,
    token: String,
    transport: T,
    rate_limit: Option<RateLimit>,
}

impl MenusClient<UreqTransport> {
    /// Client for the public API using a default `ureq` agent.
    pub fn new(token: &str) -> Self {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(token: &str, base_url: &str) -> Self {
        Self::with_transport(token, base_url, UreqTransport::new())
    }
}

impl<T: Transport> MenusClient<T> {
    pub fn with_transport(token: &str, base_url: &str, transport: T) -> Self {
        Self {
            base_url: format!("{}/", base_url.trim_end_matches('/')),
            token: token.to_string(),
            transport,
            rate_limit: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Rate limit seen on the most recent exchange, without touching the
    /// network.
    pub fn cached_rate_limit(&self) -> Option<RateLimit> {
        self.rate_limit
    }

    // -----------------------------------------------------------------------
    // Request building
    // -----------------------------------------------------------------------

    /// Build the GET for `method` with an already assembled `&k=v` fragment.
    pub fn build_request(&self, method: &str, params: &str) -> HttpRequest {
        HttpRequest {
            url: format!("{}{method}?token={}{params}", self.base_url, self.token),
            headers: vec![("accept".to_string(), "application/json".to_string())],
        }
    }

    pub fn build_get_menus(&self, filter: &MenusFilter) -> HttpRequest {
        self.build_request("menus", &menus_params(filter))
    }

    pub fn build_get_menus_id(&self, id: u64, pages: Pagination) -> HttpRequest {
        self.build_request(&format!("menus/{id}"), &pages_params(pages))
    }

    pub fn build_get_menus_id_pages(&self, id: u64, pages: Pagination) -> HttpRequest {
        self.build_request(&format!("menus/{id}/pages"), &pages_params(pages))
    }

    pub fn build_get_menus_id_dishes(&self, id: u64, pages: Pagination) -> HttpRequest {
        self.build_request(&format!("menus/{id}/dishes"), &pages_params(pages))
    }

    pub fn build_get_dishes_search(&self, query: &str, pages: Pagination) -> HttpRequest {
        self.build_request("dishes/search", &dishes_search_params(query, pages))
    }

    // -----------------------------------------------------------------------
    // Response parsing
    // -----------------------------------------------------------------------

    /// Record the rate-limit headers, then decode a 200 body.
    ///
    /// Headers are required on every response; if either is missing or
    /// malformed the cached rate limit is left untouched.
    pub fn parse_response(&mut self, response: HttpResponse) -> Result<ApiResponse, ApiError> {
        let rate_limit = read_rate_limit(&response)?;
        self.rate_limit = Some(rate_limit);
        debug!(
            status = response.status,
            limit = rate_limit.limit,
            remaining = rate_limit.remaining,
            "menus API response"
        );

        if response.status != 200 {
            warn!(status = response.status, "menus API returned no result");
            return Ok(ApiResponse::NoResult);
        }

        let value = serde_json::from_str(&response.body)?;
        Ok(ApiResponse::Json(value))
    }

    // -----------------------------------------------------------------------
    // Execution
    // -----------------------------------------------------------------------

    /// Perform exactly one GET against `method` and parse the response.
    pub fn call(&mut self, method: &str, params: &str) -> Result<ApiResponse, ApiError> {
        let request = self.build_request(method, params);
        self.execute(request)
    }

    fn execute(&mut self, request: HttpRequest) -> Result<ApiResponse, ApiError> {
        debug!(url = %redact_token(&request.url), "GET");
        let response = self.transport.get(&request)?;
        self.parse_response(response)
    }

    /// `GET /menus`
    pub fn get_menus(&mut self, filter: &MenusFilter) -> Result<ApiResponse, ApiError> {
        let request = self.build_get_menus(filter);
        self.execute(request)
    }

    /// `GET /menus/{id}`
    pub fn get_menus_id(&mut self, id: u64, pages: Pagination) -> Result<ApiResponse, ApiError> {
        let request = self.build_get_menus_id(id, pages);
        self.execute(request)
    }

    /// `GET /menus/{id}/pages`
    pub fn get_menus_id_pages(
        &mut self,
        id: u64,
        pages: Pagination,
    ) -> Result<ApiResponse, ApiError> {
        let request = self.build_get_menus_id_pages(id, pages);
        self.execute(request)
    }

    /// `GET /menus/{id}/dishes`
    pub fn get_menus_id_dishes(
        &mut self,
        id: u64,
        pages: Pagination,
    ) -> Result<ApiResponse, ApiError> {
        let request = self.build_get_menus_id_dishes(id, pages);
        self.execute(request)
    }

    /// `GET /dishes/search`. An empty `query` is sent without the parameter.
    pub fn get_dishes_search(
        &mut self,
        query: &str,
        pages: Pagination,
    ) -> Result<ApiResponse, ApiError> {
        let request = self.build_get_dishes_search(query, pages);
        self.execute(request)
    }

    // -----------------------------------------------------------------------
    // Rate limit
    // -----------------------------------------------------------------------

    /// Daily rate limit and how many calls the token has left.
    ///
    /// On a cold client this issues one probe `GET /menus?min_year=9999` to
    /// populate the cache. Once populated the cached value is returned as is;
    /// it only changes as a side effect of other calls.
    pub fn rate_limit(&mut self) -> Result<RateLimit, ApiError> {
        if let Some(rate_limit) = self.rate_limit {
            return Ok(rate_limit);
        }
        let probe = MenusFilter {
            min_year: Some(RATE_LIMIT_PROBE_YEAR),
            ..MenusFilter::default()
        };
        self.get_menus(&probe)?;
        self.rate_limit
            .ok_or(ApiError::MissingHeader(RATELIMIT_LIMIT_HEADER))
    }

    /// Calls the token has left today.
    pub fn rate_limit_remaining(&mut self) -> Result<u32, ApiError> {
        Ok(self.rate_limit()?.remaining)
    }
}

fn pages_params(pages: Pagination) -> String {
    paramify_pages(pages.per_page, pages.page)
}

fn menus_params(filter: &MenusFilter) -> String {
    let params = pages_params(filter.pagination());
    let params = paramify(params, "min_year", filter.min_year);
    let params = paramify(params, "max_year", filter.max_year);
    let params = paramify(params, "sort_by", filter.sort_by.as_deref());
    paramify(params, "status", filter.status.as_deref())
}

fn dishes_search_params(query: &str, pages: Pagination) -> String {
    paramify(pages_params(pages), "query", Some(query))
}

fn read_rate_limit(response: &HttpResponse) -> Result<RateLimit, ApiError> {
    Ok(RateLimit {
        limit: read_counter(response, RATELIMIT_LIMIT_HEADER)?,
        remaining: read_counter(response, RATELIMIT_REMAINING_HEADER)?,
    })
}

fn read_counter(response: &HttpResponse, name: &'static str) -> Result<u32, ApiError> {
    let value = response.header(name).ok_or(ApiError::MissingHeader(name))?;
    value.trim().parse().map_err(|_| ApiError::InvalidHeader {
        name,
        value: value.to_string(),
    })
}

/// Mask the `token` query value; the path and other parameters are kept.
fn redact_token(url: &str) -> String {
    let Some(start) = url.find("?token=").map(|i| i + "?token=".len()) else {
        return url.to_string();
    };
    let end = url[start..].find('&').map_or(url.len(), |i| start + i);
    if start == end {
        return url.to_string();
    }
    format!("{}<token>{}", &url[..start], &url[end..])
}
