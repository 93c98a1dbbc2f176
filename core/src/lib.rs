//! Synchronous client for the What's on the Menu API.
//!
//! # Overview
//! Maps the menus and dishes endpoints to method calls on `MenusClient`.
//! Optional parameters become a `&k=v` query fragment appended after the
//! API token; response bodies come back as untyped JSON.
//!
//! # Design
//! - Requests are built (`build_*`) and responses parsed (`parse_response`)
//!   as plain data; a `Transport` performs the GET in between. The default
//!   transport is a blocking `ureq` agent.
//! - Any status other than 200 yields `ApiResponse::NoResult`; only failed
//!   exchanges, missing rate-limit headers and malformed JSON are errors.
//! - The client caches the last `X-Ratelimit-*` pair it saw and nothing else.

pub mod client;
pub mod error;
pub mod http;
pub mod params;
pub mod types;

pub use client::{MenusClient, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use http::{HttpRequest, HttpResponse, Transport, UreqTransport};
pub use params::{paramify, paramify_pages};
pub use types::{ApiResponse, MenusFilter, Pagination, RateLimit};
