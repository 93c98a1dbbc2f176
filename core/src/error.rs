//! Error types for the menus API client.
//!
//! # Design
//! A non-200 status is not an error: it surfaces as `ApiResponse::NoResult`.
//! The variants here cover the exchanges that could not be completed or
//! interpreted at all, and are always propagated to the caller.

/// Errors returned by `MenusClient` calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP round-trip failed (DNS, connect, timeout, body read).
    #[error("transport failed: {0}")]
    Transport(String),

    /// A rate-limit header the API always sends was absent.
    #[error("missing response header {0}")]
    MissingHeader(&'static str),

    /// A rate-limit header was present but not a non-negative integer.
    #[error("invalid value {value:?} for response header {name}")]
    InvalidHeader { name: &'static str, value: String },

    /// A 200 response body was not valid JSON.
    #[error("deserialization failed: {0}")]
    Deserialization(#[from] serde_json::Error),
}
