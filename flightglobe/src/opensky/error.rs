//! Error types for the OpenSky API gateway.

use thiserror::Error;

/// Errors raised by an [`HttpTransport`](super::HttpTransport).
#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP client could not be constructed.
    #[error("Failed to create HTTP client: {0}")]
    Build(String),

    /// The request could not be sent or the body could not be read.
    #[error("HTTP request failed: {0}")]
    Request(String),
}

/// Errors returned by the API gateway and client.
///
/// None of these are fatal: callers fall back to the last known-good data.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level failure (DNS, TLS, timeout, connection reset).
    #[error("HTTP request failed: {0}")]
    Http(#[from] TransportError),

    /// The service answered with a non-success status that is not retried.
    #[error("Request to {path} failed with HTTP {status}")]
    Status {
        path: String,
        status: u16,
        body: String,
    },

    /// The body was not the JSON we expected.
    #[error("Failed to parse response from {path}: {message}")]
    Json { path: String, message: String },

    /// Every credential (including anonymous access) was rate limited or rejected.
    #[error("Request to {path} rejected after {attempts} attempts (rate limit reached)")]
    CredentialsExhausted { path: String, attempts: usize },
}

impl ApiError {
    /// True for HTTP 404, which some endpoints use for "no data".
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }

    /// True when the failure was caused by rate limiting.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ApiError::CredentialsExhausted { .. })
    }
}
