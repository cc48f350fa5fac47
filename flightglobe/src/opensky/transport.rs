//! HTTP transport abstraction for testability.
//!
//! The gateway only needs "GET this URL with these query parameters and
//! maybe these credentials, give me status and body". Keeping that behind a
//! trait lets tests script status sequences without a network.

use std::future::Future;
use std::time::Duration;

use super::config::Credential;
use super::error::TransportError;

/// User-Agent sent with every request.
const USER_AGENT: &str = concat!("flightglobe/", env!("CARGO_PKG_VERSION"));

/// Raw HTTP response: status code and body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for asynchronous HTTP GET requests.
pub trait HttpTransport: Send + Sync {
    /// Performs a GET request.
    ///
    /// # Arguments
    ///
    /// * `url` - Absolute URL without query string
    /// * `query` - Query parameters, URL-encoded by the implementation
    /// * `credential` - Basic auth credential, `None` for anonymous access
    ///
    /// Non-success statuses are returned as responses, not errors; only
    /// network-level failures produce a [`TransportError`].
    fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
        credential: Option<&Credential>,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

/// Production transport backed by a pooled `reqwest::Client`.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TransportError::Build(e.to_string()))?;

        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    async fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
        credential: Option<&Credential>,
    ) -> Result<HttpResponse, TransportError> {
        let mut request = self.client.get(url).query(query);
        if let Some(credential) = credential {
            request = request.basic_auth(&credential.username, Some(credential.password()));
        }

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Request(format!("Failed to read response: {}", e)))?;

        tracing::trace!(url, status, bytes = body.len(), "HTTP response received");

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}
