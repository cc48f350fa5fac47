//! Request gateway with credential rotation.
//!
//! Every request is first sent anonymously. When the service answers with a
//! rate-limit (429) or credential rejection (401/403), the same request is
//! retried with the next configured credential. The number of attempts is
//! bounded by the credential list length plus one; once exhausted the
//! gateway returns [`ApiError::CredentialsExhausted`].

use serde::de::DeserializeOwned;

use super::config::Credential;
use super::error::ApiError;
use super::transport::HttpTransport;

/// HTTP status returned when the request quota is exhausted.
const STATUS_TOO_MANY_REQUESTS: u16 = 429;

/// Statuses that move on to the next credential.
const ROTATE_ON: [u16; 3] = [STATUS_TOO_MANY_REQUESTS, 401, 403];

/// Gateway to a JSON REST API with ordered credential fallback.
pub struct ApiGateway<T: HttpTransport> {
    transport: T,
    base_url: String,
    credentials: Vec<Credential>,
}

impl<T: HttpTransport> ApiGateway<T> {
    /// Create a gateway.
    ///
    /// # Arguments
    ///
    /// * `transport` - HTTP transport used for every attempt
    /// * `base_url` - API root, e.g. `https://opensky-network.org/api`
    /// * `credentials` - Tried in order after anonymous access fails
    pub fn new(transport: T, base_url: &str, credentials: Vec<Credential>) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Maximum number of attempts per request (anonymous + each credential).
    pub fn max_attempts(&self) -> usize {
        self.credentials.len() + 1
    }

    /// Absolute URL for an endpoint path. A leading `/` is optional.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Credential for an attempt: 0 is anonymous, `n` is `credentials[n - 1]`.
    fn credential_for(&self, attempt: usize) -> Option<&Credential> {
        attempt
            .checked_sub(1)
            .and_then(|index| self.credentials.get(index))
    }

    /// GET an endpoint and deserialize its JSON body.
    pub async fn get_json<R: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<R, ApiError> {
        let url = self.url_for(path);
        let attempts = self.max_attempts();

        for attempt in 0..attempts {
            let credential = self.credential_for(attempt);
            let response = self.transport.get(&url, query, credential).await?;

            if response.is_success() {
                return serde_json::from_slice(&response.body).map_err(|e| ApiError::Json {
                    path: path.to_string(),
                    message: e.to_string(),
                });
            }

            if ROTATE_ON.contains(&response.status) {
                tracing::debug!(
                    path,
                    status = response.status,
                    attempt,
                    user = credential.map(|c| c.username.as_str()).unwrap_or("anonymous"),
                    "Request rejected, rotating credentials"
                );
                continue;
            }

            let body = String::from_utf8_lossy(&response.body).into_owned();
            if response.status == 404 {
                tracing::debug!(path, "Request returned no data (HTTP 404)");
            } else {
                tracing::warn!(
                    path,
                    status = response.status,
                    body = %body,
                    "Request failed"
                );
            }
            return Err(ApiError::Status {
                path: path.to_string(),
                status: response.status,
                body,
            });
        }

        tracing::error!(path, attempts, "Request rejected due to rate limit");
        Err(ApiError::CredentialsExhausted {
            path: path.to_string(),
            attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opensky::error::TransportError;
    use crate::opensky::transport::HttpResponse;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Transport that replays scripted responses and records who asked.
    struct ScriptedTransport {
        responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
        seen: Mutex<Vec<(String, Option<String>)>>,
    }

    impl ScriptedTransport {
        fn new(responses: Vec<Result<HttpResponse, TransportError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn users(&self) -> Vec<Option<String>> {
            self.seen
                .lock()
                .unwrap()
                .iter()
                .map(|(_, user)| user.clone())
                .collect()
        }
    }

    impl HttpTransport for ScriptedTransport {
        async fn get(
            &self,
            url: &str,
            _query: &[(&str, String)],
            credential: Option<&Credential>,
        ) -> Result<HttpResponse, TransportError> {
            self.seen
                .lock()
                .unwrap()
                .push((url.to_string(), credential.map(|c| c.username.clone())));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Request("script exhausted".into())))
        }
    }

    fn credentials() -> Vec<Credential> {
        vec![Credential::new("first", "a"), Credential::new("second", "b")]
    }

    #[test]
    fn test_url_for_strips_slashes() {
        let gateway = ApiGateway::new(ScriptedTransport::new(vec![]), "https://x/api/", vec![]);
        assert_eq!(gateway.url_for("/states/all"), "https://x/api/states/all");
        assert_eq!(gateway.url_for("states/all"), "https://x/api/states/all");
    }

    #[tokio::test]
    async fn test_anonymous_success_uses_no_credential() {
        let transport = ScriptedTransport::new(vec![Ok(HttpResponse::new(200, r#"{"time": 5}"#))]);
        let gateway = ApiGateway::new(transport, "https://x/api", credentials());

        let value: serde_json::Value = gateway.get_json("/states/all", &[]).await.unwrap();
        assert_eq!(value["time"], 5);
        assert_eq!(gateway.transport.users(), vec![None]);
    }

    #[tokio::test]
    async fn test_rate_limit_rotates_in_order() {
        let transport = ScriptedTransport::new(vec![
            Ok(HttpResponse::new(429, "slow down")),
            Ok(HttpResponse::new(429, "slow down")),
            Ok(HttpResponse::new(200, "[]")),
        ]);
        let gateway = ApiGateway::new(transport, "https://x/api", credentials());

        let value: Vec<u32> = gateway.get_json("flights/aircraft", &[]).await.unwrap();
        assert!(value.is_empty());
        assert_eq!(
            gateway.transport.users(),
            vec![None, Some("first".to_string()), Some("second".to_string())]
        );
    }

    #[tokio::test]
    async fn test_rejected_credential_rotates() {
        let transport = ScriptedTransport::new(vec![
            Ok(HttpResponse::new(429, "")),
            Ok(HttpResponse::new(401, "bad password")),
            Ok(HttpResponse::new(200, "1")),
        ]);
        let gateway = ApiGateway::new(transport, "https://x/api", credentials());

        let value: u32 = gateway.get_json("states/all", &[]).await.unwrap();
        assert_eq!(value, 1);
    }

    #[tokio::test]
    async fn test_exhausted_credentials_is_bounded() {
        let transport = ScriptedTransport::new(vec![
            Ok(HttpResponse::new(429, "")),
            Ok(HttpResponse::new(429, "")),
            Ok(HttpResponse::new(429, "")),
            Ok(HttpResponse::new(200, "1")),
        ]);
        let gateway = ApiGateway::new(transport, "https://x/api", credentials());

        let result: Result<u32, ApiError> = gateway.get_json("states/all", &[]).await;
        match result {
            Err(ApiError::CredentialsExhausted { attempts, .. }) => assert_eq!(attempts, 3),
            other => panic!("expected exhaustion, got {:?}", other),
        }
        assert_eq!(gateway.transport.users().len(), 3);
    }

    #[tokio::test]
    async fn test_server_error_does_not_rotate() {
        let transport = ScriptedTransport::new(vec![
            Ok(HttpResponse::new(500, "boom")),
            Ok(HttpResponse::new(200, "1")),
        ]);
        let gateway = ApiGateway::new(transport, "https://x/api", credentials());

        let result: Result<u32, ApiError> = gateway.get_json("states/all", &[]).await;
        match result {
            Err(ApiError::Status { status, body, .. }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected status error, got {:?}", other),
        }
        assert_eq!(gateway.transport.users().len(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_is_reported() {
        let transport = ScriptedTransport::new(vec![Err(TransportError::Request("reset".into()))]);
        let gateway = ApiGateway::new(transport, "https://x/api", credentials());

        let result: Result<u32, ApiError> = gateway.get_json("states/all", &[]).await;
        assert!(matches!(result, Err(ApiError::Http(_))));
    }

    #[tokio::test]
    async fn test_malformed_body_is_json_error() {
        let transport = ScriptedTransport::new(vec![Ok(HttpResponse::new(200, "<html>"))]);
        let gateway = ApiGateway::new(transport, "https://x/api", vec![]);

        let result: Result<u32, ApiError> = gateway.get_json("states/all", &[]).await;
        assert!(matches!(result, Err(ApiError::Json { .. })));
    }

    #[tokio::test]
    async fn test_anonymous_only_gateway_exhausts_after_one_attempt() {
        let transport = ScriptedTransport::new(vec![Ok(HttpResponse::new(429, ""))]);
        let gateway = ApiGateway::new(transport, "https://x/api", vec![]);

        let result: Result<u32, ApiError> = gateway.get_json("states/all", &[]).await;
        assert!(result.unwrap_err().is_rate_limited());
    }
}
