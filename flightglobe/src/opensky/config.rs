//! Configuration for the OpenSky API client.

use std::fmt;
use std::time::Duration;

/// Default OpenSky REST API root.
pub const DEFAULT_OPENSKY_BASE_URL: &str = "https://opensky-network.org/api";

/// Default HTTP timeout in seconds.
pub const DEFAULT_OPENSKY_TIMEOUT_SECS: u64 = 20;

/// Default trailing window for flight history lookups (24 hours).
pub const DEFAULT_HISTORY_WINDOW_SECS: u64 = 86_400;

/// A username/password pair for HTTP basic auth.
///
/// The password never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    password: String,
}

impl Credential {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Configuration for [`OpenSkyClient`](super::OpenSkyClient).
#[derive(Debug, Clone)]
pub struct OpenSkyConfig {
    /// API root URL.
    pub base_url: String,

    /// HTTP request timeout.
    pub timeout: Duration,

    /// How far back to look for an aircraft's flights.
    pub history_window: Duration,

    /// Credentials tried in order after anonymous access is rate limited.
    pub credentials: Vec<Credential>,
}

impl Default for OpenSkyConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OPENSKY_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_OPENSKY_TIMEOUT_SECS),
            history_window: Duration::from_secs(DEFAULT_HISTORY_WINDOW_SECS),
            credentials: Vec::new(),
        }
    }
}
