//! OpenSky REST client.
//!
//! The [`FlightDataApi`] trait is the seam used by the live feed and the
//! detail fetcher; [`OpenSkyClient`] implements it on top of
//! [`ApiGateway`] so every call goes through credential rotation.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use super::config::OpenSkyConfig;
use super::error::ApiError;
use super::gateway::ApiGateway;
use super::transport::{HttpTransport, ReqwestTransport};
use crate::state::FlightRecord;

const STATES_PATH: &str = "/states/all";
const FLIGHTS_PATH: &str = "/flights/aircraft";

/// Body of `/states/all`.
///
/// `states` holds raw heterogeneous rows; upstream sends `null` when no
/// aircraft match.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatesResponse {
    pub time: i64,
    #[serde(default)]
    pub states: Option<Vec<Value>>,
}

impl StatesResponse {
    /// Raw rows, empty when upstream sent `null`.
    pub fn rows(&self) -> &[Value] {
        self.states.as_deref().unwrap_or(&[])
    }
}

/// A `[begin, end]` interval in unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub begin: i64,
    pub end: i64,
}

impl TimeWindow {
    /// The window of length `duration` ending at `now`.
    pub fn trailing(duration: Duration, now: i64) -> Self {
        let span = i64::try_from(duration.as_secs()).unwrap_or(i64::MAX);
        Self {
            begin: now.saturating_sub(span),
            end: now,
        }
    }

    /// The window of length `duration` ending at the current wall clock.
    pub fn trailing_now(duration: Duration) -> Self {
        Self::trailing(duration, chrono::Utc::now().timestamp())
    }
}

/// Source of aircraft states and flight history.
pub trait FlightDataApi: Send + Sync {
    /// Fetch a snapshot of every tracked aircraft.
    fn all_states(&self) -> impl Future<Output = Result<StatesResponse, ApiError>> + Send;

    /// Fetch the flights of one aircraft within `window`.
    ///
    /// An empty list means no flight was found in the window.
    fn flights_by_aircraft(
        &self,
        icao24: &str,
        window: TimeWindow,
    ) -> impl Future<Output = Result<Vec<FlightRecord>, ApiError>> + Send;
}

/// OpenSky Network client.
pub struct OpenSkyClient<T: HttpTransport = ReqwestTransport> {
    gateway: ApiGateway<T>,
}

impl OpenSkyClient<ReqwestTransport> {
    /// Create a client with the production HTTP transport.
    pub fn from_config(config: &OpenSkyConfig) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(config.timeout)?;
        Ok(Self::with_transport(transport, config))
    }
}

impl<T: HttpTransport> OpenSkyClient<T> {
    /// Create a client over an arbitrary transport.
    pub fn with_transport(transport: T, config: &OpenSkyConfig) -> Self {
        Self {
            gateway: ApiGateway::new(transport, &config.base_url, config.credentials.clone()),
        }
    }

    pub fn gateway(&self) -> &ApiGateway<T> {
        &self.gateway
    }
}

impl<T: HttpTransport> FlightDataApi for OpenSkyClient<T> {
    async fn all_states(&self) -> Result<StatesResponse, ApiError> {
        let response: StatesResponse = self.gateway.get_json(STATES_PATH, &[]).await?;
        tracing::debug!(
            time = response.time,
            rows = response.rows().len(),
            "Fetched state vectors"
        );
        Ok(response)
    }

    async fn flights_by_aircraft(
        &self,
        icao24: &str,
        window: TimeWindow,
    ) -> Result<Vec<FlightRecord>, ApiError> {
        let query = [
            ("icao24", icao24.to_string()),
            ("begin", window.begin.to_string()),
            ("end", window.end.to_string()),
        ];

        match self.gateway.get_json::<Vec<FlightRecord>>(FLIGHTS_PATH, &query).await {
            Ok(flights) => {
                tracing::debug!(icao24, flights = flights.len(), "Fetched flight history");
                Ok(flights)
            }
            Err(e) if e.is_not_found() => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }
}
