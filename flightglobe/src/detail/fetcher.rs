//! Flight-history resolution for a selected aircraft.

use std::sync::Arc;
use std::time::Duration;

use super::cache::DetailCache;
use crate::opensky::{ApiError, FlightDataApi, TimeWindow, DEFAULT_HISTORY_WINDOW_SECS};
use crate::state::{most_recent, DetailedStateVector, FlightRecord, StateVector};

/// Fetch an aircraft's flights in `window` and keep the most recent one.
///
/// Owns all of its arguments so the future can outlive the caller's borrow
/// and be dropped unfinished when the selection moves on.
pub async fn fetch_latest_flight<A: FlightDataApi>(
    api: Arc<A>,
    icao24: String,
    window: TimeWindow,
) -> Result<Option<FlightRecord>, ApiError> {
    let flights = api.flights_by_aircraft(&icao24, window).await?;
    let count = flights.len();
    let latest = most_recent(flights);

    tracing::debug!(
        icao24 = %icao24,
        flights = count,
        departure = latest.as_ref().and_then(|r| r.est_departure_airport.as_deref()),
        arrival = latest.as_ref().and_then(|r| r.est_arrival_airport.as_deref()),
        "Resolved flight history"
    );
    Ok(latest)
}

/// Resolves [`DetailedStateVector`]s through a [`DetailCache`].
pub struct DetailFetcher<A: FlightDataApi> {
    api: Arc<A>,
    cache: DetailCache,
    history_window: Duration,
}

impl<A: FlightDataApi> DetailFetcher<A> {
    pub fn new(api: Arc<A>, cache: DetailCache, history_window: Duration) -> Self {
        Self {
            api,
            cache,
            history_window,
        }
    }

    /// Fetcher with the default cache size and a 24 hour history window.
    pub fn with_defaults(api: Arc<A>) -> Self {
        Self::new(
            api,
            DetailCache::default(),
            Duration::from_secs(DEFAULT_HISTORY_WINDOW_SECS),
        )
    }

    pub fn api(&self) -> Arc<A> {
        Arc::clone(&self.api)
    }

    pub fn cache(&self) -> &DetailCache {
        &self.cache
    }

    /// The trailing history window ending now.
    pub fn window(&self) -> TimeWindow {
        TimeWindow::trailing_now(self.history_window)
    }

    /// Merge a cached record with `state`, if one exists. No network access.
    pub fn cached(&mut self, state: &StateVector) -> Option<DetailedStateVector> {
        self.cache
            .get(&state.icao24)
            .map(|record| DetailedStateVector::resolved(state.clone(), record))
    }

    /// Remember a resolved record.
    pub fn store(&mut self, icao24: &str, record: FlightRecord) {
        self.cache.insert(icao24, record);
    }

    /// Turn a fetch outcome into a detailed record, caching successes.
    ///
    /// Empty results and failures are not cached, so a later selection
    /// retries.
    pub fn apply(
        &mut self,
        state: &StateVector,
        outcome: Result<Option<FlightRecord>, ApiError>,
    ) -> DetailedStateVector {
        match outcome {
            Ok(Some(record)) => {
                self.store(&state.icao24, record.clone());
                DetailedStateVector::resolved(state.clone(), record)
            }
            Ok(None) => {
                tracing::debug!(icao24 = %state.icao24, "No flights found for aircraft");
                DetailedStateVector::unavailable(state.clone())
            }
            Err(e) => {
                tracing::warn!(
                    icao24 = %state.icao24,
                    error = %e,
                    "Failed to fetch flight history"
                );
                DetailedStateVector::unavailable(state.clone())
            }
        }
    }

    /// Resolve the detail for `state`: cache first, then the API.
    pub async fn resolve_detail(&mut self, state: &StateVector) -> DetailedStateVector {
        if let Some(detailed) = self.cached(state) {
            tracing::trace!(icao24 = %state.icao24, "Flight detail cache hit");
            return detailed;
        }

        let outcome = fetch_latest_flight(self.api(), state.icao24.clone(), self.window()).await;
        self.apply(state, outcome)
    }
}
