//! Scripted [`FlightDataApi`] shared by unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use serde_json::{json, Value};

use crate::opensky::{ApiError, FlightDataApi, StatesResponse, TimeWindow};
use crate::state::FlightRecord;

/// One raw `/states/all` row.
pub fn state_row(icao: &str, lat: f64, lon: f64, baro: Option<f64>, on_ground: bool) -> Value {
    json!([
        icao, "TEST1   ", "Testland", 1700000000, 1700000005,
        lon, lat, baro, on_ground, 200.0, 90.0, 0.0,
        null, baro, "7000", false, 0
    ])
}

fn exhausted(path: &str) -> ApiError {
    ApiError::CredentialsExhausted {
        path: path.to_string(),
        attempts: 1,
    }
}

/// API double: scripted snapshots, per-aircraft flight lists, call counters.
///
/// Snapshots are consumed in order; `None` entries and an empty script fail
/// with a rate-limit error. Aircraft without scripted flights fail as well.
#[derive(Default)]
pub struct MockApi {
    snapshots: Mutex<VecDeque<Option<Vec<Value>>>>,
    flights: Mutex<HashMap<String, Vec<FlightRecord>>>,
    flight_delay: Mutex<Duration>,
    pub state_calls: AtomicUsize,
    pub flight_calls: AtomicUsize,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_snapshot(&self, rows: Vec<Value>) -> &Self {
        self.snapshots.lock().unwrap().push_back(Some(rows));
        self
    }

    pub fn push_failure(&self) -> &Self {
        self.snapshots.lock().unwrap().push_back(None);
        self
    }

    pub fn set_flights(&self, icao24: &str, flights: Vec<FlightRecord>) -> &Self {
        self.flights
            .lock()
            .unwrap()
            .insert(icao24.to_string(), flights);
        self
    }

    pub fn set_flight_delay(&self, delay: Duration) {
        *self.flight_delay.lock().unwrap() = delay;
    }

    pub fn state_calls(&self) -> usize {
        self.state_calls.load(Ordering::SeqCst)
    }

    pub fn flight_calls(&self) -> usize {
        self.flight_calls.load(Ordering::SeqCst)
    }
}

impl FlightDataApi for MockApi {
    async fn all_states(&self) -> Result<StatesResponse, ApiError> {
        self.state_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.snapshots.lock().unwrap().pop_front();
        match next {
            Some(Some(rows)) => Ok(StatesResponse {
                time: 1_700_000_000,
                states: Some(rows),
            }),
            _ => Err(exhausted("/states/all")),
        }
    }

    async fn flights_by_aircraft(
        &self,
        icao24: &str,
        _window: TimeWindow,
    ) -> Result<Vec<FlightRecord>, ApiError> {
        self.flight_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.flight_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let flights = self.flights.lock().unwrap().get(icao24).cloned();
        flights.ok_or_else(|| exhausted("/flights/aircraft"))
    }
}
