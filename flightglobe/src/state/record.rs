//! Flight history records from the `/flights/aircraft` endpoint.

use serde::{Deserialize, Serialize};

/// One estimated flight of an aircraft.
///
/// Departure and arrival airports are estimates made by the upstream service
/// and are frequently missing for flights still in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightRecord {
    pub icao24: String,
    #[serde(default)]
    pub callsign: Option<String>,
    /// Unix seconds when the aircraft was first seen on this flight.
    pub first_seen: i64,
    /// Unix seconds when the aircraft was last seen on this flight.
    pub last_seen: i64,
    #[serde(default)]
    pub est_departure_airport: Option<String>,
    #[serde(default)]
    pub est_arrival_airport: Option<String>,
    #[serde(default)]
    pub est_departure_airport_horiz_distance: Option<f64>,
    #[serde(default)]
    pub est_departure_airport_vert_distance: Option<f64>,
    #[serde(default)]
    pub est_arrival_airport_horiz_distance: Option<f64>,
    #[serde(default)]
    pub est_arrival_airport_vert_distance: Option<f64>,
    #[serde(default)]
    pub departure_airport_candidates_count: Option<u32>,
    #[serde(default)]
    pub arrival_airport_candidates_count: Option<u32>,
}

impl FlightRecord {
    /// Minimal record, mostly useful for tests and fixtures.
    pub fn new(icao24: &str, first_seen: i64, last_seen: i64) -> Self {
        Self {
            icao24: icao24.to_string(),
            callsign: None,
            first_seen,
            last_seen,
            est_departure_airport: None,
            est_arrival_airport: None,
            est_departure_airport_horiz_distance: None,
            est_departure_airport_vert_distance: None,
            est_arrival_airport_horiz_distance: None,
            est_arrival_airport_vert_distance: None,
            departure_airport_candidates_count: None,
            arrival_airport_candidates_count: None,
        }
    }

    /// Set the estimated departure airport.
    pub fn with_departure(mut self, icao: &str) -> Self {
        self.est_departure_airport = Some(icao.to_string());
        self
    }

    /// Set the estimated arrival airport.
    pub fn with_arrival(mut self, icao: &str) -> Self {
        self.est_arrival_airport = Some(icao.to_string());
        self
    }
}

/// Pick the most recently seen record.
///
/// Records are ordered by `last_seen` descending; on ties the earliest record
/// in response order wins.
pub fn most_recent(mut records: Vec<FlightRecord>) -> Option<FlightRecord> {
    records.sort_by(|a, b| b.last_seen.cmp(&a.last_seen));
    records.into_iter().next()
}
