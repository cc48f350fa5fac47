//! State vector enriched with flight-history detail.

use serde::Serialize;

use super::record::FlightRecord;
use super::vector::StateVector;

/// Label shown while a detail fetch is outstanding.
pub const LOADING_LABEL: &str = "Loading";

/// Label shown when a detail field is not available.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Resolution status of the flight-history part of a detailed record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FlightDetail {
    /// Placeholder synthesized on selection, before the fetch resolves.
    Loading,
    /// The fetch returned nothing or failed.
    Unavailable,
    /// Resolved history.
    Known(FlightRecord),
}

/// A [`StateVector`] plus its flight-history detail.
///
/// Positional fields are refreshed in place through [`patch`](Self::patch);
/// the history part is only replaced by a new resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailedStateVector {
    pub state: StateVector,
    pub detail: FlightDetail,
}

impl DetailedStateVector {
    /// Placeholder used between selection and detail resolution.
    pub fn loading(state: StateVector) -> Self {
        Self {
            state,
            detail: FlightDetail::Loading,
        }
    }

    /// Record for which no history could be resolved.
    pub fn unavailable(state: StateVector) -> Self {
        Self {
            state,
            detail: FlightDetail::Unavailable,
        }
    }

    /// Merge live state with a resolved history record.
    pub fn resolved(state: StateVector, record: FlightRecord) -> Self {
        Self {
            state,
            detail: FlightDetail::Known(record),
        }
    }

    pub fn icao24(&self) -> &str {
        &self.state.icao24
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.detail, FlightDetail::Loading)
    }

    /// The resolved history, if any.
    pub fn record(&self) -> Option<&FlightRecord> {
        match &self.detail {
            FlightDetail::Known(record) => Some(record),
            _ => None,
        }
    }

    /// Estimated departure airport code, if resolved.
    pub fn departure_airport(&self) -> Option<&str> {
        self.record()
            .and_then(|r| r.est_departure_airport.as_deref())
    }

    /// Estimated arrival airport code, if resolved.
    pub fn arrival_airport(&self) -> Option<&str> {
        self.record().and_then(|r| r.est_arrival_airport.as_deref())
    }

    /// Departure airport for display, with the loading/unknown sentinels.
    pub fn departure_label(&self) -> &str {
        match &self.detail {
            FlightDetail::Loading => LOADING_LABEL,
            _ => self.departure_airport().unwrap_or(UNKNOWN_LABEL),
        }
    }

    /// Arrival airport for display, with the loading/unknown sentinels.
    pub fn arrival_label(&self) -> &str {
        match &self.detail {
            FlightDetail::Loading => LOADING_LABEL,
            _ => self.arrival_airport().unwrap_or(UNKNOWN_LABEL),
        }
    }

    /// Copy the live fields of a refreshed state onto this record.
    ///
    /// Returns false (and leaves the record untouched) when the identifiers
    /// differ; a different aircraft needs a new resolution.
    pub fn patch(&mut self, fresh: &StateVector) -> bool {
        if fresh.icao24 != self.state.icao24 {
            return false;
        }
        self.state = fresh.clone();
        true
    }
}
