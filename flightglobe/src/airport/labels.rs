//! Human-readable labels for the selected aircraft panel.

use super::AirportIndex;
use crate::state::{DetailedStateVector, FlightDetail, LOADING_LABEL, UNKNOWN_LABEL};

const SUFFIXES: [&str; 2] = [" International Airport", " Airport"];

/// Display name for an airport code.
///
/// Unknown codes, and airports with no name, are shown as the code itself.
pub fn friendly_name(index: &AirportIndex, code: Option<&str>) -> Option<String> {
    let code = code?;
    let name = match index.get(code) {
        Some(airport) if !airport.name.is_empty() => airport.name.as_str(),
        _ => return Some(code.to_string()),
    };

    let trimmed = SUFFIXES
        .iter()
        .find_map(|suffix| name.strip_suffix(suffix))
        .unwrap_or(name);
    Some(trimmed.to_string())
}

/// Label/value rows describing a selected aircraft.
///
/// Missing values render as `Unknown`; airports render as `Loading` while
/// the detail fetch is outstanding.
pub fn detail_rows(
    detailed: &DetailedStateVector,
    index: &AirportIndex,
) -> Vec<(&'static str, String)> {
    let state = &detailed.state;
    let number = |value: Option<f64>| {
        value.map_or_else(|| UNKNOWN_LABEL.to_string(), |v| v.to_string())
    };
    let airport = |code: Option<&str>| match detailed.detail {
        FlightDetail::Loading => LOADING_LABEL.to_string(),
        _ => friendly_name(index, code).unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
    };

    vec![
        ("ICAO24", state.icao24.clone()),
        (
            "Callsign",
            state
                .callsign
                .clone()
                .unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
        ),
        ("Origin Country/Region", state.origin_country.clone()),
        ("Longitude", number(state.longitude)),
        ("Latitude", number(state.latitude)),
        ("Altitude(m)", number(state.baro_altitude)),
        ("Velocity", number(state.velocity)),
        ("Heading", number(state.true_track)),
        ("Departure Airport", airport(detailed.departure_airport())),
        ("Arrival Airport", airport(detailed.arrival_airport())),
    ]
}
