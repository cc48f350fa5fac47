//! Conversion of raw OpenSky state rows into [`StateVector`]s.
//!
//! `/states/all` returns each aircraft as a heterogeneous JSON array with
//! fields at fixed offsets. Rows that cannot be identified are skipped;
//! rows describing aircraft on the ground or without a position are kept by
//! the parser and removed by [`is_displayable`], since the reconciler needs
//! to see them to drop aircraft that landed.

use rand::Rng;
use serde_json::Value;

use super::vector::{PositionSource, StateVector};

/// Lowest synthetic display altitude (fraction of globe radius).
pub const DISPLAY_ALTITUDE_MIN: f64 = 0.01;

/// Highest synthetic display altitude (fraction of globe radius).
pub const DISPLAY_ALTITUDE_MAX: f64 = 0.11;

/// Barometric altitude mapped onto [`DISPLAY_ALTITUDE_MAX`], in meters.
pub const DISPLAY_ALTITUDE_CEILING_M: f64 = 13_000.0;

// Row offsets of the OpenSky state vector array.
const IDX_ICAO24: usize = 0;
const IDX_CALLSIGN: usize = 1;
const IDX_ORIGIN_COUNTRY: usize = 2;
const IDX_TIME_POSITION: usize = 3;
const IDX_LAST_CONTACT: usize = 4;
const IDX_LONGITUDE: usize = 5;
const IDX_LATITUDE: usize = 6;
const IDX_BARO_ALTITUDE: usize = 7;
const IDX_ON_GROUND: usize = 8;
const IDX_VELOCITY: usize = 9;
const IDX_TRUE_TRACK: usize = 10;
const IDX_VERTICAL_RATE: usize = 11;
const IDX_SENSORS: usize = 12;
const IDX_GEO_ALTITUDE: usize = 13;
const IDX_SQUAWK: usize = 14;
const IDX_SPI: usize = 15;
const IDX_POSITION_SOURCE: usize = 16;
const IDX_CATEGORY: usize = 17;

/// Which records may be shown on the globe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidityPolicy {
    /// Also require a barometric altitude.
    pub require_baro_altitude: bool,
}

impl ValidityPolicy {
    /// Airborne with a known position.
    pub const LENIENT: Self = Self {
        require_baro_altitude: false,
    };

    /// Airborne with a known position and barometric altitude.
    pub const STRICT: Self = Self {
        require_baro_altitude: true,
    };
}

/// Map a barometric altitude onto the synthetic display altitude range.
///
/// Linear between [`DISPLAY_ALTITUDE_MIN`] (sea level or below) and
/// [`DISPLAY_ALTITUDE_MAX`] (at or above [`DISPLAY_ALTITUDE_CEILING_M`]).
/// Unknown altitudes sit on the floor.
pub fn display_altitude(baro_altitude: Option<f64>) -> f64 {
    let fraction = match baro_altitude {
        Some(alt) if alt.is_finite() => (alt / DISPLAY_ALTITUDE_CEILING_M).clamp(0.0, 1.0),
        _ => 0.0,
    };
    DISPLAY_ALTITUDE_MIN + fraction * (DISPLAY_ALTITUDE_MAX - DISPLAY_ALTITUDE_MIN)
}

/// True if the record may be displayed under `policy`.
pub fn is_displayable(state: &StateVector, policy: ValidityPolicy) -> bool {
    !state.on_ground
        && state.position().is_some()
        && (!policy.require_baro_altitude || state.baro_altitude.is_some())
}

/// Parse one raw state row.
///
/// Returns `None` when the row carries no identifier.
pub fn parse_row(row: &[Value]) -> Option<StateVector> {
    let icao24 = str_at(row, IDX_ICAO24)?.trim().to_lowercase();
    if icao24.is_empty() {
        return None;
    }

    let baro_altitude = f64_at(row, IDX_BARO_ALTITUDE);

    Some(StateVector {
        icao24,
        callsign: str_at(row, IDX_CALLSIGN)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        origin_country: str_at(row, IDX_ORIGIN_COUNTRY).unwrap_or_default().to_string(),
        time_position: i64_at(row, IDX_TIME_POSITION),
        last_contact: i64_at(row, IDX_LAST_CONTACT).unwrap_or(0),
        longitude: f64_at(row, IDX_LONGITUDE),
        latitude: f64_at(row, IDX_LATITUDE),
        baro_altitude,
        display_altitude: display_altitude(baro_altitude),
        on_ground: row
            .get(IDX_ON_GROUND)
            .and_then(Value::as_bool)
            .unwrap_or(false),
        velocity: f64_at(row, IDX_VELOCITY),
        true_track: f64_at(row, IDX_TRUE_TRACK),
        vertical_rate: f64_at(row, IDX_VERTICAL_RATE),
        sensors: row.get(IDX_SENSORS).and_then(Value::as_array).map(|ids| {
            ids.iter().filter_map(Value::as_i64).collect()
        }),
        geo_altitude: f64_at(row, IDX_GEO_ALTITUDE),
        squawk: str_at(row, IDX_SQUAWK).map(str::to_string),
        spi: row.get(IDX_SPI).and_then(Value::as_bool).unwrap_or(false),
        position_source: i64_at(row, IDX_POSITION_SOURCE)
            .and_then(|code| u8::try_from(code).ok())
            .map(PositionSource::from_code)
            .unwrap_or_default(),
        category: i64_at(row, IDX_CATEGORY).and_then(|c| u8::try_from(c).ok()),
    })
}

/// Parse every row of a snapshot, skipping rows without an identifier.
pub fn parse_states(rows: &[Value]) -> Vec<StateVector> {
    let mut skipped = 0usize;
    let states: Vec<StateVector> = rows
        .iter()
        .filter_map(|row| {
            let parsed = row.as_array().and_then(|fields| parse_row(fields));
            if parsed.is_none() {
                skipped += 1;
            }
            parsed
        })
        .collect();

    if skipped > 0 {
        tracing::debug!(skipped, "Skipped state rows without identifier");
    }
    states
}

/// Keep only the records that may be displayed.
pub fn filter_displayable(states: Vec<StateVector>, policy: ValidityPolicy) -> Vec<StateVector> {
    let total = states.len();
    let kept: Vec<StateVector> = states
        .into_iter()
        .filter(|s| is_displayable(s, policy))
        .collect();

    tracing::trace!(total, kept = kept.len(), "Filtered state vectors");
    kept
}

/// Keep a uniformly random subset of `ceil(len * fraction)` records.
///
/// Input order is preserved. A fraction of 1.0 or more keeps everything.
pub fn sample<R: Rng + ?Sized>(
    states: Vec<StateVector>,
    fraction: f64,
    rng: &mut R,
) -> Vec<StateVector> {
    if fraction >= 1.0 || states.is_empty() {
        return states;
    }

    let len = states.len();
    let amount = ((len as f64) * fraction.max(0.0)).ceil() as usize;
    let mut picked = rand::seq::index::sample(rng, len, amount.min(len)).into_vec();
    picked.sort_unstable();

    let mut picked = picked.into_iter().peekable();
    states
        .into_iter()
        .enumerate()
        .filter_map(|(i, state)| {
            if picked.peek() == Some(&i) {
                picked.next();
                Some(state)
            } else {
                None
            }
        })
        .collect()
}

fn str_at(row: &[Value], idx: usize) -> Option<&str> {
    row.get(idx).and_then(Value::as_str)
}

fn f64_at(row: &[Value], idx: usize) -> Option<f64> {
    row.get(idx).and_then(Value::as_f64)
}

fn i64_at(row: &[Value], idx: usize) -> Option<i64> {
    let value = row.get(idx)?;
    value.as_i64().or_else(|| value.as_f64().map(|f| f as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn row(icao: &str, lon: Value, lat: Value, baro: Value, on_ground: bool) -> Vec<Value> {
        json!([
            icao, "DLH9LF  ", "Germany", 1700000000, 1700000005,
            lon, lat, baro, on_ground, 230.5, 87.2, -1.3,
            null, 11200.0, "1000", false, 0
        ])
        .as_array()
        .cloned()
        .unwrap()
    }

    #[test]
    fn test_parse_row_offsets() {
        let raw = row("3C6444 ", json!(8.5), json!(50.0), json!(10972.8), false);
        let sv = parse_row(&raw).unwrap();

        assert_eq!(sv.icao24, "3c6444");
        assert_eq!(sv.callsign.as_deref(), Some("DLH9LF"));
        assert_eq!(sv.origin_country, "Germany");
        assert_eq!(sv.time_position, Some(1700000000));
        assert_eq!(sv.last_contact, 1700000005);
        assert_eq!(sv.longitude, Some(8.5));
        assert_eq!(sv.latitude, Some(50.0));
        assert_eq!(sv.baro_altitude, Some(10972.8));
        assert!(!sv.on_ground);
        assert_eq!(sv.velocity, Some(230.5));
        assert_eq!(sv.true_track, Some(87.2));
        assert_eq!(sv.vertical_rate, Some(-1.3));
        assert!(sv.sensors.is_none());
        assert_eq!(sv.geo_altitude, Some(11200.0));
        assert_eq!(sv.squawk.as_deref(), Some("1000"));
        assert_eq!(sv.position_source, PositionSource::AdsB);
        assert!(sv.category.is_none());
    }

    #[test]
    fn test_parse_row_without_identifier() {
        assert!(parse_row(&[]).is_none());
        assert!(parse_row(&row("  ", json!(1.0), json!(1.0), json!(null), false)).is_none());
        assert!(parse_row(&[json!(42)]).is_none());
    }

    #[test]
    fn test_parse_row_blank_callsign_is_none() {
        let mut fields = row("abc123", json!(1.0), json!(1.0), json!(null), false);
        fields[1] = json!("        ");
        assert!(parse_row(&fields).unwrap().callsign.is_none());
    }

    #[test]
    fn test_parse_states_skips_garbage_rows() {
        let rows = vec![
            Value::Array(row("abc123", json!(1.0), json!(2.0), json!(1000.0), false)),
            json!("not a row"),
            Value::Array(vec![]),
        ];
        let states = parse_states(&rows);
        assert_eq!(states.len(), 1);
        assert_eq!(states[0].icao24, "abc123");
    }

    #[test]
    fn test_display_altitude_bounds() {
        assert_eq!(display_altitude(None), DISPLAY_ALTITUDE_MIN);
        assert_eq!(display_altitude(Some(-50.0)), DISPLAY_ALTITUDE_MIN);
        assert_eq!(display_altitude(Some(0.0)), DISPLAY_ALTITUDE_MIN);
        assert_eq!(display_altitude(Some(40_000.0)), DISPLAY_ALTITUDE_MAX);
        assert_eq!(display_altitude(Some(f64::NAN)), DISPLAY_ALTITUDE_MIN);

        let mid = display_altitude(Some(DISPLAY_ALTITUDE_CEILING_M / 2.0));
        assert!((mid - 0.06).abs() < 1e-12);
    }

    #[test]
    fn test_display_altitude_is_deterministic() {
        assert_eq!(display_altitude(Some(9144.0)), display_altitude(Some(9144.0)));
    }

    #[test]
    fn test_filter_excludes_ground_and_missing_coordinates() {
        let states = parse_states(&[
            Value::Array(row("ground", json!(1.0), json!(2.0), json!(0.0), true)),
            Value::Array(row("nolat", json!(1.0), json!(null), json!(3000.0), false)),
            Value::Array(row("nolon", json!(null), json!(2.0), json!(3000.0), false)),
            Value::Array(row("nobaro", json!(1.0), json!(2.0), json!(null), false)),
            Value::Array(row("abc123", json!(1.0), json!(2.0), json!(3000.0), false)),
        ]);

        let lenient = filter_displayable(states.clone(), ValidityPolicy::LENIENT);
        let ids: Vec<&str> = lenient.iter().map(|s| s.icao24.as_str()).collect();
        assert_eq!(ids, vec!["nobaro", "abc123"]);
        for s in &lenient {
            assert!(!s.on_ground && s.latitude.is_some() && s.longitude.is_some());
        }

        let strict = filter_displayable(states, ValidityPolicy::STRICT);
        assert_eq!(strict.len(), 1);
        assert_eq!(strict[0].icao24, "abc123");
    }

    #[test]
    fn test_sample_fraction() {
        let states: Vec<StateVector> = (0..10)
            .map(|i| StateVector::new(&format!("a{:05}", i), "X").with_position(0.0, 0.0))
            .collect();
        let mut rng = StdRng::seed_from_u64(7);

        let all = sample(states.clone(), 1.0, &mut rng);
        assert_eq!(all.len(), 10);

        let some = sample(states.clone(), 0.2, &mut rng);
        assert_eq!(some.len(), 2);

        let rounded_up = sample(states.clone(), 0.25, &mut rng);
        assert_eq!(rounded_up.len(), 3);

        // Preserves input order
        let positions: Vec<usize> = rounded_up
            .iter()
            .map(|s| states.iter().position(|o| o.icao24 == s.icao24).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }
}
