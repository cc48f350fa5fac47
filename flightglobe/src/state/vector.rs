//! Aircraft state vector as reported by the upstream tracking API.

use serde::{Deserialize, Serialize};

/// Origin of a state vector's position.
///
/// Matches the `position_source` code of OpenSky state rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PositionSource {
    /// Automatic Dependent Surveillance-Broadcast.
    #[default]
    AdsB,
    /// ASTERIX feed.
    Asterix,
    /// Multilateration.
    Mlat,
    /// FLARM collision avoidance transmitters.
    Flarm,
    /// Any code not known at the time of writing.
    Other(u8),
}

impl PositionSource {
    /// Map an upstream numeric code to a source.
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::AdsB,
            1 => Self::Asterix,
            2 => Self::Mlat,
            3 => Self::Flarm,
            other => Self::Other(other),
        }
    }
}

impl std::fmt::Display for PositionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AdsB => write!(f, "ADS-B"),
            Self::Asterix => write!(f, "ASTERIX"),
            Self::Mlat => write!(f, "MLAT"),
            Self::Flarm => write!(f, "FLARM"),
            Self::Other(code) => write!(f, "source {}", code),
        }
    }
}

/// One aircraft's instantaneous state.
///
/// `icao24` is the primary key across every record type in the crate.
/// `display_altitude` is not a physical value: it only separates markers
/// visually on the globe and is carried forward across polls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateVector {
    /// ICAO 24-bit transponder address (lowercase hex).
    pub icao24: String,
    /// Callsign, trimmed. `None` when not transmitted.
    pub callsign: Option<String>,
    /// Country inferred from the ICAO address allocation.
    pub origin_country: String,
    /// Unix seconds of the last position update.
    pub time_position: Option<i64>,
    /// Unix seconds of the last message of any kind.
    pub last_contact: i64,
    /// WGS-84 longitude in degrees.
    pub longitude: Option<f64>,
    /// WGS-84 latitude in degrees.
    pub latitude: Option<f64>,
    /// Barometric altitude in meters.
    pub baro_altitude: Option<f64>,
    /// Synthetic altitude used for marker placement (fraction of globe radius).
    pub display_altitude: f64,
    /// True when the last position came from a surface report.
    pub on_ground: bool,
    /// Ground speed in m/s.
    pub velocity: Option<f64>,
    /// True track in degrees clockwise from north.
    pub true_track: Option<f64>,
    /// Vertical rate in m/s, positive when climbing.
    pub vertical_rate: Option<f64>,
    /// Receiver ids that contributed to this state.
    pub sensors: Option<Vec<i64>>,
    /// Geometric altitude in meters.
    pub geo_altitude: Option<f64>,
    /// Transponder code.
    pub squawk: Option<String>,
    /// Special purpose indicator.
    pub spi: bool,
    /// Where the position came from.
    pub position_source: PositionSource,
    /// Emitter category, only present in extended responses.
    pub category: Option<u8>,
}

impl StateVector {
    /// Create a state vector with only the identity fields set.
    ///
    /// Everything positional starts out unknown; callers fill in what they have.
    pub fn new(icao24: &str, origin_country: &str) -> Self {
        Self {
            icao24: icao24.to_string(),
            callsign: None,
            origin_country: origin_country.to_string(),
            time_position: None,
            last_contact: 0,
            longitude: None,
            latitude: None,
            baro_altitude: None,
            display_altitude: 0.0,
            on_ground: false,
            velocity: None,
            true_track: None,
            vertical_rate: None,
            sensors: None,
            geo_altitude: None,
            squawk: None,
            spi: false,
            position_source: PositionSource::AdsB,
            category: None,
        }
    }

    /// Set latitude and longitude.
    pub fn with_position(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    /// Position as `(latitude, longitude)` when both are known.
    pub fn position(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    /// True if position or heading differ from `other`.
    pub fn moved_from(&self, other: &StateVector) -> bool {
        self.latitude != other.latitude
            || self.longitude != other.longitude
            || self.true_track != other.true_track
    }
}
