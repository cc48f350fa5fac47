//! Static airport dataset.
//!
//! Airports are loaded once at startup from an `airports.json` file: a JSON
//! object keyed by ICAO code whose values carry the airport's name, location
//! and metadata. Gzip-compressed files (`.json.gz`) are supported.
//!
//! # Example
//!
//! ```ignore
//! use flightglobe::airport::AirportIndex;
//!
//! let index = AirportIndex::from_file("/path/to/airports.json")?;
//! if let Some(airport) = index.get("lfbo") {
//!     println!("{} is at ({}, {})", airport.name, airport.lat, airport.lon);
//! }
//! ```

mod index;
mod labels;

use serde::{Deserialize, Serialize};

pub use index::{AirportIndex, AirportIndexError};
pub use labels::{detail_rows, friendly_name};

/// An airport record from the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    /// ICAO code (e.g., "LFBO", "KJFK").
    pub icao: String,
    #[serde(default)]
    pub iata: String,
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    /// Elevation in feet.
    #[serde(default)]
    pub elevation: f64,
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lon: f64,
    /// IANA time zone name.
    #[serde(default)]
    pub tz: String,
}

impl Airport {
    /// Create an airport with only the fields the arc builder needs.
    pub fn new(icao: &str, name: &str, lat: f64, lon: f64) -> Self {
        Self {
            icao: icao.to_string(),
            iata: String::new(),
            name: name.to_string(),
            city: String::new(),
            state: String::new(),
            country: String::new(),
            elevation: 0.0,
            lat,
            lon,
            tz: String::new(),
        }
    }
}
