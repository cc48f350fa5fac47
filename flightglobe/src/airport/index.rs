//! Airport index for O(1) ICAO code lookup.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use super::Airport;

/// Error type for airport index operations.
#[derive(Debug, thiserror::Error)]
pub enum AirportIndexError {
    #[error("Airport dataset not found at: {0}")]
    NotFound(PathBuf),
    #[error("Failed to parse airport dataset: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Index of airports keyed by upper-case ICAO code.
#[derive(Debug, Clone)]
pub struct AirportIndex {
    airports: HashMap<String, Airport>,
}

impl AirportIndex {
    /// Create an empty airport index.
    pub fn new() -> Self {
        Self {
            airports: HashMap::new(),
        }
    }

    /// Build an index from a dataset file.
    ///
    /// Supports both plain `.json` and gzip compressed `.json.gz` files.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AirportIndexError> {
        use flate2::read::GzDecoder;

        let path = path.as_ref();
        if !path.exists() {
            return Err(AirportIndexError::NotFound(path.to_path_buf()));
        }

        let file = File::open(path)?;

        if path.extension().is_some_and(|ext| ext == "gz") {
            tracing::debug!(path = %path.display(), "Loading gzip compressed airport dataset");
            Self::from_reader(BufReader::new(GzDecoder::new(file)))
        } else {
            Self::from_reader(BufReader::new(file))
        }
    }

    /// Build an index from a reader over the JSON dataset.
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, AirportIndexError> {
        let raw: HashMap<String, Airport> = serde_json::from_reader(reader)?;
        let index = Self::from_airports(raw.into_values());

        tracing::info!(count = index.len(), "Built airport index");
        Ok(index)
    }

    /// Build an index from airport records.
    pub fn from_airports<I: IntoIterator<Item = Airport>>(airports: I) -> Self {
        let mut index = Self::new();
        for airport in airports {
            index.insert(airport);
        }
        index
    }

    pub fn insert(&mut self, airport: Airport) {
        self.airports.insert(airport.icao.to_uppercase(), airport);
    }

    /// Get an airport by ICAO code, case-insensitive.
    pub fn get(&self, icao: &str) -> Option<&Airport> {
        self.airports.get(&icao.trim().to_uppercase())
    }

    /// Returns the number of airports in the index.
    pub fn len(&self) -> usize {
        self.airports.len()
    }

    /// Returns true if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }
}

impl Default for AirportIndex {
    fn default() -> Self {
        Self::new()
    }
}
