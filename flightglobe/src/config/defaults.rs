//! Default values and constants for all configuration settings.
//!
//! Contains the `DEFAULT_*` constants not owned by a component module and the
//! `ConfigFile::default()` implementation.

use super::file::config_directory;
use super::settings::*;
use crate::detail::DEFAULT_DETAIL_CACHE_CAPACITY;
use crate::geo::DEFAULT_ARC_SEGMENTS;
use crate::opensky::{
    DEFAULT_HISTORY_WINDOW_SECS, DEFAULT_OPENSKY_BASE_URL, DEFAULT_OPENSKY_TIMEOUT_SECS,
};
use crate::reconcile::DEFAULT_SAMPLE_FRACTION;

/// Default seconds between live updates.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 15;

/// Default log file name inside the config directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "flightglobe.log";

/// Upper bound for arc samples per part.
pub const MAX_ARC_SEGMENTS: usize = 10_000;

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            opensky: OpenSkySettings {
                base_url: DEFAULT_OPENSKY_BASE_URL.to_string(),
                timeout_secs: DEFAULT_OPENSKY_TIMEOUT_SECS,
                history_window_secs: DEFAULT_HISTORY_WINDOW_SECS,
            },
            credentials: Vec::new(),
            polling: PollingSettings {
                interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            },
            display: DisplaySettings {
                sample_fraction: DEFAULT_SAMPLE_FRACTION,
                require_baro_altitude: false,
            },
            cache: CacheSettings {
                detail_capacity: DEFAULT_DETAIL_CACHE_CAPACITY,
            },
            arc: ArcSettings {
                segments: DEFAULT_ARC_SEGMENTS,
            },
            airports: AirportSettings { file: None },
            logging: LoggingSettings {
                file: config_directory().join(DEFAULT_LOG_FILE_NAME),
            },
        }
    }
}
