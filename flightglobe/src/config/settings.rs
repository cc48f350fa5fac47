//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;
use std::time::Duration;

use crate::opensky::{Credential, OpenSkyConfig};
use crate::state::ValidityPolicy;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    /// OpenSky API settings
    pub opensky: OpenSkySettings,
    /// Credentials tried in order after anonymous access is rate limited
    pub credentials: Vec<Credential>,
    /// Live update polling
    pub polling: PollingSettings,
    /// Which aircraft are shown
    pub display: DisplaySettings,
    /// Flight detail cache
    pub cache: CacheSettings,
    /// Arc geometry
    pub arc: ArcSettings,
    /// Airport dataset
    pub airports: AirportSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// OpenSky API configuration.
#[derive(Debug, Clone)]
pub struct OpenSkySettings {
    /// API root URL.
    pub base_url: String,
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
    /// Trailing window for flight history lookups, in seconds.
    pub history_window_secs: u64,
}

/// Polling configuration.
#[derive(Debug, Clone)]
pub struct PollingSettings {
    /// Seconds between live updates.
    pub interval_secs: u64,
}

/// Display configuration.
#[derive(Debug, Clone)]
pub struct DisplaySettings {
    /// Fraction of eligible aircraft kept on a full load, in (0, 1].
    pub sample_fraction: f64,
    /// Hide aircraft that report no barometric altitude.
    pub require_baro_altitude: bool,
}

/// Detail cache configuration.
#[derive(Debug, Clone)]
pub struct CacheSettings {
    /// Maximum number of cached flight records.
    pub detail_capacity: usize,
}

/// Arc configuration.
#[derive(Debug, Clone)]
pub struct ArcSettings {
    /// Samples per arc part.
    pub segments: usize,
}

/// Airport dataset configuration.
#[derive(Debug, Clone)]
pub struct AirportSettings {
    /// Path to `airports.json` or `airports.json.gz`. No arcs without it.
    pub file: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingSettings {
    /// Log file path.
    pub file: PathBuf,
}

impl ConfigFile {
    /// API client configuration.
    pub fn opensky_config(&self) -> OpenSkyConfig {
        OpenSkyConfig {
            base_url: self.opensky.base_url.clone(),
            timeout: Duration::from_secs(self.opensky.timeout_secs),
            history_window: Duration::from_secs(self.opensky.history_window_secs),
            credentials: self.credentials.clone(),
        }
    }

    pub fn validity_policy(&self) -> ValidityPolicy {
        ValidityPolicy {
            require_baro_altitude: self.display.require_baro_altitude,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.polling.interval_secs)
    }

    pub fn history_window(&self) -> Duration {
        Duration::from_secs(self.opensky.history_window_secs)
    }
}
