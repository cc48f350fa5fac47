//! User configuration stored in `~/.flightglobe/config.ini`.
//!
//! Every key is optional; missing keys fall back to the defaults in
//! [`ConfigFile::default`]. Invalid values fail the load with
//! [`ConfigFileError::InvalidValue`] naming the section and key.
//!
//! # Example
//!
//! ```
//! use flightglobe::config::ConfigFile;
//!
//! let config = ConfigFile::from_ini_str("[polling]\ninterval_secs = 30\n").unwrap();
//! assert_eq!(config.poll_interval().as_secs(), 30);
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::{DEFAULT_LOG_FILE_NAME, DEFAULT_POLL_INTERVAL_SECS, MAX_ARC_SEGMENTS};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    AirportSettings, ArcSettings, CacheSettings, ConfigFile, DisplaySettings, LoggingSettings,
    OpenSkySettings, PollingSettings,
};
