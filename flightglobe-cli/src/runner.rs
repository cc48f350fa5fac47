//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization and client creation
//! to reduce duplication across command handlers.

use std::sync::Arc;

use flightglobe::airport::{AirportIndex, AirportIndexError};
use flightglobe::config::ConfigFile;
use flightglobe::logging::{init_logging, LoggingGuard, LoggingOptions};
use flightglobe::opensky::OpenSkyClient;
use tracing::{info, warn};

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    _logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Create a new CLI runner, loading config and initializing logging.
    pub fn new() -> Result<Self, CliError> {
        Self::with_debug(false)
    }

    /// Create a new CLI runner with optional debug logging.
    ///
    /// Logs always go to the configured file. Debug mode also mirrors them
    /// to stderr; stdout carries only command output.
    pub fn with_debug(debug_mode: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load()?;

        let logging_guard = init_logging(logging_options(&config, debug_mode))
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            _logging_guard: logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!(version = flightglobe::VERSION, command, "FlightGlobe starting");
        info!(
            credentials = self.config.credentials.len(),
            base_url = %self.config.opensky.base_url,
            "OpenSky configuration"
        );
    }

    /// Create the OpenSky client.
    pub fn create_client(&self) -> Result<Arc<OpenSkyClient>, CliError> {
        let client = OpenSkyClient::from_config(&self.config.opensky_config())?;
        Ok(Arc::new(client))
    }

    /// Load the configured airport dataset.
    ///
    /// Without a configured file the index is empty: no arcs, airports shown
    /// by code.
    pub fn load_airports(&self) -> Result<AirportIndex, CliError> {
        let Some(path) = &self.config.airports.file else {
            warn!("No airport dataset configured, arcs are disabled");
            return Ok(AirportIndex::new());
        };

        let index = AirportIndex::from_file(path)?;
        info!(path = %path.display(), airports = index.len(), "Loaded airport dataset");
        Ok(index)
    }

    /// Like [`load_airports`](Self::load_airports), but a missing file is an error.
    pub fn require_airports(&self) -> Result<AirportIndex, CliError> {
        match &self.config.airports.file {
            Some(path) => Ok(AirportIndex::from_file(path)?),
            None => Err(CliError::Airports(AirportIndexError::NotFound(
                "(not configured)".into(),
            ))),
        }
    }
}

fn logging_options(config: &ConfigFile, debug_mode: bool) -> LoggingOptions<'_> {
    LoggingOptions {
        file: &config.logging.file,
        console: debug_mode,
        verbose: debug_mode,
    }
}
