//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use flightglobe::airport::AirportIndexError;
use flightglobe::config::ConfigFileError;
use flightglobe::controller::ControllerError;
use flightglobe::opensky::ApiError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Failed to load or save the config file
    ConfigFile(ConfigFileError),
    /// OpenSky request failed
    Api(ApiError),
    /// Failed to load the airport dataset
    Airports(AirportIndexError),
    /// Controller task failure
    Controller(ControllerError),
    /// Aircraft is not in the current snapshot
    AircraftNotFound(String),
    /// Failed to read input or write output
    Io(std::io::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Api(ApiError::CredentialsExhausted { .. }) => {
                eprintln!();
                eprintln!("OpenSky rejected every attempt. Anonymous access is heavily");
                eprintln!("rate limited; add accounts under [credentials] in config.ini:");
                eprintln!("  username = password");
            }
            CliError::Airports(AirportIndexError::NotFound(_)) => {
                eprintln!();
                eprintln!("Set [airports] file in config.ini to an airports.json(.gz) dataset.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::Api(e) => write!(f, "OpenSky request failed: {}", e),
            CliError::Airports(e) => write!(f, "Failed to load airports: {}", e),
            CliError::Controller(e) => write!(f, "{}", e),
            CliError::AircraftNotFound(icao24) => write!(
                f,
                "Aircraft '{}' is not airborne or not tracked right now",
                icao24
            ),
            CliError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Api(e) => Some(e),
            CliError::Airports(e) => Some(e),
            CliError::Controller(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<ApiError> for CliError {
    fn from(e: ApiError) -> Self {
        CliError::Api(e)
    }
}

impl From<AirportIndexError> for CliError {
    fn from(e: AirportIndexError) -> Self {
        CliError::Airports(e)
    }
}

impl From<ControllerError> for CliError {
    fn from(e: ControllerError) -> Self {
        CliError::Controller(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}
