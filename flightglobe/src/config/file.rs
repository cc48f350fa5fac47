//! Reading and writing ~/.flightglobe/config.ini.
//!
//! Values are taken verbatim: escape sequences and quotes are not
//! interpreted, so a password written by [`ConfigFile::save_to`] loads back
//! byte for byte. Surrounding whitespace is still trimmed.

use ini::{Ini, ParseOption};
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::settings::ConfigFile;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Config text is not valid INI
    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

fn verbatim() -> ParseOption {
    ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..ParseOption::default()
    }
}

impl ConfigFile {
    /// Load ~/.flightglobe/config.ini, or defaults if there is none.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load from `path`, or defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ini_str(&content)
    }

    /// Parse configuration from INI text.
    pub fn from_ini_str(content: &str) -> Result<Self, ConfigFileError> {
        let ini = Ini::load_from_str_opt(content, verbatim())
            .map_err(|e| ConfigFileError::Parse(e.to_string()))?;
        super::parser::parse_ini(&ini)
    }

    /// Write the commented INI form to `path`, creating its directory.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        let write_error = |source| ConfigFileError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
        std::fs::write(path, super::writer::to_config_string(self)).map_err(write_error)
    }
}

/// ~/.flightglobe, or ./.flightglobe without a home directory.
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".flightglobe")
}

pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::*;
    use crate::opensky::Credential;

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();

        assert_eq!(config.opensky.base_url, "https://opensky-network.org/api");
        assert_eq!(config.opensky.timeout_secs, 20);
        assert_eq!(config.opensky.history_window_secs, 86_400);
        assert!(config.credentials.is_empty());
        assert_eq!(config.polling.interval_secs, DEFAULT_POLL_INTERVAL_SECS);
        assert_eq!(config.display.sample_fraction, 0.2);
        assert!(!config.display.require_baro_altitude);
        assert_eq!(config.cache.detail_capacity, 512);
        assert_eq!(config.arc.segments, 200);
        assert!(config.airports.file.is_none());
        assert!(config.logging.file.ends_with(DEFAULT_LOG_FILE_NAME));
    }

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.ini");

        let config = ConfigFile::load_from(&config_path).unwrap();
        assert_eq!(config.polling.interval_secs, DEFAULT_POLL_INTERVAL_SECS);
    }

    #[test]
    fn test_save_then_load_preserves_values() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        config.polling.interval_secs = 30;
        config.display.require_baro_altitude = true;
        config.credentials = vec![Credential::new("alice", "one"), Credential::new("bob", "two")];
        config.airports.file = Some(temp_dir.path().join("airports.json"));
        config.save_to(&config_path).unwrap();

        let loaded = ConfigFile::load_from(&config_path).unwrap();
        assert_eq!(loaded.polling.interval_secs, 30);
        assert!(loaded.display.require_baro_altitude);
        assert_eq!(loaded.credentials, config.credentials);
        assert_eq!(loaded.airports.file, config.airports.file);
    }

    #[test]
    fn test_passwords_with_backslashes_and_quotes_survive_save() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");

        let mut config = ConfigFile::default();
        config.credentials = vec![
            Credential::new("alice", r"a\tb"),
            Credential::new("bob", r#""quoted""#),
            Credential::new("carol", r"C:\path\n"),
            Credential::new("dave", "x=y;z#w"),
        ];
        config.save_to(&config_path).unwrap();

        let loaded = ConfigFile::load_from(&config_path).unwrap();
        let passwords: Vec<&str> = loaded.credentials.iter().map(|c| c.password()).collect();
        assert_eq!(passwords, vec![r"a\tb", r#""quoted""#, r"C:\path\n", "x=y;z#w"]);
    }
}
