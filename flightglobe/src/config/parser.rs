//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;
use std::str::FromStr;

use super::defaults::MAX_ARC_SEGMENTS;
use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::opensky::Credential;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [opensky] section
    if let Some(section) = ini.section(Some("opensky")) {
        if let Some(v) = section.get("base_url") {
            let v = v.trim();
            if !(v.starts_with("https://") || v.starts_with("http://")) {
                return Err(invalid(
                    "opensky",
                    "base_url",
                    v,
                    "must be an http:// or https:// URL",
                ));
            }
            config.opensky.base_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = section.get("timeout_secs") {
            config.opensky.timeout_secs = parse_positive("opensky", "timeout_secs", v)?;
        }
        if let Some(v) = section.get("history_window_secs") {
            config.opensky.history_window_secs =
                parse_positive("opensky", "history_window_secs", v)?;
        }
    }

    // [credentials] section: ordered `username = password` pairs
    if let Some(section) = ini.section(Some("credentials")) {
        for (username, password) in section.iter() {
            let username = username.trim();
            if password.is_empty() {
                return Err(invalid(
                    "credentials",
                    username,
                    "",
                    "password must not be empty",
                ));
            }
            config
                .credentials
                .push(Credential::new(username, password.trim()));
        }
    }

    // [polling] section
    if let Some(section) = ini.section(Some("polling")) {
        if let Some(v) = section.get("interval_secs") {
            config.polling.interval_secs = parse_positive("polling", "interval_secs", v)?;
        }
    }

    // [display] section
    if let Some(section) = ini.section(Some("display")) {
        if let Some(v) = section.get("sample_fraction") {
            let fraction: f64 = v.trim().parse().map_err(|_| {
                invalid("display", "sample_fraction", v, "must be a number in (0, 1]")
            })?;
            if !(fraction > 0.0 && fraction <= 1.0) {
                return Err(invalid(
                    "display",
                    "sample_fraction",
                    v,
                    "must be a number in (0, 1]",
                ));
            }
            config.display.sample_fraction = fraction;
        }
        if let Some(v) = section.get("require_baro_altitude") {
            config.display.require_baro_altitude = parse_bool(v);
        }
    }

    // [cache] section
    if let Some(section) = ini.section(Some("cache")) {
        if let Some(v) = section.get("detail_capacity") {
            config.cache.detail_capacity = parse_positive("cache", "detail_capacity", v)?;
        }
    }

    // [arc] section
    if let Some(section) = ini.section(Some("arc")) {
        if let Some(v) = section.get("segments") {
            let segments: usize = parse_positive("arc", "segments", v)?;
            if segments > MAX_ARC_SEGMENTS {
                return Err(invalid(
                    "arc",
                    "segments",
                    v,
                    &format!("must not exceed {}", MAX_ARC_SEGMENTS),
                ));
            }
            config.arc.segments = segments;
        }
    }

    // [airports] section
    if let Some(section) = ini.section(Some("airports")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.airports.file = Some(expand_tilde(v));
            }
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Parse a strictly positive integer.
fn parse_positive<T>(section: &str, key: &str, value: &str) -> Result<T, ConfigFileError>
where
    T: FromStr + PartialOrd + Default,
{
    match value.trim().parse::<T>() {
        Ok(parsed) if parsed > T::default() => Ok(parsed),
        _ => Err(invalid(section, key, value, "must be a positive integer")),
    }
}

/// Parse a boolean value, accepting "true", "1", "yes" or "on".
pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::*;
    use tempfile::TempDir;

    fn load(content: &str) -> Result<ConfigFile, ConfigFileError> {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, content).unwrap();
        ConfigFile::load_from(&config_path)
    }

    #[test]
    fn test_partial_config() {
        let config = load(
            r#"
[opensky]
timeout_secs = 45

[display]
sample_fraction = 0.5
require_baro_altitude = yes
"#,
        )
        .unwrap();

        // Specified values
        assert_eq!(config.opensky.timeout_secs, 45);
        assert_eq!(config.display.sample_fraction, 0.5);
        assert!(config.display.require_baro_altitude);

        // Default values
        assert_eq!(config.polling.interval_secs, DEFAULT_POLL_INTERVAL_SECS);
        assert_eq!(config.opensky.base_url, "https://opensky-network.org/api");
    }

    #[test]
    fn test_credentials_keep_file_order() {
        let config = load(
            r#"
[credentials]
zoe = first-pass
adam = second-pass
mia = third-pass
"#,
        )
        .unwrap();

        let users: Vec<&str> = config
            .credentials
            .iter()
            .map(|c| c.username.as_str())
            .collect();
        assert_eq!(users, vec!["zoe", "adam", "mia"]);
        assert_eq!(config.credentials[1].password(), "second-pass");
    }

    #[test]
    fn test_invalid_interval() {
        let result = load("[polling]\ninterval_secs = 0\n");
        match result {
            Err(ConfigFileError::InvalidValue { section, key, .. }) => {
                assert_eq!(section, "polling");
                assert_eq!(key, "interval_secs");
            }
            other => panic!("expected InvalidValue, got {:?}", other),
        }

        assert!(load("[polling]\ninterval_secs = soon\n").is_err());
    }

    #[test]
    fn test_invalid_sample_fraction() {
        assert!(load("[display]\nsample_fraction = 0\n").is_err());
        assert!(load("[display]\nsample_fraction = 1.5\n").is_err());
        assert!(load("[display]\nsample_fraction = all\n").is_err());
        assert!(load("[display]\nsample_fraction = 1\n").is_ok());
    }

    #[test]
    fn test_invalid_base_url() {
        let result = load("[opensky]\nbase_url = opensky-network.org\n");
        assert!(matches!(result, Err(ConfigFileError::InvalidValue { .. })));
    }

    #[test]
    fn test_arc_segments_bounds() {
        assert!(load("[arc]\nsegments = 0\n").is_err());
        assert!(load("[arc]\nsegments = 20000\n").is_err());
        assert_eq!(load("[arc]\nsegments = 64\n").unwrap().arc.segments, 64);
    }

    #[test]
    fn test_empty_airport_file_is_none() {
        let config = load("[airports]\nfile =\n").unwrap();
        assert!(config.airports.file.is_none());
    }

    #[test]
    fn test_expand_tilde() {
        let expanded = expand_tilde("~/airports.json");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expanded, home.join("airports.json"));
        }
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
    }

    #[test]
    fn test_parse_bool_values() {
        for v in ["true", "TRUE", "1", "yes", "on"] {
            assert!(parse_bool(v), "{} should be true", v);
        }
        for v in ["false", "0", "no", "off", ""] {
            assert!(!parse_bool(v), "{} should be false", v);
        }
    }
}
