//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let credentials: String = config
        .credentials
        .iter()
        .map(|c| format!("{} = {}\n", c.username, c.password()))
        .collect();
    let airports_file = config
        .airports
        .file
        .as_ref()
        .map(|p| path_to_string(p))
        .unwrap_or_default();
    let require_baro_altitude = if config.display.require_baro_altitude {
        "true"
    } else {
        "false"
    };

    format!(
        r#"[opensky]
; OpenSky Network REST API root
base_url = {}
; HTTP request timeout in seconds
timeout_secs = {}
; How far back to search for an aircraft's flights, in seconds (default: 86400 = 1 day)
history_window_secs = {}

[credentials]
; Accounts tried in order once anonymous access is rate limited.
; One `username = password` per line. Leave empty for anonymous only.
{}
[polling]
; Seconds between live position updates
interval_secs = {}

[display]
; Fraction of airborne aircraft shown after a full load, in (0, 1]
sample_fraction = {}
; Hide aircraft that report no barometric altitude
require_baro_altitude = {}

[cache]
; Maximum number of flight records kept in memory
detail_capacity = {}

[arc]
; Samples per arc part (cruise and lift-off)
segments = {}

[airports]
; airports.json or airports.json.gz keyed by ICAO code.
; Without it no flight arcs are drawn and airport names show as codes.
file = {}

[logging]
; Log file location
file = {}
"#,
        config.opensky.base_url,
        config.opensky.timeout_secs,
        config.opensky.history_window_secs,
        credentials,
        config.polling.interval_secs,
        config.display.sample_fraction,
        require_baro_altitude,
        config.cache.detail_capacity,
        config.arc.segments,
        airports_file,
        path_to_string(&config.logging.file),
    )
}

/// Convert path to string, replacing home directory with ~.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
