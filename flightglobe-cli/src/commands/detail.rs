//! Detail command - flight history for one aircraft.

use flightglobe::airport::detail_rows;
use flightglobe::detail::{DetailCache, DetailFetcher};
use flightglobe::reconcile::LiveFeed;
use flightglobe::state::ValidityPolicy;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Find `icao24` in a fresh snapshot and print its detail panel.
pub async fn run(icao24: &str) -> Result<(), CliError> {
    let runner = CliRunner::new()?;
    runner.log_startup("detail");
    let config = runner.config();

    let api = runner.create_client()?;
    let airports = runner.load_airports()?;

    // Unsampled, so any airborne aircraft can be looked up
    let feed = LiveFeed::new(api.clone(), ValidityPolicy::LENIENT, 1.0);
    let key = icao24.trim().to_lowercase();
    let states = feed.try_initial_load().await?;
    let Some(state) = states.into_iter().find(|s| s.icao24 == key) else {
        return Err(CliError::AircraftNotFound(key));
    };

    let mut fetcher = DetailFetcher::new(
        api,
        DetailCache::new(config.cache.detail_capacity),
        config.history_window(),
    );
    let detail = fetcher.resolve_detail(&state).await;

    for (label, value) in detail_rows(&detail, &airports) {
        println!("{:<22} {}", label, value);
    }
    if let Some(record) = detail.record() {
        println!("{:<22} {}", "First Seen", format_time(record.first_seen));
        println!("{:<22} {}", "Last Seen", format_time(record.last_seen));
    }
    Ok(())
}

fn format_time(unix_secs: i64) -> String {
    chrono::DateTime::from_timestamp(unix_secs, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| unix_secs.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "1970-01-01 00:00:00 UTC");
        assert_eq!(format_time(1_700_000_000), "2023-11-14 22:13:20 UTC");
    }
}
