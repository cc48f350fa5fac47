//! States command - one-shot load of the displayed aircraft.

use flightglobe::reconcile::LiveFeed;
use flightglobe::state::StateVector;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the states command.
pub struct StatesArgs {
    pub limit: usize,
    pub json: bool,
}

/// Fetch a snapshot, filter and sample it, and print the result.
pub async fn run(args: StatesArgs) -> Result<(), CliError> {
    let runner = CliRunner::new()?;
    runner.log_startup("states");
    let config = runner.config();

    let feed = LiveFeed::new(
        runner.create_client()?,
        config.validity_policy(),
        config.display.sample_fraction,
    );
    let states = feed.try_initial_load().await?;
    let shown = &states[..states.len().min(args.limit)];

    if args.json {
        let json = serde_json::to_string_pretty(shown)
            .map_err(|e| CliError::Config(format!("Failed to encode states: {}", e)))?;
        println!("{}", json);
        return Ok(());
    }

    println!(
        "{:>5}  {:<8} {:<9} {:>9} {:>10} {:>9} {:>7}  {}",
        "#", "ICAO24", "Callsign", "Lat", "Lon", "Alt(m)", "Hdg", "Country"
    );
    for (index, state) in shown.iter().enumerate() {
        println!("{}", format_row(index, state));
    }
    println!();
    println!("Showing {} of {} aircraft", shown.len(), states.len());
    Ok(())
}

fn format_row(index: usize, state: &StateVector) -> String {
    let number = |value: Option<f64>, precision: usize| {
        value.map_or_else(|| "-".to_string(), |v| format!("{:.*}", precision, v))
    };
    format!(
        "{:>5}  {:<8} {:<9} {:>9} {:>10} {:>9} {:>7}  {}",
        index,
        state.icao24,
        state.callsign.as_deref().unwrap_or("-"),
        number(state.latitude, 4),
        number(state.longitude, 4),
        number(state.baro_altitude, 0),
        number(state.true_track, 0),
        state.origin_country
    )
}
