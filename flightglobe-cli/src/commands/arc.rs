//! Arc command - print the flight arc from an airport to a position.

use flightglobe::airport::Airport;
use flightglobe::config::MAX_ARC_SEGMENTS;
use flightglobe::geo::{ArcPath, FlightArcBuilder, SphericalProjection};
use serde_json::json;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the arc command.
pub struct ArcArgs {
    pub airport: String,
    pub lat: f64,
    pub lon: f64,
    pub alt: f64,
    pub segments: Option<usize>,
}

/// Build the arc and print its segments as JSON.
pub fn run(args: ArcArgs) -> Result<(), CliError> {
    validate(&args)?;

    let runner = CliRunner::new()?;
    runner.log_startup("arc");

    let airports = runner.require_airports()?;
    let airport = airports.get(&args.airport).ok_or_else(|| {
        CliError::Config(format!("Airport '{}' is not in the dataset", args.airport))
    })?;

    let segments = args.segments.unwrap_or(runner.config().arc.segments);
    let builder = FlightArcBuilder::new(SphericalProjection::default(), segments);
    let path = builder.between((airport.lat, airport.lon), (args.lat, args.lon, args.alt));

    println!("{}", render(airport, &args, &path)?);
    Ok(())
}

fn validate(args: &ArcArgs) -> Result<(), CliError> {
    if !(-90.0..=90.0).contains(&args.lat) || !(-180.0..=180.0).contains(&args.lon) {
        return Err(CliError::Config(format!(
            "Position out of range: lat {} lon {}",
            args.lat, args.lon
        )));
    }
    match args.segments {
        Some(segments) if segments == 0 || segments > MAX_ARC_SEGMENTS => {
            Err(CliError::Config(format!(
                "--segments must be between 1 and {}, got {}",
                MAX_ARC_SEGMENTS, segments
            )))
        }
        _ => Ok(()),
    }
}

fn render(airport: &Airport, args: &ArcArgs, path: &ArcPath) -> Result<String, CliError> {
    let output = json!({
        "airport": airport.icao,
        "from": [airport.lat, airport.lon],
        "to": [args.lat, args.lon, args.alt],
        "segments": path.segments().iter().map(|s| s.to_arrays()).collect::<Vec<_>>(),
    });
    serde_json::to_string_pretty(&output)
        .map_err(|e| CliError::Config(format!("Failed to encode arc: {}", e)))
}
