//! FlightGlobe CLI - Command-line interface
//!
//! This binary provides a command-line interface to the FlightGlobe library.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};

use commands::arc::ArcArgs;
use commands::config::ConfigCommands;
use commands::states::StatesArgs;

#[derive(Parser)]
#[command(name = "flightglobe")]
#[command(version = flightglobe::VERSION)]
#[command(about = "Live aircraft tracking from the OpenSky Network", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive tracking session
    Run {
        /// Enable debug logging
        #[arg(long)]
        debug: bool,
    },

    /// Load and list the displayed aircraft once
    States {
        /// Maximum number of rows to print
        #[arg(long, default_value = "50")]
        limit: usize,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the flight history of one aircraft
    Detail {
        /// ICAO24 transponder address (e.g. 3c6444)
        icao24: String,
    },

    /// Print the arc from an airport to a position as JSON
    Arc {
        /// Departure airport ICAO code
        #[arg(long)]
        airport: String,

        /// Latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Altitude as a fraction of the globe radius
        #[arg(long, default_value = "0.05")]
        alt: f64,

        /// Samples per arc part (default: from config)
        #[arg(long)]
        segments: Option<usize>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { debug } => commands::run::run(debug).await,
        Commands::States { limit, json } => {
            commands::states::run(StatesArgs { limit, json }).await
        }
        Commands::Detail { icao24 } => commands::detail::run(&icao24).await,
        Commands::Arc {
            airport,
            lat,
            lon,
            alt,
            segments,
        } => commands::arc::run(ArcArgs {
            airport,
            lat,
            lon,
            alt,
            segments,
        }),
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}
