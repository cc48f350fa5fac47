//! Configuration management CLI commands.
//!
//! Provides `config path`, `config show` and `config init`.

use clap::Subcommand;
use flightglobe::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Show the effective configuration
    Show,

    /// Write a default configuration file if none exists
    Init {
        /// Overwrite an existing file with defaults
        #[arg(long)]
        force: bool,
    },
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => run_path(),
        ConfigCommands::Show => run_show(),
        ConfigCommands::Init { force } => run_init(force),
    }
}

fn run_path() -> Result<(), CliError> {
    println!("{}", config_file_path().display());
    Ok(())
}

fn run_show() -> Result<(), CliError> {
    let path = config_file_path();
    let config = ConfigFile::load()?;

    println!("Configuration ({})", path.display());
    if !path.exists() {
        println!("(file not found, showing defaults)");
    }
    println!();

    println!("[opensky]");
    println!("  base_url            = {}", config.opensky.base_url);
    println!("  timeout_secs        = {}", config.opensky.timeout_secs);
    println!("  history_window_secs = {}", config.opensky.history_window_secs);
    println!();

    println!("[credentials]");
    if config.credentials.is_empty() {
        println!("  (anonymous only)");
    }
    for credential in &config.credentials {
        println!("  {} = ********", credential.username);
    }
    println!();

    println!("[polling]");
    println!("  interval_secs       = {}", config.polling.interval_secs);
    println!();

    println!("[display]");
    println!("  sample_fraction       = {}", config.display.sample_fraction);
    println!(
        "  require_baro_altitude = {}",
        config.display.require_baro_altitude
    );
    println!();

    println!("[cache]");
    println!("  detail_capacity     = {}", config.cache.detail_capacity);
    println!();

    println!("[arc]");
    println!("  segments            = {}", config.arc.segments);
    println!();

    println!("[airports]");
    match &config.airports.file {
        Some(file) => println!("  file                = {}", file.display()),
        None => println!("  file                = (not set)"),
    }
    println!();

    println!("[logging]");
    println!("  file                = {}", config.logging.file.display());

    Ok(())
}

fn run_init(force: bool) -> Result<(), CliError> {
    let path = config_file_path();
    if path.exists() && !force {
        println!("Configuration already exists at {}", path.display());
        println!("Use --force to overwrite it with defaults.");
        return Ok(());
    }

    ConfigFile::default().save_to(&path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}
