//! Run command - interactive tracking session.
//!
//! Starts the controller and prints a summary of every published state.
//! Intents are read from stdin, one per line:
//!
//! ```text
//! select <icao24>   select an aircraft by address
//! select #<index>   select the n-th displayed aircraft
//! clear             deselect
//! refresh           reload from a fresh snapshot
//! quit              end the session
//! ```

use std::sync::Arc;

use flightglobe::airport::{detail_rows, AirportIndex};
use flightglobe::controller::{FlightController, PresentationState};
use flightglobe::selection::{SelectionIntent, SelectionPhase};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use crate::error::CliError;
use crate::runner::CliRunner;

/// One line of user input.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Intent(SelectionIntent),
    Help,
    Quit,
}

/// Run the interactive session until `quit`, end of input or Ctrl+C.
pub async fn run(debug: bool) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(debug)?;
    runner.log_startup("run");

    let api = runner.create_client()?;
    let airports = Arc::new(runner.load_airports()?);
    let handle = FlightController::from_config(api, runner.config(), Arc::clone(&airports)).spawn();

    println!(
        "FlightGlobe v{} - polling every {}s. Type 'help' for commands.",
        flightglobe::VERSION,
        runner.config().polling.interval_secs
    );

    let mut states = handle.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last_selection: Option<(String, &'static str)> = None;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }

            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = states.borrow_and_update().clone();
                print_state(&state, &airports, &mut last_selection);
            }

            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_input(&line) {
                    Ok(Some(Input::Intent(intent))) => handle.send(intent).await?,
                    Ok(Some(Input::Help)) => print_help(),
                    Ok(Some(Input::Quit)) => break,
                    Ok(None) => {}
                    Err(message) => println!("{}", message),
                }
            }
        }
    }

    handle.shutdown().await?;
    println!("Session ended.");
    Ok(())
}

fn parse_input(line: &str) -> Result<Option<Input>, String> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };

    let input = match (command.to_lowercase().as_str(), words.next()) {
        ("select" | "s", Some(target)) => match target.strip_prefix('#') {
            Some(index) => {
                let index = index
                    .parse::<usize>()
                    .map_err(|_| format!("Not an index: {}", target))?;
                Input::Intent(SelectionIntent::SelectIndex(index))
            }
            None => Input::Intent(SelectionIntent::Select(target.to_string())),
        },
        ("select" | "s", None) => return Err("Usage: select <icao24> | select #<index>".into()),
        ("clear" | "c", _) => Input::Intent(SelectionIntent::Clear),
        ("refresh" | "r", _) => Input::Intent(SelectionIntent::Refresh),
        ("help" | "?", _) => Input::Help,
        ("quit" | "exit" | "q", _) => Input::Quit,
        (other, _) => return Err(format!("Unknown command '{}'. Type 'help'.", other)),
    };
    Ok(Some(input))
}

fn print_help() {
    println!("Commands:");
    println!("  select <icao24>   select an aircraft by address");
    println!("  select #<index>   select the n-th displayed aircraft");
    println!("  clear             deselect");
    println!("  refresh           reload from a fresh snapshot");
    println!("  quit              end the session");
}

fn print_state(
    state: &PresentationState,
    airports: &AirportIndex,
    last_selection: &mut Option<(String, &'static str)>,
) {
    if let Some(notice) = &state.notice {
        println!("! {}", notice);
    }

    let loading = if state.loading { " (updating)" } else { "" };
    println!(
        "[{}] {} aircraft displayed{}",
        state.revision,
        state.displayed.len(),
        loading
    );

    let current = state
        .detail()
        .map(|d| (d.icao24().to_string(), state.selection.name()));
    if current == *last_selection {
        return;
    }
    *last_selection = current;

    match &state.selection {
        SelectionPhase::Idle => println!("  no selection"),
        SelectionPhase::Selecting { .. } | SelectionPhase::Selected { .. } => {
            if let Some(detail) = state.detail() {
                for (label, value) in detail_rows(detail, airports) {
                    println!("  {:<22} {}", label, value);
                }
            }
            if !state.arc_segments.is_empty() {
                println!("  {:<22} {} segments", "Arc", state.arc_segments.len());
            }
        }
    }
}
