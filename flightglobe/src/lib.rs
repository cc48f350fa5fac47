//! FlightGlobe - live aircraft tracking for globe visualizations
//!
//! This library provides the core of a 3D globe flight tracker: polling the
//! OpenSky Network for aircraft positions, resolving the selected aircraft's
//! flight history, and computing the departure-to-aircraft arc drawn on the
//! globe.
//!
//! # High-Level API
//!
//! The [`controller`] module ties everything into a single session:
//!
//! ```ignore
//! use std::sync::Arc;
//! use flightglobe::airport::AirportIndex;
//! use flightglobe::config::ConfigFile;
//! use flightglobe::controller::FlightController;
//! use flightglobe::opensky::OpenSkyClient;
//! use flightglobe::selection::SelectionIntent;
//!
//! let config = ConfigFile::load()?;
//! let api = Arc::new(OpenSkyClient::from_config(&config.opensky_config())?);
//! let airports = Arc::new(AirportIndex::default());
//!
//! let handle = FlightController::from_config(api, &config, airports).spawn();
//! handle.send(SelectionIntent::SelectIndex(0)).await?;
//! let state = handle.current();
//! ```

pub mod airport;
pub mod config;
pub mod controller;
pub mod detail;
pub mod geo;
pub mod logging;
pub mod opensky;
pub mod reconcile;
pub mod selection;
pub mod state;

#[cfg(test)]
mod test_support;

/// Version of the FlightGlobe library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
