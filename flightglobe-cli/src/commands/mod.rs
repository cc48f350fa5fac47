//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`arc`] - Flight arc geometry as JSON
//! - [`config`] - Configuration management (path, show, init)
//! - [`detail`] - Flight history for one aircraft
//! - [`run`] - Interactive tracking session
//! - [`states`] - One-shot aircraft listing

pub mod arc;
pub mod config;
pub mod detail;
pub mod run;
pub mod states;
