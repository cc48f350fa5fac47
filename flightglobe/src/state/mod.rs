//! Aircraft state records.
//!
//! - [`StateVector`] - one aircraft's instantaneous state from a poll
//! - [`FlightRecord`] - estimated flight history for one aircraft
//! - [`DetailedStateVector`] - state vector plus resolved history
//! - [`normalize`] - raw row parsing, display altitude and validity filtering

mod detailed;
pub mod normalize;
mod record;
mod vector;

pub use detailed::{DetailedStateVector, FlightDetail, LOADING_LABEL, UNKNOWN_LABEL};
pub use normalize::{display_altitude, is_displayable, ValidityPolicy};
pub use record::{most_recent, FlightRecord};
pub use vector::{PositionSource, StateVector};
