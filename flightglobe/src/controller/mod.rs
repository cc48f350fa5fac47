//! Session controller.
//!
//! A single tokio task owns the displayed aircraft, the selection and the
//! detail cache. It multiplexes:
//!
//! - the poll interval (live updates; ticks during a fetch are dropped)
//! - the in-flight snapshot fetch (at most one)
//! - in-flight detail fetches, each tagged with its selection ticket
//! - [`SelectionIntent`](crate::selection::SelectionIntent)s from the presentation layer
//! - a cancellation token
//!
//! After every change a [`PresentationState`] is published on a `watch`
//! channel. [`ControllerHandle`] is the presentation-side end of both
//! channels.

mod handle;
mod session;
mod state;

pub use handle::{ControllerError, ControllerHandle};
pub use session::{FlightController, DEFAULT_INTENT_BUFFER, MIN_POLL_INTERVAL};
pub use state::{PresentationState, RATE_LIMIT_NOTICE};
