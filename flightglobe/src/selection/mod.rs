//! Aircraft selection: state machine and pointer gestures.

mod gesture;
mod machine;

pub use gesture::{PointerGesture, SelectionIntent};
pub use machine::{DetailTicket, RefreshOutcome, SelectionMachine, SelectionPhase};
