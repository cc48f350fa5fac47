//! Snapshot published to the presentation layer.

use crate::geo::ArcSegment;
use crate::selection::SelectionPhase;
use crate::state::{DetailedStateVector, StateVector};

/// Notice shown when a full load failed and nothing is displayed.
pub const RATE_LIMIT_NOTICE: &str =
    "Failed to load aircraft data, the OpenSky rate limit may have been reached";

/// Everything a renderer needs for one frame of the session.
///
/// Published on a `watch` channel after every state change; `revision`
/// increases with each publication.
#[derive(Debug, Clone, Default)]
pub struct PresentationState {
    pub revision: u64,
    /// Aircraft currently shown, in display order.
    pub displayed: Vec<StateVector>,
    pub selection: SelectionPhase,
    /// Departure-to-aircraft arc for the selected aircraft. Empty when
    /// nothing is selected or the departure airport is unknown.
    pub arc_segments: Vec<ArcSegment>,
    /// A snapshot fetch is in flight.
    pub loading: bool,
    /// User-facing message, e.g. after a failed load.
    pub notice: Option<String>,
}

impl PresentationState {
    /// The selected aircraft's record, the loading placeholder included.
    pub fn detail(&self) -> Option<&DetailedStateVector> {
        match &self.selection {
            SelectionPhase::Idle => None,
            SelectionPhase::Selecting { placeholder, .. } => Some(placeholder),
            SelectionPhase::Selected { detail } => Some(detail),
        }
    }

    pub fn selected_icao24(&self) -> Option<&str> {
        self.detail().map(DetailedStateVector::icao24)
    }

    pub fn is_displayed(&self, icao24: &str) -> bool {
        self.displayed.iter().any(|s| s.icao24 == icao24)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty_and_idle() {
        let state = PresentationState::default();
        assert_eq!(state.revision, 0);
        assert!(state.displayed.is_empty());
        assert_eq!(state.selection, SelectionPhase::Idle);
        assert!(state.detail().is_none());
        assert!(state.notice.is_none());
    }

    #[test]
    fn test_detail_follows_selection_phase() {
        let aircraft = StateVector::new("abc123", "US").with_position(1.0, 2.0);
        let state = PresentationState {
            displayed: vec![aircraft.clone()],
            selection: SelectionPhase::Selected {
                detail: DetailedStateVector::unavailable(aircraft),
            },
            ..Default::default()
        };

        assert_eq!(state.selected_icao24(), Some("abc123"));
        assert!(state.is_displayed("abc123"));
        assert!(!state.is_displayed("zzz999"));
    }
}
