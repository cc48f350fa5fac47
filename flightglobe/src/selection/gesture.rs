//! Pointer gesture interpretation.
//!
//! A press followed by a release with no movement in between is a click:
//! on a marker it selects that aircraft, on empty space it deselects. Any
//! movement turns the press into a drag, which deselects on release.

/// Request from the presentation layer to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionIntent {
    /// Select the aircraft with this ICAO24 address.
    Select(String),
    /// Select the aircraft at this position in the displayed list.
    SelectIndex(usize),
    /// Deselect.
    Clear,
    /// Reload the displayed set from a fresh snapshot.
    Refresh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Stage {
    #[default]
    Released,
    Pressed,
    Dragging,
}

/// Tracks one pointer's down/move/up sequence.
#[derive(Debug, Default)]
pub struct PointerGesture {
    stage: Stage,
}

impl PointerGesture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn down(&mut self) {
        self.stage = Stage::Pressed;
    }

    /// Pointer movement. Only matters while pressed.
    pub fn moved(&mut self) {
        if self.stage == Stage::Pressed {
            self.stage = Stage::Dragging;
        }
    }

    /// Pointer release over `marker` (the hit aircraft, if any).
    ///
    /// Returns `None` for a release without a preceding press.
    pub fn up(&mut self, marker: Option<&str>) -> Option<SelectionIntent> {
        let stage = std::mem::take(&mut self.stage);
        match (stage, marker) {
            (Stage::Released, _) => None,
            (Stage::Pressed, Some(icao24)) => Some(SelectionIntent::Select(icao24.to_string())),
            (Stage::Pressed, None) | (Stage::Dragging, _) => Some(SelectionIntent::Clear),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_on_marker_selects() {
        let mut gesture = PointerGesture::new();
        gesture.down();
        assert_eq!(
            gesture.up(Some("abc123")),
            Some(SelectionIntent::Select("abc123".to_string()))
        );
    }

    #[test]
    fn test_click_on_empty_space_clears() {
        let mut gesture = PointerGesture::new();
        gesture.down();
        assert_eq!(gesture.up(None), Some(SelectionIntent::Clear));
    }

    #[test]
    fn test_drag_clears_even_over_marker() {
        let mut gesture = PointerGesture::new();
        gesture.down();
        gesture.moved();
        gesture.moved();
        assert_eq!(gesture.up(Some("abc123")), Some(SelectionIntent::Clear));
    }

    #[test]
    fn test_hover_and_stray_release_do_nothing() {
        let mut gesture = PointerGesture::new();
        gesture.moved();
        assert_eq!(gesture.up(Some("abc123")), None);

        // Each release consumes the press
        gesture.down();
        gesture.up(None);
        assert_eq!(gesture.up(None), None);
    }
}
