//! Selection state machine.
//!
//! ```text
//!            select                complete(current ticket)
//!   Idle ─────────────▶ Selecting ─────────────────────────▶ Selected
//!    ▲                   │    ▲                                  │
//!    │       clear       │    └──────────── select ──────────────┘
//!    └───────────────────┴──────────────────────────────────────┘
//! ```
//!
//! Every `select` and `clear` bumps a generation counter. A detail fetch
//! carries the [`DetailTicket`] it was issued with; its result is applied
//! only while that ticket's generation is still the current one, so the most
//! recent selection always wins no matter in which order fetches complete.

use serde::Serialize;

use crate::state::{DetailedStateVector, StateVector};

/// Identifies the selection a detail fetch was issued for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DetailTicket {
    pub icao24: String,
    pub generation: u64,
}

/// Current selection state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SelectionPhase {
    /// Nothing selected.
    #[default]
    Idle,
    /// An aircraft is selected and its detail is loading.
    Selecting {
        #[serde(skip)]
        ticket: DetailTicket,
        placeholder: DetailedStateVector,
    },
    /// Detail resolved (possibly as unavailable).
    Selected { detail: DetailedStateVector },
}

impl SelectionPhase {
    pub fn name(&self) -> &'static str {
        match self {
            SelectionPhase::Idle => "idle",
            SelectionPhase::Selecting { .. } => "selecting",
            SelectionPhase::Selected { .. } => "selected",
        }
    }
}

/// What a [`SelectionMachine::refresh`] did to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Nothing selected, or the selected aircraft did not change.
    Unchanged,
    /// The selected aircraft's live fields were updated.
    Patched,
    /// The selected aircraft left the displayed set; selection cleared.
    Cleared,
}

/// Owns the selection and decides which detail results may be applied.
#[derive(Debug)]
pub struct SelectionMachine {
    phase: SelectionPhase,
    generation: u64,
}

impl Default for SelectionMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionMachine {
    pub fn new() -> Self {
        Self {
            phase: SelectionPhase::Idle,
            generation: 0,
        }
    }

    pub fn phase(&self) -> &SelectionPhase {
        &self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The selected aircraft's record: the placeholder while loading.
    pub fn detail(&self) -> Option<&DetailedStateVector> {
        match &self.phase {
            SelectionPhase::Idle => None,
            SelectionPhase::Selecting { placeholder, .. } => Some(placeholder),
            SelectionPhase::Selected { detail } => Some(detail),
        }
    }

    pub fn selected_icao24(&self) -> Option<&str> {
        self.detail().map(DetailedStateVector::icao24)
    }

    /// True if results for `ticket` would still be applied.
    pub fn is_current(&self, ticket: &DetailTicket) -> bool {
        matches!(
            &self.phase,
            SelectionPhase::Selecting { ticket: current, .. } if current == ticket
        )
    }

    /// Select an aircraft, abandoning any pending selection.
    ///
    /// Returns the ticket the detail fetch must present on completion.
    pub fn select(&mut self, state: StateVector) -> DetailTicket {
        self.generation += 1;
        let ticket = DetailTicket {
            icao24: state.icao24.clone(),
            generation: self.generation,
        };

        tracing::debug!(
            icao24 = %ticket.icao24,
            generation = ticket.generation,
            "Aircraft selected"
        );

        self.phase = SelectionPhase::Selecting {
            ticket: ticket.clone(),
            placeholder: DetailedStateVector::loading(state),
        };
        ticket
    }

    /// Apply a resolved detail for `ticket`.
    ///
    /// Returns false, leaving the selection untouched, when the ticket is
    /// stale. Live fields come from the placeholder, which may have been
    /// refreshed while the fetch was in flight.
    pub fn complete(&mut self, ticket: &DetailTicket, resolved: DetailedStateVector) -> bool {
        if !self.is_current(ticket) {
            tracing::trace!(
                icao24 = %ticket.icao24,
                generation = ticket.generation,
                current = self.generation,
                "Discarding stale detail result"
            );
            return false;
        }

        let previous = std::mem::replace(&mut self.phase, SelectionPhase::Idle);
        let state = match previous {
            SelectionPhase::Selecting { placeholder, .. } => placeholder.state,
            _ => resolved.state,
        };

        self.phase = SelectionPhase::Selected {
            detail: DetailedStateVector {
                state,
                detail: resolved.detail,
            },
        };
        true
    }

    /// Deselect. Pending detail results become stale.
    ///
    /// Returns true if something was selected.
    pub fn clear(&mut self) -> bool {
        self.generation += 1;
        let was_selected = !matches!(self.phase, SelectionPhase::Idle);
        if was_selected {
            tracing::debug!(generation = self.generation, "Selection cleared");
        }
        self.phase = SelectionPhase::Idle;
        was_selected
    }

    /// Follow a new displayed set.
    ///
    /// The selected record's live fields are patched in place; if the
    /// aircraft is no longer displayed the selection is cleared.
    pub fn refresh(&mut self, displayed: &[StateVector]) -> RefreshOutcome {
        let Some(icao24) = self.selected_icao24() else {
            return RefreshOutcome::Unchanged;
        };

        let Some(fresh) = displayed.iter().find(|s| s.icao24 == icao24) else {
            tracing::debug!(icao24, "Selected aircraft left the displayed set");
            self.clear();
            return RefreshOutcome::Cleared;
        };

        let record = match &mut self.phase {
            SelectionPhase::Selecting { placeholder, .. } => placeholder,
            SelectionPhase::Selected { detail } => detail,
            SelectionPhase::Idle => return RefreshOutcome::Unchanged,
        };

        if record.state == *fresh {
            return RefreshOutcome::Unchanged;
        }
        if record.patch(fresh) {
            RefreshOutcome::Patched
        } else {
            RefreshOutcome::Unchanged
        }
    }
}
