//! Live update reconciliation.
//!
//! A poll never adds aircraft to the displayed set: each displayed aircraft
//! is either replaced by its fresh record or dropped. New aircraft only
//! appear through a full load ([`LiveFeed::initial_load`]).
//!
//! Display altitudes are assigned once, when an aircraft first enters the
//! set, and are carried forward on every later update so markers do not
//! jump vertically between polls.

use std::collections::HashMap;
use std::sync::Arc;

use crate::opensky::{ApiError, FlightDataApi};
use crate::state::normalize::{filter_displayable, parse_states, sample};
use crate::state::{is_displayable, StateVector, ValidityPolicy};

/// Default fraction of eligible aircraft kept on a full load.
pub const DEFAULT_SAMPLE_FRACTION: f64 = 0.2;

/// Reconcile the displayed set against a fresh snapshot.
///
/// `fresh` may contain every aircraft the API returned; the lookup is built
/// before filtering so that an aircraft which landed is found and dropped
/// rather than silently kept.
pub fn reconcile(
    previous: &[StateVector],
    fresh: Vec<StateVector>,
    policy: ValidityPolicy,
) -> Vec<StateVector> {
    let mut lookup: HashMap<String, StateVector> = fresh
        .into_iter()
        .map(|state| (state.icao24.clone(), state))
        .collect();

    let mut updated = Vec::with_capacity(previous.len());
    let mut dropped = 0usize;

    for old in previous {
        match lookup.remove(&old.icao24) {
            Some(mut state) if is_displayable(&state, policy) => {
                if state.moved_from(old) {
                    tracing::trace!(
                        icao24 = %state.icao24,
                        lat = state.latitude,
                        lon = state.longitude,
                        track = state.true_track,
                        "Aircraft moved"
                    );
                }
                state.display_altitude = old.display_altitude;
                updated.push(state);
            }
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        tracing::debug!(
            dropped,
            remaining = updated.len(),
            "Dropped aircraft no longer airborne or tracked"
        );
    }

    updated
}

/// Copy display altitudes of already-known aircraft onto a reloaded set.
///
/// Used by full reloads, where new aircraft may enter but known ones must
/// keep their altitude.
pub fn carry_forward_altitudes(previous: &[StateVector], reloaded: &mut [StateVector]) {
    let known: HashMap<&str, f64> = previous
        .iter()
        .map(|state| (state.icao24.as_str(), state.display_altitude))
        .collect();

    for state in reloaded.iter_mut() {
        if let Some(altitude) = known.get(state.icao24.as_str()) {
            state.display_altitude = *altitude;
        }
    }
}

/// Polls an API for snapshots and turns them into displayed sets.
pub struct LiveFeed<A: FlightDataApi> {
    api: Arc<A>,
    policy: ValidityPolicy,
    sample_fraction: f64,
}

impl<A: FlightDataApi> Clone for LiveFeed<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            policy: self.policy,
            sample_fraction: self.sample_fraction,
        }
    }
}

impl<A: FlightDataApi> LiveFeed<A> {
    pub fn new(api: Arc<A>, policy: ValidityPolicy, sample_fraction: f64) -> Self {
        Self {
            api,
            policy,
            sample_fraction,
        }
    }

    pub fn policy(&self) -> ValidityPolicy {
        self.policy
    }

    /// Fetch a full snapshot and select the aircraft to display.
    pub async fn try_initial_load(&self) -> Result<Vec<StateVector>, ApiError> {
        let response = self.api.all_states().await?;
        let eligible = filter_displayable(parse_states(response.rows()), self.policy);
        let eligible_count = eligible.len();
        let displayed = sample(eligible, self.sample_fraction, &mut rand::rng());

        tracing::info!(
            eligible = eligible_count,
            displayed = displayed.len(),
            sample_fraction = self.sample_fraction,
            "Loaded aircraft"
        );
        Ok(displayed)
    }

    /// Like [`try_initial_load`](Self::try_initial_load), but an empty set on failure.
    pub async fn initial_load(&self) -> Vec<StateVector> {
        match self.try_initial_load().await {
            Ok(states) => states,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Failed to load aircraft, rate limit may have been reached"
                );
                Vec::new()
            }
        }
    }

    /// Fetch a snapshot and reconcile `previous` against it.
    ///
    /// An empty `previous` returns immediately without a request.
    pub async fn try_update(
        &self,
        previous: Vec<StateVector>,
    ) -> Result<Vec<StateVector>, ApiError> {
        if previous.is_empty() {
            return Ok(previous);
        }

        let response = self.api.all_states().await?;
        Ok(reconcile(
            &previous,
            parse_states(response.rows()),
            self.policy,
        ))
    }

    /// Like [`try_update`](Self::try_update), but returns `previous` unchanged on failure.
    pub async fn update(&self, previous: Vec<StateVector>) -> Vec<StateVector> {
        if previous.is_empty() {
            return previous;
        }

        match self.api.all_states().await {
            Ok(response) => reconcile(&previous, parse_states(response.rows()), self.policy),
            Err(e) => {
                tracing::warn!(error = %e, "Live update failed, keeping previous positions");
                previous
            }
        }
    }

    /// Full reload: new aircraft may enter, known ones keep their display altitude.
    pub async fn try_reload(
        &self,
        previous: &[StateVector],
    ) -> Result<Vec<StateVector>, ApiError> {
        let mut reloaded = self.try_initial_load().await?;
        carry_forward_altitudes(previous, &mut reloaded);
        Ok(reloaded)
    }
}
