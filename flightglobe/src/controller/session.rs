//! The controller task and its event loop.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use super::handle::ControllerHandle;
use super::state::{PresentationState, RATE_LIMIT_NOTICE};
use crate::airport::AirportIndex;
use crate::config::ConfigFile;
use crate::detail::{fetch_latest_flight, DetailCache, DetailFetcher};
use crate::geo::{FlightArcBuilder, SphericalProjection};
use crate::opensky::{ApiError, FlightDataApi};
use crate::reconcile::LiveFeed;
use crate::selection::{RefreshOutcome, SelectionIntent, SelectionMachine, SelectionPhase};
use crate::state::{FlightRecord, StateVector};

/// Capacity of the intent channel.
pub const DEFAULT_INTENT_BUFFER: usize = 32;

/// Shortest poll interval the controller accepts.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchKind {
    /// Full snapshot; new aircraft may enter.
    Reload,
    /// Reconcile the displayed set; nothing new enters.
    Update,
}

type SnapshotFuture = BoxFuture<'static, (FetchKind, Result<Vec<StateVector>, ApiError>)>;
type DetailFuture = BoxFuture<'static, (StateVector, Result<Option<FlightRecord>, ApiError>)>;

/// Session controller: owns the displayed set, the selection and the
/// detail cache, and drives them from poll ticks and presentation intents.
///
/// Nothing happens until [`spawn`](Self::spawn) moves it onto a task.
pub struct FlightController<A: FlightDataApi + 'static> {
    feed: LiveFeed<A>,
    fetcher: DetailFetcher<A>,
    arcs: FlightArcBuilder,
    airports: Arc<AirportIndex>,
    poll_interval: Duration,
}

impl<A: FlightDataApi + 'static> FlightController<A> {
    /// Intervals shorter than [`MIN_POLL_INTERVAL`] are raised to it.
    pub fn new(
        feed: LiveFeed<A>,
        fetcher: DetailFetcher<A>,
        arcs: FlightArcBuilder,
        airports: Arc<AirportIndex>,
        poll_interval: Duration,
    ) -> Self {
        if poll_interval < MIN_POLL_INTERVAL {
            warn!(
                requested_ms = poll_interval.as_millis() as u64,
                "Poll interval too short, using minimum"
            );
        }
        Self {
            feed,
            fetcher,
            arcs,
            airports,
            poll_interval: poll_interval.max(MIN_POLL_INTERVAL),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Wire a controller from user configuration.
    pub fn from_config(api: Arc<A>, config: &ConfigFile, airports: Arc<AirportIndex>) -> Self {
        let feed = LiveFeed::new(
            Arc::clone(&api),
            config.validity_policy(),
            config.display.sample_fraction,
        );
        let fetcher = DetailFetcher::new(
            api,
            DetailCache::new(config.cache.detail_capacity),
            config.history_window(),
        );
        let arcs = FlightArcBuilder::new(SphericalProjection::default(), config.arc.segments);
        Self::new(feed, fetcher, arcs, airports, config.poll_interval())
    }

    /// Start the session on the current tokio runtime.
    ///
    /// The initial full load starts immediately; live updates follow every
    /// poll interval.
    pub fn spawn(self) -> ControllerHandle {
        let (intent_tx, intent_rx) = mpsc::channel(DEFAULT_INTENT_BUFFER);
        let (state_tx, state_rx) = watch::channel(PresentationState::default());
        let cancel = CancellationToken::new();

        let session = Session {
            feed: self.feed,
            fetcher: self.fetcher,
            arcs: self.arcs,
            airports: self.airports,
            selection: SelectionMachine::new(),
            displayed: Vec::new(),
            snapshot: None,
            reload_requested: false,
            details: FuturesUnordered::new(),
            pending_details: HashSet::new(),
            notice: None,
            revision: 0,
            state_tx,
        };

        let task = tokio::spawn(session.run(self.poll_interval, intent_rx, cancel.clone()));
        ControllerHandle::new(intent_tx, state_rx, cancel, task)
    }
}

/// Mutable state owned by the controller task.
struct Session<A: FlightDataApi + 'static> {
    feed: LiveFeed<A>,
    fetcher: DetailFetcher<A>,
    arcs: FlightArcBuilder,
    airports: Arc<AirportIndex>,
    selection: SelectionMachine,
    displayed: Vec<StateVector>,
    /// At most one snapshot fetch at a time.
    snapshot: Option<SnapshotFuture>,
    reload_requested: bool,
    details: FuturesUnordered<DetailFuture>,
    /// Aircraft with a detail fetch in `details`.
    pending_details: HashSet<String>,
    notice: Option<String>,
    revision: u64,
    state_tx: watch::Sender<PresentationState>,
}

impl<A: FlightDataApi + 'static> Session<A> {
    async fn run(
        mut self,
        poll_interval: Duration,
        mut intents: mpsc::Receiver<SelectionIntent>,
        cancel: CancellationToken,
    ) {
        info!(
            poll_interval_secs = poll_interval.as_secs_f64(),
            airports = self.airports.len(),
            "Flight controller starting"
        );

        let mut ticker = tokio::time::interval_at(Instant::now() + poll_interval, poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        self.start_snapshot(FetchKind::Reload);
        self.publish();

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    info!("Flight controller shutting down");
                    break;
                }

                (kind, result) = next_snapshot(&mut self.snapshot), if self.snapshot.is_some() => {
                    self.finish_snapshot(kind, result);
                }

                Some((state, outcome)) = self.details.next(), if !self.details.is_empty() => {
                    self.finish_detail(state, outcome);
                }

                intent = intents.recv() => {
                    match intent {
                        Some(intent) => self.handle_intent(intent),
                        None => {
                            info!("Intent channel closed, flight controller stopping");
                            break;
                        }
                    }
                }

                _ = ticker.tick() => {
                    self.on_tick();
                }
            }
        }

        let cache = self.fetcher.cache().stats();
        debug!(
            cache_hits = cache.hits,
            cache_misses = cache.misses,
            cache_evictions = cache.evictions,
            "Flight controller stopped"
        );
    }

    fn on_tick(&mut self) {
        if self.snapshot.is_some() {
            debug!("Snapshot fetch still in flight, skipping poll tick");
            return;
        }
        if self.displayed.is_empty() {
            trace!("Nothing displayed, skipping live update");
            return;
        }
        self.start_snapshot(FetchKind::Update);
        self.publish();
    }

    fn handle_intent(&mut self, intent: SelectionIntent) {
        trace!(?intent, "Handling intent");
        match intent {
            SelectionIntent::Select(icao24) => {
                let key = icao24.trim().to_lowercase();
                match self.displayed.iter().find(|s| s.icao24 == key).cloned() {
                    Some(state) => self.select(state),
                    None => warn!(icao24 = %key, "Ignoring selection of an aircraft not displayed"),
                }
            }
            SelectionIntent::SelectIndex(index) => match self.displayed.get(index).cloned() {
                Some(state) => self.select(state),
                None => warn!(
                    index,
                    displayed = self.displayed.len(),
                    "Ignoring selection index out of range"
                ),
            },
            SelectionIntent::Clear => {
                if self.selection.clear() {
                    self.publish();
                }
            }
            SelectionIntent::Refresh => {
                if self.snapshot.is_some() {
                    debug!("Snapshot fetch in flight, reload queued");
                    self.reload_requested = true;
                } else {
                    self.start_snapshot(FetchKind::Reload);
                    self.publish();
                }
            }
        }
    }

    fn select(&mut self, state: StateVector) {
        let ticket = self.selection.select(state.clone());

        if let Some(detailed) = self.fetcher.cached(&state) {
            trace!(icao24 = %state.icao24, "Flight detail cache hit");
            self.selection.complete(&ticket, detailed);
        } else if !self.pending_details.insert(state.icao24.clone()) {
            trace!(icao24 = %state.icao24, "Flight detail fetch already in flight");
        } else {
            let api = self.fetcher.api();
            let window = self.fetcher.window();
            let icao24 = state.icao24.clone();
            self.details.push(
                async move {
                    let outcome = fetch_latest_flight(api, icao24, window).await;
                    (state, outcome)
                }
                .boxed(),
            );
        }
        self.publish();
    }

    /// A fetch result applies to whichever selection of that aircraft is
    /// pending now, which may be newer than the one that started the fetch.
    fn finish_detail(
        &mut self,
        state: StateVector,
        outcome: Result<Option<FlightRecord>, ApiError>,
    ) {
        self.pending_details.remove(&state.icao24);

        let waiting = match self.selection.phase() {
            SelectionPhase::Selecting {
                ticket,
                placeholder,
            } if ticket.icao24 == state.icao24 => {
                Some((ticket.clone(), placeholder.state.clone()))
            }
            _ => None,
        };

        match waiting {
            Some((ticket, live)) => {
                let detailed = self.fetcher.apply(&live, outcome);
                if self.selection.complete(&ticket, detailed) {
                    self.publish();
                }
            }
            None => {
                // Cached even when stale so a later selection is instant
                self.fetcher.apply(&state, outcome);
                trace!(icao24 = %state.icao24, "Discarding detail for abandoned selection");
            }
        }
    }

    fn start_snapshot(&mut self, kind: FetchKind) {
        let feed = self.feed.clone();
        let previous = self.displayed.clone();
        trace!(?kind, displayed = previous.len(), "Starting snapshot fetch");

        self.snapshot = Some(
            async move {
                let result = match kind {
                    FetchKind::Reload => feed.try_reload(&previous).await,
                    FetchKind::Update => feed.try_update(previous).await,
                };
                (kind, result)
            }
            .boxed(),
        );
    }

    fn finish_snapshot(&mut self, kind: FetchKind, result: Result<Vec<StateVector>, ApiError>) {
        self.snapshot = None;

        match result {
            Ok(states) => {
                self.displayed = states;
                self.notice = None;
                match self.selection.refresh(&self.displayed) {
                    RefreshOutcome::Cleared => {
                        debug!("Selected aircraft no longer displayed, selection cleared")
                    }
                    RefreshOutcome::Patched => trace!("Selected aircraft refreshed"),
                    RefreshOutcome::Unchanged => {}
                }
            }
            Err(e) if kind == FetchKind::Reload => {
                warn!(
                    error = %e,
                    "Failed to load aircraft, rate limit may have been reached"
                );
                if self.displayed.is_empty() {
                    self.notice = Some(RATE_LIMIT_NOTICE.to_string());
                }
            }
            Err(e) => {
                warn!(error = %e, "Live update failed, keeping previous positions");
            }
        }

        if std::mem::take(&mut self.reload_requested) {
            self.start_snapshot(FetchKind::Reload);
        }
        self.publish();
    }

    fn publish(&mut self) {
        self.revision += 1;

        let arc_segments = self
            .selection
            .detail()
            .and_then(|detail| self.arcs.for_selection(detail, &self.airports))
            .map(|path| path.segments())
            .unwrap_or_default();

        let state = PresentationState {
            revision: self.revision,
            displayed: self.displayed.clone(),
            selection: self.selection.phase().clone(),
            arc_segments,
            loading: self.snapshot.is_some(),
            notice: self.notice.clone(),
        };
        self.state_tx.send_replace(state);
    }
}

/// Await the in-flight snapshot fetch, or never complete if there is none.
async fn next_snapshot(
    slot: &mut Option<SnapshotFuture>,
) -> (FetchKind, Result<Vec<StateVector>, ApiError>) {
    match slot.as_mut() {
        Some(fetch) => fetch.await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::airport::Airport;
    use crate::state::ValidityPolicy;
    use crate::test_support::{state_row, MockApi};

    const WAIT: Duration = Duration::from_secs(5);
    const NO_TICKS: Duration = Duration::from_secs(3600);

    fn controller(api: &Arc<MockApi>, poll_interval: Duration) -> FlightController<MockApi> {
        let feed = LiveFeed::new(Arc::clone(api), ValidityPolicy::LENIENT, 1.0);
        let fetcher = DetailFetcher::with_defaults(Arc::clone(api));
        let airports = AirportIndex::from_airports([Airport::new("KJFK", "JFK", 40.64, -73.78)]);
        FlightController::new(
            feed,
            fetcher,
            FlightArcBuilder::default(),
            Arc::new(airports),
            poll_interval,
        )
    }

    async fn wait_until<F>(handle: &ControllerHandle, mut predicate: F) -> PresentationState
    where
        F: FnMut(&PresentationState) -> bool,
    {
        let mut rx = handle.subscribe();
        let state = tokio::time::timeout(WAIT, rx.wait_for(|s| predicate(s)))
            .await
            .expect("timed out waiting for presentation state")
            .expect("controller stopped");
        state.clone()
    }

    fn three_aircraft() -> Vec<serde_json::Value> {
        vec![
            state_row("abc123", 50.0, -30.0, Some(10000.0), false),
            state_row("def456", 10.0, 20.0, Some(3000.0), false),
            state_row("ground", 1.0, 1.0, None, true),
            state_row("ghi789", -5.0, 100.0, None, false),
        ]
    }

    #[tokio::test]
    async fn test_initial_load_publishes_displayed_set() {
        let api = Arc::new(MockApi::new());
        api.push_snapshot(three_aircraft());

        let handle = controller(&api, NO_TICKS).spawn();
        let state = wait_until(&handle, |s| !s.displayed.is_empty()).await;

        let ids: Vec<&str> = state.displayed.iter().map(|s| s.icao24.as_str()).collect();
        assert_eq!(ids, vec!["abc123", "def456", "ghi789"]);
        assert!(!state.loading);
        assert!(state.notice.is_none());
        assert_eq!(api.state_calls(), 1);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_initial_load_sets_notice() {
        let api = Arc::new(MockApi::new());
        api.push_failure();

        let handle = controller(&api, NO_TICKS).spawn();
        let state = wait_until(&handle, |s| s.notice.is_some()).await;

        assert!(state.displayed.is_empty());
        assert_eq!(state.notice.as_deref(), Some(RATE_LIMIT_NOTICE));

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_select_resolves_detail_and_arc() {
        let api = Arc::new(MockApi::new());
        api.push_snapshot(three_aircraft());
        api.set_flights(
            "abc123",
            vec![
                FlightRecord::new("abc123", 0, 100).with_departure("EGLL"),
                FlightRecord::new("abc123", 0, 200).with_departure("KJFK"),
            ],
        );

        let handle = controller(&api, NO_TICKS).spawn();
        wait_until(&handle, |s| !s.displayed.is_empty()).await;

        handle
            .send(SelectionIntent::Select("ABC123".to_string()))
            .await
            .unwrap();
        let state = wait_until(&handle, |s| {
            matches!(s.selection, SelectionPhase::Selected { .. })
        })
        .await;

        let detail = state.detail().unwrap();
        assert_eq!(detail.icao24(), "abc123");
        assert_eq!(detail.departure_airport(), Some("KJFK"));
        assert!(!state.arc_segments.is_empty());
        assert_eq!(api.flight_calls(), 1);

        // Reselecting is served from the cache
        handle.send(SelectionIntent::Clear).await.unwrap();
        wait_until(&handle, |s| s.selection == SelectionPhase::Idle).await;
        handle.send(SelectionIntent::SelectIndex(0)).await.unwrap();
        wait_until(&handle, |s| {
            matches!(s.selection, SelectionPhase::Selected { .. })
        })
        .await;
        assert_eq!(api.flight_calls(), 1);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_stale_detail_is_discarded() {
        let api = Arc::new(MockApi::new());
        api.push_snapshot(three_aircraft());
        api.set_flights(
            "abc123",
            vec![FlightRecord::new("abc123", 0, 100).with_departure("KJFK")],
        );
        api.set_flights(
            "def456",
            vec![FlightRecord::new("def456", 0, 100).with_departure("EGLL")],
        );

        let handle = controller(&api, NO_TICKS).spawn();
        wait_until(&handle, |s| !s.displayed.is_empty()).await;

        // Warm the cache for def456
        handle
            .send(SelectionIntent::Select("def456".to_string()))
            .await
            .unwrap();
        wait_until(&handle, |s| {
            matches!(s.selection, SelectionPhase::Selected { .. })
        })
        .await;

        // Slow fetch for abc123, superseded by a cached selection
        api.set_flight_delay(Duration::from_millis(200));
        handle
            .send(SelectionIntent::Select("abc123".to_string()))
            .await
            .unwrap();
        handle
            .send(SelectionIntent::Select("def456".to_string()))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(500)).await;
        let state = handle.current();
        assert_eq!(state.selected_icao24(), Some("def456"));
        assert!(matches!(state.selection, SelectionPhase::Selected { .. }));
        assert_eq!(api.flight_calls(), 2);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_reselect_during_fetch_reuses_pending_request() {
        let api = Arc::new(MockApi::new());
        api.push_snapshot(three_aircraft());
        api.set_flights(
            "abc123",
            vec![FlightRecord::new("abc123", 0, 100).with_departure("KJFK")],
        );
        api.set_flight_delay(Duration::from_millis(200));

        let handle = controller(&api, NO_TICKS).spawn();
        wait_until(&handle, |s| !s.displayed.is_empty()).await;

        handle.send(SelectionIntent::SelectIndex(0)).await.unwrap();
        handle.send(SelectionIntent::Clear).await.unwrap();
        handle
            .send(SelectionIntent::Select("abc123".to_string()))
            .await
            .unwrap();

        let state = wait_until(&handle, |s| {
            matches!(s.selection, SelectionPhase::Selected { .. })
        })
        .await;
        assert_eq!(state.detail().unwrap().departure_airport(), Some("KJFK"));
        assert_eq!(api.flight_calls(), 1);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_unknown_selection_is_ignored() {
        let api = Arc::new(MockApi::new());
        api.push_snapshot(three_aircraft());

        let handle = controller(&api, NO_TICKS).spawn();
        wait_until(&handle, |s| !s.displayed.is_empty()).await;

        handle
            .send(SelectionIntent::Select("ground".to_string()))
            .await
            .unwrap();
        handle.send(SelectionIntent::SelectIndex(99)).await.unwrap();
        handle.send(SelectionIntent::Refresh).await.unwrap();

        // Refresh fails (script exhausted); the displayed set survives
        let state = wait_until(&handle, |s| !s.loading && api.state_calls() == 2).await;
        assert_eq!(state.selection, SelectionPhase::Idle);
        assert_eq!(state.displayed.len(), 3);
        assert_eq!(api.flight_calls(), 0);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_live_update_reconciles_without_growth() {
        let api = Arc::new(MockApi::new());
        api.push_snapshot(vec![
            state_row("abc123", 50.0, -30.0, Some(10000.0), false),
            state_row("def456", 10.0, 20.0, Some(3000.0), false),
        ]);
        api.push_snapshot(vec![
            state_row("abc123", 51.0, -29.0, Some(10000.0), false),
            state_row("new999", 0.0, 0.0, Some(9000.0), false),
        ]);

        let handle = controller(&api, Duration::from_millis(50)).spawn();
        let loaded = wait_until(&handle, |s| s.displayed.len() == 2).await;
        let altitude = loaded.displayed[0].display_altitude;

        let state = wait_until(&handle, |s| s.displayed.len() == 1).await;
        assert_eq!(state.displayed[0].icao24, "abc123");
        assert_eq!(state.displayed[0].latitude, Some(51.0));
        assert_eq!(state.displayed[0].display_altitude, altitude);

        // Later updates fail; positions are kept
        tokio::time::sleep(Duration::from_millis(200)).await;
        let state = handle.current();
        assert_eq!(state.displayed.len(), 1);
        assert!(api.state_calls() >= 3);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_selection_cleared_when_aircraft_leaves() {
        let api = Arc::new(MockApi::new());
        api.push_snapshot(three_aircraft());
        api.push_snapshot(vec![state_row("def456", 11.0, 21.0, Some(3000.0), false)]);
        api.set_flights("abc123", vec![]);

        let handle = controller(&api, NO_TICKS).spawn();
        wait_until(&handle, |s| !s.displayed.is_empty()).await;

        handle.send(SelectionIntent::SelectIndex(0)).await.unwrap();
        wait_until(&handle, |s| {
            matches!(s.selection, SelectionPhase::Selected { .. })
        })
        .await;

        handle.send(SelectionIntent::Refresh).await.unwrap();
        let state = wait_until(&handle, |s| s.displayed.len() == 1).await;
        assert_eq!(state.selection, SelectionPhase::Idle);
        assert!(state.arc_segments.is_empty());

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_zero_poll_interval_is_raised_to_minimum() {
        let api = Arc::new(MockApi::new());
        api.push_snapshot(three_aircraft());

        let controller = controller(&api, Duration::ZERO);
        assert_eq!(controller.poll_interval(), MIN_POLL_INTERVAL);

        let handle = controller.spawn();
        wait_until(&handle, |s| !s.displayed.is_empty()).await;
        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_stops_task() {
        let api = Arc::new(MockApi::new());
        api.push_snapshot(three_aircraft());

        let handle = controller(&api, Duration::from_millis(20)).spawn();
        let token = handle.cancellation_token();

        tokio::time::timeout(WAIT, handle.shutdown())
            .await
            .expect("shutdown timed out")
            .unwrap();
        assert!(token.is_cancelled());
    }
}
