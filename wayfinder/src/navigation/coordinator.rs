//! Navigation coordinator.
//!
//! Reconciles three independent inputs (location updates, destination
//! selection, route responses) into one [`NavigationSnapshot`].
//!
//! # Ordering
//!
//! The coordinator is owned by a single task and mutated through `&mut self`.
//! Network I/O runs in spawned tasks that report back over a channel, so a
//! completion can arrive long after the user moved on. Completions are
//! therefore matched by tag, never by arrival order:
//!
//! - live route fetches carry `{destination_id, sequence}` and are applied only
//!   if they match the single pending fetch
//! - test route fetches carry `{session, sequence}` and are dropped once the
//!   test session is gone
//!
//! # Test mode
//!
//! Entering test mode moves the live session aside and renders a separate
//! session with fixed coordinates. While it is active, live commands are
//! rejected with [`NavigationError::TestModeActive`], live location updates are
//! not applied, and a completion for the live fetch in flight on entry is held.
//! Exiting restores the saved live session exactly, then applies the held
//! completion and refreshes the location if one was missed or has gone stale.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::geo::Coordinate;
use crate::position::{LastKnownLocation, Location, PositionError};
use crate::render::MapEvent;
use crate::routing::{RouteFetcher, RouteOutcome, RoutingProfile};
use crate::search::SearchCandidate;

use super::command::NavigationCommand;
use super::refresher::LocationRefresher;
use super::state::{Destination, NavigationPhase, NavigationSnapshot, Notice};
use super::test_mode::{Session, TestSession, DEFAULT_TEST_DESTINATION, DEFAULT_TEST_ORIGIN};
use super::NavigationError;

/// Default age after which the live location is refreshed on leaving test mode.
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(300);

/// Coordinator settings.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationConfig {
    pub profile: RoutingProfile,
    pub test_origin: Coordinate,
    pub test_destination: Coordinate,
    pub stale_after: Duration,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            profile: RoutingProfile::Driving,
            test_origin: DEFAULT_TEST_ORIGIN,
            test_destination: DEFAULT_TEST_DESTINATION,
            stale_after: DEFAULT_STALE_AFTER,
        }
    }
}

/// Identity of a live route fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTag {
    pub destination_id: String,
    pub sequence: u64,
}

#[derive(Debug)]
enum FetchTarget {
    Live(FetchTag),
    Test { session: u64, sequence: u64 },
}

#[derive(Debug)]
enum CoordinatorEvent {
    RouteCompleted {
        target: FetchTarget,
        outcome: RouteOutcome,
    },
    LocationRefreshed(Result<Location, PositionError>),
}

/// The navigation state machine.
pub struct NavigationCoordinator<F, R>
where
    F: RouteFetcher + 'static,
    R: LocationRefresher + 'static,
{
    fetcher: Arc<F>,
    refresher: Arc<R>,
    last_known: LastKnownLocation,
    config: NavigationConfig,

    live: Session,
    pending: Option<FetchTag>,
    test: Option<TestSession>,

    sequence: u64,
    test_sessions: u64,
    last_click: Option<Coordinate>,

    events_tx: mpsc::UnboundedSender<CoordinatorEvent>,
    events_rx: mpsc::UnboundedReceiver<CoordinatorEvent>,
    snapshot_tx: watch::Sender<NavigationSnapshot>,
    tasks: CancellationToken,
}

impl<F, R> NavigationCoordinator<F, R>
where
    F: RouteFetcher + 'static,
    R: LocationRefresher + 'static,
{
    /// Create a coordinator seeded with the last-known location.
    pub fn new(
        fetcher: F,
        refresher: R,
        last_known: LastKnownLocation,
        config: NavigationConfig,
    ) -> Self {
        let mut live = Session::default();
        live.state.location = last_known.get();

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, _) = watch::channel(live.snapshot());

        Self {
            fetcher: Arc::new(fetcher),
            refresher: Arc::new(refresher),
            last_known,
            config,
            live,
            pending: None,
            test: None,
            sequence: 0,
            test_sessions: 0,
            last_click: None,
            events_tx,
            events_rx,
            snapshot_tx,
            tasks: CancellationToken::new(),
        }
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    /// Current render snapshot (test session while test mode is active).
    pub fn snapshot(&self) -> NavigationSnapshot {
        match &self.test {
            Some(test) => test.session.snapshot(),
            None => self.live.snapshot(),
        }
    }

    /// Receiver notified on every snapshot change.
    pub fn subscribe(&self) -> watch::Receiver<NavigationSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn phase(&self) -> NavigationPhase {
        self.snapshot().phase
    }

    pub fn is_test_mode(&self) -> bool {
        self.test.is_some()
    }

    /// Tag of the live route fetch in flight, if any.
    pub fn pending_fetch(&self) -> Option<&FetchTag> {
        self.pending.as_ref()
    }

    /// Last coordinate reported by the map.
    pub fn last_click(&self) -> Option<Coordinate> {
        self.last_click
    }

    /// `Idle -> Searching`.
    pub fn begin_search(&mut self) -> Result<(), NavigationError> {
        self.ensure_live()?;
        if self.live.phase != NavigationPhase::Idle {
            debug!(phase = %self.live.phase, "Search already in progress or destination set");
            return Ok(());
        }
        self.live.phase = NavigationPhase::Searching;
        self.publish();
        Ok(())
    }

    /// Select a destination from any phase.
    ///
    /// The previous destination, its route and any route fetch still in
    /// flight for it are discarded together.
    pub fn select_destination(&mut self, candidate: SearchCandidate) -> Result<(), NavigationError> {
        self.ensure_live()?;
        let destination = Destination::try_from(candidate)?;

        if let Some(stale) = self.pending.take() {
            debug!(
                destination_id = %stale.destination_id,
                sequence = stale.sequence,
                "Invalidating pending route fetch"
            );
        }

        info!(
            destination_id = %destination.id,
            name = %destination.name,
            "Destination selected"
        );
        self.live.state.set_destination(destination);
        self.live.phase = NavigationPhase::DestinationSelected;
        self.live.notice = None;
        self.publish();
        Ok(())
    }

    /// `DestinationSelected -> RouteConfirmed`, requesting a route from the
    /// current location.
    ///
    /// Without a known location the phase stays `DestinationSelected` and
    /// [`Notice::OriginUnavailable`] is raised.
    pub fn confirm(&mut self) -> Result<(), NavigationError> {
        self.ensure_live()?;
        if self.live.phase != NavigationPhase::DestinationSelected {
            debug!(phase = %self.live.phase, "Confirm ignored");
            return Ok(());
        }
        let Some(destination) = self.live.state.destination.clone() else {
            return Ok(());
        };
        let Some(origin) = self.live.state.location.as_ref().map(Location::coordinate) else {
            warn!(destination_id = %destination.id, "Cannot request route without a location");
            self.live.notice = Some(Notice::OriginUnavailable);
            self.publish();
            return Ok(());
        };

        let tag = FetchTag {
            destination_id: destination.id.clone(),
            sequence: self.next_sequence(),
        };
        debug!(
            destination_id = %tag.destination_id,
            sequence = tag.sequence,
            "Requesting route"
        );

        self.pending = Some(tag.clone());
        self.live.state.route = None;
        self.live.phase = NavigationPhase::RouteConfirmed;
        self.live.notice = None;
        self.spawn_fetch(FetchTarget::Live(tag), origin, destination.coordinate);
        self.publish();
        Ok(())
    }

    /// `DestinationSelected | RouteConfirmed -> Idle`, keeping the destination
    /// pin but dropping the route.
    pub fn cancel(&mut self) -> Result<(), NavigationError> {
        self.ensure_live()?;
        match self.live.phase {
            NavigationPhase::DestinationSelected | NavigationPhase::RouteConfirmed => {
                self.pending = None;
                self.live.state.route = None;
                self.live.phase = NavigationPhase::Idle;
                self.live.notice = None;
                info!("Navigation cancelled");
                self.publish();
            }
            phase => debug!(%phase, "Cancel ignored"),
        }
        Ok(())
    }

    /// Back to `Idle`, clearing destination, route and pin.
    pub fn clear(&mut self) -> Result<(), NavigationError> {
        self.ensure_live()?;
        self.pending = None;
        self.live.state.clear_destination();
        self.live.phase = NavigationPhase::Idle;
        self.live.notice = None;
        info!("Navigation cleared");
        self.publish();
        Ok(())
    }

    /// Record a new live location.
    ///
    /// While test mode is active the update is not applied; leaving test
    /// mode requests a fresh fix instead.
    pub fn on_location(&mut self, location: Location) {
        if let Some(test) = self.test.as_mut() {
            debug!(session = test.id, "Live location held while testing");
            test.location_missed = true;
            return;
        }
        if self.live.state.location.as_ref() == Some(&location) {
            return;
        }
        self.live.state.location = Some(location);
        if self.live.notice == Some(Notice::OriginUnavailable) {
            self.live.notice = None;
        }
        self.publish();
    }

    /// Save the live session and switch the rendered state to a fresh test
    /// session.
    pub fn enter_test_mode(&mut self) {
        if self.test.is_some() {
            debug!("Test mode already active");
            return;
        }
        self.test_sessions += 1;
        self.test = Some(TestSession::new(
            self.test_sessions,
            self.config.test_origin,
            self.config.test_destination,
            std::mem::take(&mut self.live),
            self.pending.take(),
        ));
        info!(session = self.test_sessions, "Test mode entered");
        self.publish();
    }

    /// Fetch a route between the fixed test points, skipping confirmation.
    pub fn generate_test_route(&mut self) -> Result<(), NavigationError> {
        let sequence = self.next_sequence();
        let test = self.test.as_mut().ok_or(NavigationError::NotInTestMode)?;

        test.pending = Some(sequence);
        test.session.state.route = None;
        test.session.phase = NavigationPhase::RouteConfirmed;
        test.session.notice = None;

        let target = FetchTarget::Test {
            session: test.id,
            sequence,
        };
        let (origin, destination) = (test.origin, test.destination);
        info!(session = test.id, "Generating test route");

        self.spawn_fetch(target, origin, destination);
        self.publish();
        Ok(())
    }

    /// Drop the test session and restore the live session saved on entry.
    ///
    /// Requests a fresh location when the live one is missing, older than
    /// `stale_after`, or was superseded by an update held during test mode.
    pub fn exit_test_mode(&mut self) -> Result<(), NavigationError> {
        let test = self.test.take().ok_or(NavigationError::NotInTestMode)?;
        info!(session = test.id, "Test mode exited");

        self.live = test.saved;
        self.pending = test.saved_pending;

        let needs_refresh = test.location_missed
            || match &self.live.state.location {
                None => true,
                Some(location) => location.is_stale(self.config.stale_after),
            };
        if needs_refresh {
            debug!(
                missed = test.location_missed,
                "Live location missing or outdated, refreshing"
            );
            self.spawn_refresh();
        }

        match (self.pending.clone(), test.held_route) {
            (Some(tag), Some(outcome)) => self.complete_live(tag, outcome),
            _ => self.publish(),
        }
        Ok(())
    }

    /// Map click reported by the renderer.
    pub fn on_map_click(&mut self, coordinate: Coordinate) {
        info!(
            lat = format!("{:.6}", coordinate.latitude),
            lon = format!("{:.6}", coordinate.longitude),
            "Map clicked"
        );
        self.last_click = Some(coordinate);
    }

    /// Apply a single command.
    pub fn apply(&mut self, command: NavigationCommand) -> Result<(), NavigationError> {
        match command {
            NavigationCommand::BeginSearch => self.begin_search()?,
            NavigationCommand::SelectDestination(candidate) => self.select_destination(candidate)?,
            NavigationCommand::Confirm => self.confirm()?,
            NavigationCommand::Cancel => self.cancel()?,
            NavigationCommand::Clear => self.clear()?,
            NavigationCommand::EnterTestMode => self.enter_test_mode(),
            NavigationCommand::GenerateTestRoute => self.generate_test_route()?,
            NavigationCommand::ExitTestMode => self.exit_test_mode()?,
            NavigationCommand::Location(location) => self.on_location(location),
            NavigationCommand::Map(MapEvent::Click(coordinate)) => self.on_map_click(coordinate),
        }
        Ok(())
    }

    /// Wait for the next background completion and apply it.
    pub async fn process_next_event(&mut self) {
        if let Some(event) = self.events_rx.recv().await {
            self.handle_event(event);
        }
    }

    /// Event loop: commands, background completions and last-known location
    /// changes, until `cancellation` fires or the command channel closes.
    pub async fn run(
        &mut self,
        mut commands: mpsc::Receiver<NavigationCommand>,
        cancellation: CancellationToken,
    ) {
        info!("Navigation coordinator started");
        let mut location_rx = self.last_known.subscribe();
        let mut location_open = true;

        loop {
            tokio::select! {
                biased;

                _ = cancellation.cancelled() => break,

                command = commands.recv() => match command {
                    Some(command) => {
                        if let Err(e) = self.apply(command) {
                            warn!(error = %e, "Navigation command rejected");
                        }
                    }
                    None => break,
                },

                Some(event) = self.events_rx.recv() => self.handle_event(event),

                changed = location_rx.changed(), if location_open => match changed {
                    Ok(()) => {
                        let latest = location_rx.borrow_and_update().clone();
                        if let Some(location) = latest {
                            self.on_location(location);
                        }
                    }
                    Err(_) => location_open = false,
                },
            }
        }

        self.shutdown();
        info!("Navigation coordinator stopped");
    }

    /// Abort background work. Completions still queued are never applied.
    pub fn shutdown(&mut self) {
        self.tasks.cancel();
        self.pending = None;
        if let Some(test) = self.test.as_mut() {
            test.pending = None;
            test.saved_pending = None;
            test.held_route = None;
        }
    }

    fn handle_event(&mut self, event: CoordinatorEvent) {
        match event {
            CoordinatorEvent::RouteCompleted {
                target: FetchTarget::Live(tag),
                outcome,
            } => self.complete_live(tag, outcome),
            CoordinatorEvent::RouteCompleted {
                target: FetchTarget::Test { session, sequence },
                outcome,
            } => self.complete_test(session, sequence, outcome),
            CoordinatorEvent::LocationRefreshed(Ok(location)) => self.on_location(location),
            CoordinatorEvent::LocationRefreshed(Err(e)) => {
                warn!(error = %e, "Location refresh failed");
            }
        }
    }

    fn complete_live(&mut self, tag: FetchTag, outcome: RouteOutcome) {
        if let Some(test) = self.test.as_mut() {
            if test.saved_pending.as_ref() == Some(&tag) {
                debug!(
                    destination_id = %tag.destination_id,
                    sequence = tag.sequence,
                    "Holding live route response until test mode exits"
                );
                test.held_route = Some(outcome);
            } else {
                debug!(
                    destination_id = %tag.destination_id,
                    sequence = tag.sequence,
                    "Discarding stale route response"
                );
            }
            return;
        }
        if self.pending.as_ref() != Some(&tag) {
            debug!(
                destination_id = %tag.destination_id,
                sequence = tag.sequence,
                "Discarding stale route response"
            );
            return;
        }
        self.pending = None;

        let (phase, notice) = settle(&outcome);
        self.live.state.route = Some(outcome);
        self.live.phase = phase;
        self.live.notice = notice;
        info!(destination_id = %tag.destination_id, %phase, "Route request completed");
        self.publish();
    }

    fn complete_test(&mut self, session: u64, sequence: u64, outcome: RouteOutcome) {
        let Some(test) = self
            .test
            .as_mut()
            .filter(|t| t.id == session && t.pending == Some(sequence))
        else {
            debug!(session, sequence, "Discarding stale test route response");
            return;
        };
        test.pending = None;

        let (phase, notice) = settle(&outcome);
        test.session.state.route = Some(outcome);
        test.session.phase = phase;
        test.session.notice = notice;
        info!(session, %phase, "Test route completed");
        self.publish();
    }

    fn ensure_live(&self) -> Result<(), NavigationError> {
        match &self.test {
            Some(test) => {
                debug!(session = test.id, "Live command rejected during test mode");
                Err(NavigationError::TestModeActive)
            }
            None => Ok(()),
        }
    }

    fn next_sequence(&mut self) -> u64 {
        self.sequence += 1;
        self.sequence
    }

    fn spawn_fetch(&self, target: FetchTarget, origin: Coordinate, destination: Coordinate) {
        let fetcher = Arc::clone(&self.fetcher);
        let events = self.events_tx.clone();
        let cancellation = self.tasks.clone();
        let profile = self.config.profile;

        tokio::spawn(async move {
            tokio::select! {
                outcome = fetcher.fetch(origin, destination, profile) => {
                    let _ = events.send(CoordinatorEvent::RouteCompleted { target, outcome });
                }
                _ = cancellation.cancelled() => {}
            }
        });
    }

    fn spawn_refresh(&self) {
        let refresher = Arc::clone(&self.refresher);
        let events = self.events_tx.clone();
        let cancellation = self.tasks.clone();

        tokio::spawn(async move {
            tokio::select! {
                result = refresher.refresh() => {
                    let _ = events.send(CoordinatorEvent::LocationRefreshed(result));
                }
                _ = cancellation.cancelled() => {}
            }
        });
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(self.snapshot());
    }
}

/// Phase and notice after a route fetch completes.
fn settle(outcome: &RouteOutcome) -> (NavigationPhase, Option<Notice>) {
    match outcome {
        RouteOutcome::Found(_) => (NavigationPhase::RouteActive, None),
        RouteOutcome::Empty => (
            NavigationPhase::DestinationSelected,
            Some(Notice::RouteUnavailable),
        ),
    }
}
