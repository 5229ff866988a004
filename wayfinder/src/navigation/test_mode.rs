//! Isolated test-mode session.
//!
//! A test session carries its own state, phase and notice, plus the live
//! session as it was on entry. Leaving test mode puts that saved session back.

use crate::geo::Coordinate;
use crate::position::MockLocation;
use crate::routing::RouteOutcome;

use super::coordinator::FetchTag;
use super::state::{Destination, NavigationPhase, NavigationSnapshot, NavigationState, Notice};

/// Fixed test origin (Guadalajara, Av. Chapultepec).
pub const DEFAULT_TEST_ORIGIN: Coordinate = Coordinate::new(20.674289, -103.386854);

/// Fixed test destination (Zapopan, Av. Patria).
pub const DEFAULT_TEST_DESTINATION: Coordinate = Coordinate::new(20.689791, -103.417812);

/// Destination id used for the fixed test destination.
pub const TEST_DESTINATION_ID: &str = "test-destination";

/// State, phase and notice of one flow (live or test).
#[derive(Debug, Clone, Default)]
pub(crate) struct Session {
    pub state: NavigationState,
    pub phase: NavigationPhase,
    pub notice: Option<Notice>,
}

impl Session {
    pub fn snapshot(&self) -> NavigationSnapshot {
        NavigationSnapshot {
            state: self.state.clone(),
            phase: self.phase,
            notice: self.notice,
        }
    }
}

#[derive(Debug)]
pub(crate) struct TestSession {
    /// Distinguishes this session from earlier ones so their late results drop.
    pub id: u64,
    pub session: Session,
    /// Sequence of the in-flight test route fetch.
    pub pending: Option<u64>,
    pub origin: Coordinate,
    pub destination: Coordinate,

    /// Live session at the moment test mode was entered.
    pub saved: Session,
    /// Live route fetch that was in flight on entry.
    pub saved_pending: Option<FetchTag>,
    /// Completion of `saved_pending`, applied on exit.
    pub held_route: Option<RouteOutcome>,
    /// A live location arrived while testing.
    pub location_missed: bool,
}

impl TestSession {
    pub fn new(
        id: u64,
        origin: Coordinate,
        destination: Coordinate,
        saved: Session,
        saved_pending: Option<FetchTag>,
    ) -> Self {
        let state = NavigationState {
            location: Some(MockLocation::at(origin).to_location()),
            destination: Some(Destination::new(
                TEST_DESTINATION_ID,
                "Test destination",
                destination,
            )),
            route: None,
            test_mode_active: true,
            show_destination_pin: true,
        };

        Self {
            id,
            session: Session {
                state,
                phase: NavigationPhase::DestinationSelected,
                notice: None,
            },
            pending: None,
            origin,
            destination,
            saved,
            saved_pending,
            held_route: None,
            location_missed: false,
        }
    }
}
