//! Navigation state types.

use std::fmt;

use crate::geo::Coordinate;
use crate::position::Location;
use crate::routing::RouteOutcome;
use crate::search::SearchCandidate;

use super::NavigationError;

/// A selected place with guaranteed coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Destination {
    pub id: String,
    pub name: String,
    pub address: String,
    pub coordinate: Coordinate,
}

impl Destination {
    pub fn new(id: impl Into<String>, name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: String::new(),
            coordinate,
        }
    }
}

impl TryFrom<SearchCandidate> for Destination {
    type Error = NavigationError;

    fn try_from(candidate: SearchCandidate) -> Result<Self, Self::Error> {
        let coordinate = candidate
            .coordinates
            .ok_or_else(|| NavigationError::MissingCoordinates(candidate.id.clone()))?;

        Ok(Self {
            id: candidate.id,
            name: candidate.name,
            address: candidate.address,
            coordinate,
        })
    }
}

/// The coordinator's render-facing aggregate.
///
/// `route` is only set while `destination` is set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigationState {
    pub location: Option<Location>,
    pub destination: Option<Destination>,
    pub route: Option<RouteOutcome>,
    pub test_mode_active: bool,
    pub show_destination_pin: bool,
}

impl NavigationState {
    /// Replace the destination, discarding any route for the old one.
    pub(crate) fn set_destination(&mut self, destination: Destination) {
        self.destination = Some(destination);
        self.route = None;
        self.show_destination_pin = true;
    }

    pub(crate) fn clear_destination(&mut self) {
        self.destination = None;
        self.route = None;
        self.show_destination_pin = false;
    }

    /// True when `route` is set without a destination. Never expected.
    pub fn is_inconsistent(&self) -> bool {
        self.route.is_some() && self.destination.is_none()
    }
}

/// Where the user is in the navigation flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NavigationPhase {
    #[default]
    Idle,
    Searching,
    DestinationSelected,
    /// Route requested, waiting for the fetch to complete.
    RouteConfirmed,
    RouteActive,
}

impl fmt::Display for NavigationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Searching => "searching",
            Self::DestinationSelected => "destination-selected",
            Self::RouteConfirmed => "route-confirmed",
            Self::RouteActive => "route-active",
        };
        f.write_str(name)
    }
}

/// Non-fatal condition the UI should surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// A route was requested but no location is known yet.
    OriginUnavailable,
    /// The routing service produced no route.
    RouteUnavailable,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OriginUnavailable => write!(f, "Current location unavailable"),
            Self::RouteUnavailable => write!(f, "No route available to this destination"),
        }
    }
}

/// What renderers observe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigationSnapshot {
    pub state: NavigationState,
    pub phase: NavigationPhase,
    pub notice: Option<Notice>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::RouteOutcome;

    fn candidate(coordinates: Option<Coordinate>) -> SearchCandidate {
        SearchCandidate {
            id: "poi.1".into(),
            name: "Estacionamiento".into(),
            address: "Av. Juárez 100".into(),
            place_formatted: String::new(),
            coordinates,
            category: None,
            context: None,
        }
    }

    #[test]
    fn test_destination_requires_coordinates() {
        let err = Destination::try_from(candidate(None)).unwrap_err();
        assert_eq!(err, NavigationError::MissingCoordinates("poi.1".into()));

        let dest = Destination::try_from(candidate(Some(Coordinate::new(20.0, -103.0)))).unwrap();
        assert_eq!(dest.coordinate, Coordinate::new(20.0, -103.0));
        assert_eq!(dest.address, "Av. Juárez 100");
    }

    #[test]
    fn test_set_destination_clears_route() {
        let mut state = NavigationState::default();
        state.set_destination(Destination::new("a", "A", Coordinate::new(1.0, 1.0)));
        state.route = Some(RouteOutcome::Empty);

        state.set_destination(Destination::new("b", "B", Coordinate::new(2.0, 2.0)));

        assert!(state.route.is_none());
        assert!(state.show_destination_pin);
        assert_eq!(state.destination.as_ref().unwrap().id, "b");
    }

    #[test]
    fn test_clear_destination() {
        let mut state = NavigationState::default();
        state.set_destination(Destination::new("a", "A", Coordinate::new(1.0, 1.0)));
        state.route = Some(RouteOutcome::Empty);

        state.clear_destination();

        assert!(state.destination.is_none());
        assert!(state.route.is_none());
        assert!(!state.show_destination_pin);
        assert!(!state.is_inconsistent());
    }
}
