//! Commands accepted by the coordinator event loop.

use crate::geo::Coordinate;
use crate::position::Location;
use crate::render::MapEvent;
use crate::search::SearchCandidate;

/// Input to [`NavigationCoordinator::run`](super::NavigationCoordinator::run).
#[derive(Debug, Clone)]
pub enum NavigationCommand {
    BeginSearch,
    SelectDestination(SearchCandidate),
    Confirm,
    Cancel,
    Clear,
    EnterTestMode,
    GenerateTestRoute,
    ExitTestMode,
    Location(Location),
    Map(MapEvent),
}

impl From<MapEvent> for NavigationCommand {
    fn from(event: MapEvent) -> Self {
        NavigationCommand::Map(event)
    }
}

impl NavigationCommand {
    pub fn map_click(coordinate: Coordinate) -> Self {
        NavigationCommand::Map(MapEvent::Click(coordinate))
    }
}
