//! Output helpers shared across CLI commands.

use std::time::Duration;

use wayfinder::navigation::{
    LocationRefresher, NavigationCoordinator, NavigationPhase, NavigationSnapshot,
};
use wayfinder::render::{LayerTracker, MapRenderer, RenderPlan};
use wayfinder::routing::{format_distance_km, format_duration, Route, RouteFetcher, RouteOutcome};
use wayfinder::search::SearchCandidate;

use crate::error::CliError;

/// Extra time allowed beyond the HTTP timeout for a coordinator round trip.
const SETTLE_MARGIN: Duration = Duration::from_secs(5);

/// Print a route summary, optionally with every maneuver.
pub fn print_route(route: &Route, with_steps: bool) {
    println!(
        "Route: {} in {}",
        format_distance_km(route.distance_meters),
        format_duration(route.duration_seconds)
    );
    println!("  Geometry points: {}", route.geometry.len());

    if with_steps {
        println!();
        for (i, step) in route.steps.iter().enumerate() {
            println!(
                "  {:>3}. {} ({})",
                i + 1,
                step.instruction,
                format_distance_km(step.distance_meters)
            );
        }
    }
}

pub fn print_candidates(candidates: &[SearchCandidate]) {
    if candidates.is_empty() {
        println!("No places found.");
        return;
    }
    for (i, candidate) in candidates.iter().enumerate() {
        let position = candidate
            .coordinates
            .map(|c| c.to_string())
            .unwrap_or_else(|| "(resolve on select)".to_string());
        println!("  {:>2}. {}", i + 1, candidate.label());
        println!("      id: {}  at: {}", candidate.id, position);
    }
}

pub fn print_snapshot(snapshot: &NavigationSnapshot) {
    let state = &snapshot.state;
    println!("Phase: {}", snapshot.phase);
    if state.test_mode_active {
        println!("Mode: test");
    }
    if let Some(location) = &state.location {
        println!("Location: {} ({})", location.coordinate(), location.source);
    }
    if let Some(destination) = &state.destination {
        println!("Destination: {} at {}", destination.name, destination.coordinate);
    }
    match &state.route {
        Some(RouteOutcome::Found(route)) => print_route(route, false),
        Some(RouteOutcome::Empty) => println!("Route: none"),
        None => {}
    }
    if let Some(notice) = snapshot.notice {
        println!("Notice: {}", notice);
    }
}

/// Diff the snapshot against what is drawn and hand it to `renderer`.
pub fn render(
    snapshot: &NavigationSnapshot,
    tracker: &mut LayerTracker,
    renderer: &mut impl MapRenderer,
) {
    let plan = RenderPlan::from_state(&snapshot.state);
    let changes = tracker.diff(&plan);
    renderer.apply(&plan, &changes);
}

/// Wait until a requested route has been applied.
pub async fn await_route<F, R>(
    coordinator: &mut NavigationCoordinator<F, R>,
    http_timeout: Duration,
) -> Result<(), CliError>
where
    F: RouteFetcher + 'static,
    R: LocationRefresher + 'static,
{
    let limit = http_timeout + SETTLE_MARGIN;
    tokio::time::timeout(limit, async {
        while coordinator.phase() == NavigationPhase::RouteConfirmed {
            coordinator.process_next_event().await;
        }
    })
    .await
    .map_err(|_| CliError::Timeout {
        what: "route",
        after: limit,
    })
}
