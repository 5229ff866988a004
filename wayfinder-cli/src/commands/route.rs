//! `wayfinder route`: one route request.

use tracing::info;
use wayfinder::geo::{haversine_km, Coordinate};
use wayfinder::routing::{RouteFetcher, RouteOutcome, RoutingProfile};

use super::common::print_route;
use crate::error::CliError;
use crate::runner::{CliRunner, RunOptions};

pub async fn run(
    options: RunOptions,
    from: Coordinate,
    to: Coordinate,
    profile: Option<RoutingProfile>,
    steps: bool,
) -> Result<(), CliError> {
    let runner = CliRunner::new(options)?;
    runner.log_startup("route")?;
    runner.require_token()?;

    let profile = profile.unwrap_or(runner.config().routing.profile);
    info!(%from, %to, %profile, "Requesting route");
    println!(
        "Routing {} -> {} ({}, {:.1} km straight line)",
        from,
        to,
        profile,
        haversine_km(from, to)
    );

    match runner.directions()?.fetch(from, to, profile).await {
        RouteOutcome::Found(route) => print_route(&route, steps),
        RouteOutcome::Empty => println!("No route found. See the log for details."),
    }
    Ok(())
}
