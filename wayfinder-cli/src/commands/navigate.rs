//! `wayfinder navigate`: search, select, confirm.
//!
//! Uses the `--at` coordinate as the device location, picks the first
//! suggestion for the query, and requests a route to it through the
//! coordinator.

use std::io;

use tracing::{info, warn};
use wayfinder::geo::Coordinate;
use wayfinder::navigation::NavigationCoordinator;
use wayfinder::position::{FixedDevice, PositionSource};
use wayfinder::render::LayerTracker;

use super::common::{await_route, print_snapshot, render};
use crate::error::CliError;
use crate::runner::{CliRunner, RunOptions};
use crate::text_map::{PlanFormat, TextMapRenderer};

pub async fn run(
    options: RunOptions,
    query: &str,
    at: Coordinate,
    json: bool,
) -> Result<(), CliError> {
    let runner = CliRunner::new(options)?;
    runner.log_startup("navigate")?;
    runner.require_token()?;

    let config = runner.config();
    let source = PositionSource::with_config(FixedDevice::new(at, None), config.position_config());
    if let Err(e) = source.current_location().await {
        warn!(error = %e, "Initial location unavailable");
    }

    let mut coordinator = NavigationCoordinator::new(
        runner.directions()?,
        source.clone(),
        source.last_known(),
        config.navigation_config(),
    );
    let proxy = runner.search_proxy()?;

    coordinator.begin_search()?;
    let candidates = proxy.search(query, Some(at)).await;
    let first = candidates
        .into_iter()
        .next()
        .ok_or_else(|| CliError::NoResults(query.to_string()))?;
    let place = proxy
        .resolve(first)
        .await
        .ok_or_else(|| CliError::NoResults(query.to_string()))?;
    info!(id = %place.id, name = %place.name, "Navigating to first result");
    println!("Destination: {}", place.label());

    coordinator.select_destination(place)?;
    coordinator.confirm()?;
    await_route(&mut coordinator, config.http_timeout()).await?;

    let snapshot = coordinator.snapshot();
    print_snapshot(&snapshot);

    let format = if json { PlanFormat::Json } else { PlanFormat::Text };
    let mut renderer = TextMapRenderer::new(io::stdout(), format);
    render(&snapshot, &mut LayerTracker::new(), &mut renderer);

    proxy.new_session();
    coordinator.shutdown();
    source.shutdown();
    Ok(())
}
