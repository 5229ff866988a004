//! `wayfinder test-route`: exercise test mode end to end.
//!
//! Enters test mode, requests a route between the configured test points,
//! leaves test mode, and prints the map changes at each step.

use std::io;

use wayfinder::navigation::NavigationCoordinator;
use wayfinder::position::{NoDevice, PositionSource};
use wayfinder::render::LayerTracker;

use super::common::{await_route, print_snapshot, render};
use crate::error::CliError;
use crate::runner::{CliRunner, RunOptions};
use crate::text_map::{PlanFormat, TextMapRenderer};

pub async fn run(options: RunOptions, json: bool) -> Result<(), CliError> {
    let runner = CliRunner::new(options)?;
    runner.log_startup("test-route")?;
    runner.require_token()?;

    let config = runner.config();
    let source = PositionSource::with_config(NoDevice, config.position_config());
    let mut coordinator = NavigationCoordinator::new(
        runner.directions()?,
        source.clone(),
        source.last_known(),
        config.navigation_config(),
    );

    let format = if json { PlanFormat::Json } else { PlanFormat::Text };
    let mut renderer = TextMapRenderer::new(io::stdout(), format);
    let mut tracker = LayerTracker::new();

    println!("== Entering test mode");
    coordinator.enter_test_mode();
    render(&coordinator.snapshot(), &mut tracker, &mut renderer);

    println!("== Generating test route");
    coordinator.generate_test_route()?;
    await_route(&mut coordinator, config.http_timeout()).await?;
    let snapshot = coordinator.snapshot();
    print_snapshot(&snapshot);
    render(&snapshot, &mut tracker, &mut renderer);

    println!("== Leaving test mode");
    coordinator.exit_test_mode()?;
    let snapshot = coordinator.snapshot();
    print_snapshot(&snapshot);
    render(&snapshot, &mut tracker, &mut renderer);

    coordinator.shutdown();
    source.shutdown();
    Ok(())
}
