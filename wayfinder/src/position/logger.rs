//! Periodic location logging daemon.
//!
//! Logs the last-known location at DEBUG level on a fixed interval, useful
//! when diagnosing why a route was requested from an unexpected origin.
//!
//! ```ignore
//! use wayfinder::position::{spawn_location_logger, DEFAULT_LOG_INTERVAL};
//! use tokio_util::sync::CancellationToken;
//!
//! let cancellation = CancellationToken::new();
//! if tracing::enabled!(tracing::Level::DEBUG) {
//!     spawn_location_logger(source.last_known(), cancellation.clone(), DEFAULT_LOG_INTERVAL);
//! }
//! ```

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::LastKnownLocation;

/// Default logging interval (30 seconds).
pub const DEFAULT_LOG_INTERVAL: Duration = Duration::from_secs(30);

/// Spawns a background task that periodically logs the last-known location.
///
/// Stops when `cancellation` is triggered.
pub fn spawn_location_logger(
    last_known: LastKnownLocation,
    cancellation: CancellationToken,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    log_location(&last_known);
                }
                _ = cancellation.cancelled() => {
                    tracing::debug!("Location logger stopped");
                    break;
                }
            }
        }
    })
}

fn log_location(last_known: &LastKnownLocation) {
    match last_known.get() {
        Some(location) => tracing::debug!(
            lat = format!("{:.5}", location.latitude),
            lon = format!("{:.5}", location.longitude),
            accuracy_m = ?location.accuracy,
            age_s = location.age().as_secs(),
            source = %location.source,
            "Location update"
        ),
        None => tracing::debug!("Location update (no location yet)"),
    }
}
