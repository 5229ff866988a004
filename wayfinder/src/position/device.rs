//! Device positioning abstraction.
//!
//! [`DeviceGeolocation`] is the seam between the position source and whatever
//! hardware or platform service actually produces fixes. Two implementations
//! ship with the crate:
//!
//! - [`NoDevice`] - no positioning capability, every request fails
//! - [`FixedDevice`] - reports a static coordinate (CLI `--at`)

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;

use super::PositionError;
use crate::geo::Coordinate;

/// Request options passed to the device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeolocationOptions {
    /// Ask for the most precise fix the device can produce.
    pub high_accuracy: bool,
    /// Time budget for a fix.
    pub timeout: Duration,
    /// Oldest cached fix the device may return.
    pub maximum_age: Duration,
}

impl GeolocationOptions {
    /// Options for a single position request.
    pub fn one_shot(timeout: Duration, maximum_age: Duration) -> Self {
        Self {
            high_accuracy: true,
            timeout,
            maximum_age,
        }
    }
}

impl Default for GeolocationOptions {
    fn default() -> Self {
        Self::one_shot(Duration::from_secs(10), Duration::from_secs(300))
    }
}

/// A raw fix reported by the device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceFix {
    pub latitude: f64,
    pub longitude: f64,
    /// Accuracy radius in meters.
    pub accuracy: Option<f64>,
}

impl DeviceFix {
    pub fn new(latitude: f64, longitude: f64, accuracy: Option<f64>) -> Self {
        Self {
            latitude,
            longitude,
            accuracy,
        }
    }
}

type ReleaseFn = Box<dyn FnOnce() + Send>;

/// Handle to a running device watch.
///
/// Fixes arrive on the receiver. Dropping the handle releases the device
/// resources through the release callback supplied by the implementation.
pub struct DeviceWatch {
    updates: mpsc::Receiver<Result<DeviceFix, PositionError>>,
    release: Option<ReleaseFn>,
}

impl DeviceWatch {
    pub fn new(
        updates: mpsc::Receiver<Result<DeviceFix, PositionError>>,
        release: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            updates,
            release: Some(Box::new(release)),
        }
    }

    /// Wait for the next fix. `None` when the device stopped reporting.
    pub async fn recv(&mut self) -> Option<Result<DeviceFix, PositionError>> {
        self.updates.recv().await
    }
}

impl Drop for DeviceWatch {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl std::fmt::Debug for DeviceWatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceWatch")
            .field("released", &self.release.is_none())
            .finish()
    }
}

/// Platform positioning capability.
pub trait DeviceGeolocation: Send + Sync + 'static {
    /// Request a single fix.
    fn current_position(
        &self,
        options: &GeolocationOptions,
    ) -> impl Future<Output = Result<DeviceFix, PositionError>> + Send;

    /// Start continuous positioning.
    fn watch_position(&self, options: &GeolocationOptions) -> Result<DeviceWatch, PositionError>;
}

/// A device without positioning capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDevice;

impl NoDevice {
    fn unavailable() -> PositionError {
        PositionError::Unavailable("no positioning capability".to_string())
    }
}

impl DeviceGeolocation for NoDevice {
    async fn current_position(
        &self,
        _options: &GeolocationOptions,
    ) -> Result<DeviceFix, PositionError> {
        Err(Self::unavailable())
    }

    fn watch_position(&self, _options: &GeolocationOptions) -> Result<DeviceWatch, PositionError> {
        Err(Self::unavailable())
    }
}

/// A device pinned to one coordinate.
#[derive(Debug, Clone, Copy)]
pub struct FixedDevice {
    fix: DeviceFix,
}

impl FixedDevice {
    pub fn new(coordinate: Coordinate, accuracy: Option<f64>) -> Self {
        Self {
            fix: DeviceFix::new(coordinate.latitude, coordinate.longitude, accuracy),
        }
    }
}

impl DeviceGeolocation for FixedDevice {
    async fn current_position(
        &self,
        _options: &GeolocationOptions,
    ) -> Result<DeviceFix, PositionError> {
        Ok(self.fix)
    }

    fn watch_position(&self, _options: &GeolocationOptions) -> Result<DeviceWatch, PositionError> {
        let (tx, rx) = mpsc::channel(1);
        // Capacity 1 and a fresh channel: this send cannot fail.
        let _ = tx.try_send(Ok(self.fix));
        // Hold the sender until release so the watch stays open.
        Ok(DeviceWatch::new(rx, move || drop(tx)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_device_is_unavailable() {
        let device = NoDevice;
        let result = device
            .current_position(&GeolocationOptions::default())
            .await;
        assert!(matches!(result, Err(PositionError::Unavailable(_))));
        assert!(device
            .watch_position(&GeolocationOptions::default())
            .is_err());
    }

    #[tokio::test]
    async fn test_fixed_device_watch_emits_then_stays_open() {
        let device = FixedDevice::new(Coordinate::new(20.0, -103.0), Some(8.0));
        let mut watch = device
            .watch_position(&GeolocationOptions::default())
            .unwrap();

        let fix = watch.recv().await.unwrap().unwrap();
        assert_eq!(fix.latitude, 20.0);

        let pending =
            tokio::time::timeout(Duration::from_millis(20), watch.recv()).await;
        assert!(pending.is_err(), "watch should stay open without new fixes");
    }

    #[test]
    fn test_release_runs_on_drop() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;

        let released = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&released);
        let (_tx, rx) = mpsc::channel(1);

        let watch = DeviceWatch::new(rx, move || flag.store(true, Ordering::SeqCst));
        assert!(!released.load(Ordering::SeqCst));
        drop(watch);
        assert!(released.load(Ordering::SeqCst));
    }
}
