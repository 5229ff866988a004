//! Integration tests for the position source.
//!
//! Covers the live/mock switch as seen by a consumer:
//! - Mock locations win over the device while active
//! - Clearing a mock performs exactly one live request
//! - Watches never yield a mock location after the mock is cleared
//!
//! Run with: `cargo test --test position_integration`

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::StreamExt;
use tokio::sync::mpsc;

use wayfinder::position::{
    DeviceFix, DeviceGeolocation, DeviceWatch, GeolocationOptions, LocationSource, MockLocation,
    PositionError, PositionSource, PositionSourceConfig,
};

// ============================================================================
// Test Helpers
// ============================================================================

type FixSender = mpsc::Sender<Result<DeviceFix, PositionError>>;

/// Device reporting a fixed one-shot fix and a watch fed by the test.
#[derive(Clone)]
struct ScriptedDevice {
    fix: DeviceFix,
    current_calls: Arc<AtomicUsize>,
    watch_tx: Arc<Mutex<Option<FixSender>>>,
}

impl ScriptedDevice {
    fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            fix: DeviceFix::new(latitude, longitude, Some(8.0)),
            current_calls: Arc::new(AtomicUsize::new(0)),
            watch_tx: Arc::new(Mutex::new(None)),
        }
    }

    fn current_calls(&self) -> usize {
        self.current_calls.load(Ordering::SeqCst)
    }

    /// Wait until a watch has been opened and return its sender.
    async fn watch_sender(&self) -> FixSender {
        loop {
            if let Some(tx) = self.watch_tx.lock().unwrap().clone() {
                return tx;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

impl DeviceGeolocation for ScriptedDevice {
    async fn current_position(
        &self,
        _options: &GeolocationOptions,
    ) -> Result<DeviceFix, PositionError> {
        self.current_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.fix)
    }

    fn watch_position(&self, _options: &GeolocationOptions) -> Result<DeviceWatch, PositionError> {
        let (tx, rx) = mpsc::channel(8);
        *self.watch_tx.lock().unwrap() = Some(tx);
        let slot = Arc::clone(&self.watch_tx);
        Ok(DeviceWatch::new(rx, move || {
            slot.lock().unwrap().take();
        }))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_mock_overrides_device() {
    let device = ScriptedDevice::new(20.6597, -103.3496);
    let source = PositionSource::new(device.clone());

    source.set_mock(MockLocation::new(19.4326, -99.1332));
    let location = source.current_location().await.unwrap();

    assert_eq!(location.source, LocationSource::Mock);
    assert_eq!(location.latitude, 19.4326);
    assert_eq!(device.current_calls(), 0);
    assert_eq!(
        source.last_known().get().map(|l| l.source),
        Some(LocationSource::Mock)
    );
}

#[tokio::test(start_paused = true)]
async fn test_clearing_mock_fetches_live_exactly_once() {
    let device = ScriptedDevice::new(20.6597, -103.3496);
    let source = PositionSource::new(device.clone());
    source.set_mock(MockLocation::new(19.4326, -99.1332));

    let location = source.clear_mock().await.unwrap();

    assert_eq!(location.source, LocationSource::Live);
    assert_eq!(location.latitude, 20.6597);
    assert_eq!(device.current_calls(), 1);
    assert!(!source.is_mock_active());
    assert_eq!(source.last_known().get(), Some(location));
}

#[tokio::test(start_paused = true)]
async fn test_watch_stops_mock_emissions_after_clear() {
    let device = ScriptedDevice::new(20.6597, -103.3496);
    let source = PositionSource::with_config(
        device.clone(),
        PositionSourceConfig {
            mock_interval: Duration::from_secs(1),
            ..Default::default()
        },
    );
    source.set_mock(MockLocation::new(19.4326, -99.1332));

    let mut watch = source.watch();
    let first = watch.next().await.unwrap().unwrap();
    assert_eq!(first.source, LocationSource::Mock);

    // Let a few mock ticks pile up in the buffer before clearing.
    tokio::time::sleep(Duration::from_secs(3)).await;
    source.clear_mock().await.unwrap();

    let tx = device.watch_sender().await;
    tx.send(Ok(DeviceFix::new(20.7, -103.4, None))).await.unwrap();
    tokio::time::sleep(Duration::from_secs(10)).await;

    let next = watch.next().await.unwrap().unwrap();
    assert_eq!(next.source, LocationSource::Live);
    assert_eq!(next.latitude, 20.7);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_watch_releases_device() {
    let device = ScriptedDevice::new(20.6597, -103.3496);
    let source = PositionSource::new(device.clone());

    let mut stream = Box::pin(source.watch().into_stream());
    let tx = {
        // The watch starts on first poll.
        let pending = tokio::time::timeout(Duration::from_millis(50), stream.next()).await;
        assert!(pending.is_err());
        device.watch_sender().await
    };
    tx.send(Ok(DeviceFix::new(20.7, -103.4, None))).await.unwrap();
    let location = stream.next().await.unwrap().unwrap();
    assert_eq!(location.source, LocationSource::Live);

    drop(stream);
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(device.watch_tx.lock().unwrap().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_device_error_surfaces_to_watch() {
    let device = ScriptedDevice::new(20.6597, -103.3496);
    let source = PositionSource::new(device.clone());
    let mut watch = source.watch();

    let next = tokio::spawn(async move { watch.next().await });
    let tx = device.watch_sender().await;
    tx.send(Err(PositionError::PermissionDenied)).await.unwrap();

    let item = next.await.unwrap();
    assert_eq!(item, Some(Err(PositionError::PermissionDenied)));
}
