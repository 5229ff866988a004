//! Live/mock position source.
//!
//! [`PositionSource`] is the only writer of the last-known location slot. It
//! switches between the device and an operator-set mock through an explicit
//! [`SourceMode`], so exactly one backend produces locations at a time.

use std::sync::Arc;
use std::time::Duration;

use futures::Stream;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use super::device::{DeviceGeolocation, GeolocationOptions};
use super::slot::{self, LastKnownLocation, LocationPublisher};
use super::{Location, LocationSource, MockLocation, PositionError};

/// Buffered locations per watch before the producer waits for the consumer.
const WATCH_BUFFER: usize = 16;

/// Timing configuration for a [`PositionSource`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionSourceConfig {
    /// Time budget for a device fix.
    pub timeout: Duration,
    /// Maximum cached fix age for one-shot requests.
    pub current_max_age: Duration,
    /// Maximum cached fix age for continuous watches.
    pub watch_max_age: Duration,
    /// Re-emission interval while a mock is active.
    pub mock_interval: Duration,
}

impl Default for PositionSourceConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            current_max_age: Duration::from_secs(300),
            watch_max_age: Duration::from_secs(60),
            mock_interval: Duration::from_secs(5),
        }
    }
}

/// Backend currently producing locations.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceMode {
    Live,
    Mock(MockLocation),
}

struct SourceInner<D> {
    device: D,
    config: PositionSourceConfig,
    mode: watch::Sender<SourceMode>,
    publisher: LocationPublisher,
    last_known: LastKnownLocation,
    shutdown: CancellationToken,
}

impl<D: DeviceGeolocation> SourceInner<D> {
    fn active_mock(&self) -> Option<MockLocation> {
        match &*self.mode.borrow() {
            SourceMode::Mock(mock) => Some(mock.clone()),
            SourceMode::Live => None,
        }
    }

    fn publish_mock(&self, mock: &MockLocation) -> Location {
        let location = mock.to_location();
        self.publisher.publish(location.clone());
        location
    }

    /// Publish the active mock, if any.
    ///
    /// The mode borrow is held across the write, so a concurrent
    /// `clear_mock` either lands first (nothing is published) or waits.
    fn publish_active_mock(&self) -> Option<Location> {
        let mode = self.mode.borrow();
        match &*mode {
            SourceMode::Mock(mock) => Some(self.publish_mock(mock)),
            SourceMode::Live => None,
        }
    }

    /// Publish a live fix unless a mock is active, under the same borrow.
    fn publish_live(&self, location: Location) -> Option<Location> {
        let mode = self.mode.borrow();
        if let SourceMode::Mock(_) = &*mode {
            return None;
        }
        self.publisher.publish(location.clone());
        Some(location)
    }

    async fn current_location(&self) -> Result<Location, PositionError> {
        if let Some(location) = self.publish_active_mock() {
            return Ok(location);
        }

        let options = GeolocationOptions::one_shot(self.config.timeout, self.config.current_max_age);
        let fix = match tokio::time::timeout(options.timeout, self.device.current_position(&options))
            .await
        {
            Ok(Ok(fix)) => fix,
            Ok(Err(e)) => {
                warn!(error = %e, "Live location request failed");
                return Err(e);
            }
            Err(_) => {
                warn!(timeout_secs = options.timeout.as_secs(), "Live location request timed out");
                return Err(PositionError::Timeout(options.timeout));
            }
        };

        let live = Location::live(fix.latitude, fix.longitude, fix.accuracy);
        let Some(location) = self.publish_live(live.clone()) else {
            // A mock set while the request was in flight takes precedence.
            debug!("Mock activated during live request, discarding device fix");
            return Ok(self.publish_active_mock().unwrap_or(live));
        };
        debug!(
            lat = format!("{:.6}", location.latitude),
            lon = format!("{:.6}", location.longitude),
            accuracy_m = ?location.accuracy,
            "Live location resolved"
        );
        Ok(location)
    }
}

/// Position source switching between a device and a mock location.
///
/// Cloning yields another handle to the same source.
pub struct PositionSource<D: DeviceGeolocation> {
    inner: Arc<SourceInner<D>>,
}

impl<D: DeviceGeolocation> Clone for PositionSource<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D: DeviceGeolocation> PositionSource<D> {
    pub fn new(device: D) -> Self {
        Self::with_config(device, PositionSourceConfig::default())
    }

    pub fn with_config(device: D, config: PositionSourceConfig) -> Self {
        let (mode, _) = watch::channel(SourceMode::Live);
        let (publisher, last_known) = slot::channel();
        Self {
            inner: Arc::new(SourceInner {
                device,
                config,
                mode,
                publisher,
                last_known,
                shutdown: CancellationToken::new(),
            }),
        }
    }

    /// Reader for the last-known location slot.
    pub fn last_known(&self) -> LastKnownLocation {
        self.inner.last_known.clone()
    }

    pub fn config(&self) -> &PositionSourceConfig {
        &self.inner.config
    }

    pub fn mode(&self) -> SourceMode {
        self.inner.mode.borrow().clone()
    }

    pub fn is_mock_active(&self) -> bool {
        matches!(&*self.inner.mode.borrow(), SourceMode::Mock(_))
    }

    /// Resolve the current location once.
    ///
    /// Returns the mock when one is active; otherwise makes exactly one device
    /// request. The result is published to the last-known slot.
    pub async fn current_location(&self) -> Result<Location, PositionError> {
        self.inner.current_location().await
    }

    /// Start a new, independent location subscription.
    ///
    /// The watch is lazy: nothing touches the device until the first
    /// [`LocationWatch::next`].
    pub fn watch(&self) -> LocationWatch<D> {
        LocationWatch {
            source: Arc::clone(&self.inner),
            state: WatchState::Pending,
            cancellation: self.inner.shutdown.child_token(),
        }
    }

    /// Switch to mock mode and publish the mock location.
    pub fn set_mock(&self, mock: MockLocation) {
        info!(
            lat = format!("{:.6}", mock.latitude),
            lon = format!("{:.6}", mock.longitude),
            "Mock location set"
        );
        let location = mock.to_location();
        // Publish under the write lock so no live fix lands in between.
        self.inner.mode.send_modify(|mode| {
            self.inner.publisher.publish(location.clone());
            *mode = SourceMode::Mock(mock);
        });
        trace!(source = %location.source, "Mock location published");
    }

    /// Return to live mode and fetch one fresh live location.
    ///
    /// Mock emission stops before the fetch starts.
    pub async fn clear_mock(&self) -> Result<Location, PositionError> {
        let previous = self.inner.mode.send_replace(SourceMode::Live);
        info!(
            was_mock = matches!(previous, SourceMode::Mock(_)),
            "Mock location cleared"
        );
        self.inner.current_location().await
    }

    /// Stop every watch created from this source.
    pub fn shutdown(&self) {
        self.inner.shutdown.cancel();
    }
}

enum WatchState {
    Pending,
    Running(mpsc::Receiver<Result<Location, PositionError>>),
    Finished,
}

/// A location subscription created by [`PositionSource::watch`].
///
/// Follows the source mode: emits the mock immediately and then every
/// `mock_interval` while a mock is active, and device fixes otherwise.
/// Cancelling or dropping the watch releases the device watch handle.
pub struct LocationWatch<D: DeviceGeolocation> {
    source: Arc<SourceInner<D>>,
    state: WatchState,
    cancellation: CancellationToken,
}

impl<D: DeviceGeolocation> LocationWatch<D> {
    /// Next location update, or `None` once the watch has ended.
    pub async fn next(&mut self) -> Option<Result<Location, PositionError>> {
        if self.cancellation.is_cancelled() {
            self.state = WatchState::Finished;
            return None;
        }

        if matches!(self.state, WatchState::Pending) {
            self.state = WatchState::Running(self.start());
        }

        loop {
            let WatchState::Running(updates) = &mut self.state else {
                return None;
            };

            let item = tokio::select! {
                item = updates.recv() => item,
                _ = self.cancellation.cancelled() => None,
            };

            match item {
                None => {
                    self.state = WatchState::Finished;
                    return None;
                }
                // Buffered before the mock was cleared.
                Some(Ok(location))
                    if location.source == LocationSource::Mock
                        && self.source.active_mock().is_none() =>
                {
                    trace!("Dropping stale mock emission");
                }
                Some(item) => return Some(item),
            }
        }
    }

    /// Stop the watch and release the device handle.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Adapt into a [`Stream`] of location updates.
    pub fn into_stream(self) -> impl Stream<Item = Result<Location, PositionError>> + Send {
        futures::stream::unfold(self, |mut watch| async move {
            let item = watch.next().await?;
            Some((item, watch))
        })
    }

    fn start(&self) -> mpsc::Receiver<Result<Location, PositionError>> {
        let (tx, rx) = mpsc::channel(WATCH_BUFFER);
        tokio::spawn(drive_watch(
            Arc::clone(&self.source),
            tx,
            self.cancellation.clone(),
        ));
        rx
    }
}

impl<D: DeviceGeolocation> Drop for LocationWatch<D> {
    fn drop(&mut self) {
        self.cancellation.cancel();
    }
}

enum PhaseEnd {
    ModeChanged,
    Done,
}

type UpdateSender = mpsc::Sender<Result<Location, PositionError>>;

async fn drive_watch<D: DeviceGeolocation>(
    source: Arc<SourceInner<D>>,
    tx: UpdateSender,
    cancellation: CancellationToken,
) {
    let mut mode_rx = source.mode.subscribe();

    loop {
        let end = if source.active_mock().is_some() {
            emit_mock(&source, &tx, &mut mode_rx, &cancellation).await
        } else {
            forward_device(&source, &tx, &mut mode_rx, &cancellation).await
        };

        if let PhaseEnd::Done = end {
            break;
        }
    }

    debug!("Location watch stopped");
}

async fn emit_mock<D: DeviceGeolocation>(
    source: &SourceInner<D>,
    tx: &UpdateSender,
    mode_rx: &mut watch::Receiver<SourceMode>,
    cancellation: &CancellationToken,
) -> PhaseEnd {
    let mut ticker = tokio::time::interval(source.config.mock_interval);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let Some(location) = source.publish_active_mock() else {
                    return PhaseEnd::ModeChanged;
                };
                if tx.send(Ok(location)).await.is_err() {
                    return PhaseEnd::Done;
                }
            }
            changed = mode_rx.changed() => {
                if changed.is_err() {
                    return PhaseEnd::Done;
                }
                if source.active_mock().is_none() {
                    return PhaseEnd::ModeChanged;
                }
            }
            _ = cancellation.cancelled() => return PhaseEnd::Done,
        }
    }
}

async fn forward_device<D: DeviceGeolocation>(
    source: &SourceInner<D>,
    tx: &UpdateSender,
    mode_rx: &mut watch::Receiver<SourceMode>,
    cancellation: &CancellationToken,
) -> PhaseEnd {
    let options = GeolocationOptions::one_shot(source.config.timeout, source.config.watch_max_age);
    let mut device_watch = match source.device.watch_position(&options) {
        Ok(watch) => watch,
        Err(e) => {
            warn!(error = %e, "Failed to start device location watch");
            let _ = tx.send(Err(e)).await;
            return PhaseEnd::Done;
        }
    };
    debug!("Device location watch started");

    loop {
        tokio::select! {
            fix = device_watch.recv() => match fix {
                Some(Ok(fix)) => {
                    let live = Location::live(fix.latitude, fix.longitude, fix.accuracy);
                    match source.publish_live(live) {
                        Some(location) => {
                            if tx.send(Ok(location)).await.is_err() {
                                return PhaseEnd::Done;
                            }
                        }
                        None => trace!("Live fix suppressed while mock is active"),
                    }
                }
                Some(Err(e)) => {
                    warn!(error = %e, "Device location watch failed");
                    let _ = tx.send(Err(e)).await;
                    return PhaseEnd::Done;
                }
                None => return PhaseEnd::Done,
            },
            changed = mode_rx.changed() => {
                if changed.is_err() {
                    return PhaseEnd::Done;
                }
                if source.active_mock().is_some() {
                    // Dropping the device watch releases it.
                    return PhaseEnd::ModeChanged;
                }
            }
            _ = cancellation.cancelled() => return PhaseEnd::Done,
        }
    }
}
