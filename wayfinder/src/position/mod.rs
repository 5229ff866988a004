//! Position sourcing.
//!
//! Produces the user's location from either the device or an operator-set
//! mock, never both at once, and keeps the most recent value in a
//! single-writer slot that the rest of the system reads.
//!
//! # Components
//!
//! - [`state`] - `Location`, `LocationSource`, `MockLocation`
//! - [`device`] - `DeviceGeolocation` trait with `NoDevice` and `FixedDevice`
//! - [`source`] - `PositionSource` and its `LocationWatch` subscriptions
//! - [`slot`] - `LastKnownLocation` reader
//! - [`logger`] - periodic DEBUG logging of the last-known location
//!
//! # Usage
//!
//! ```ignore
//! use wayfinder::position::{FixedDevice, MockLocation, PositionSource};
//!
//! let source = PositionSource::new(FixedDevice::new(coordinate, Some(10.0)));
//! let here = source.current_location().await?;
//!
//! source.set_mock(MockLocation::new(20.674289, -103.386854));
//! let mut watch = source.watch();
//! while let Some(update) = watch.next().await {
//!     // Mock emitted immediately, then every 5 seconds
//! }
//! ```

mod device;
mod error;
mod logger;
mod slot;
mod source;
mod state;

pub use device::{DeviceFix, DeviceGeolocation, DeviceWatch, FixedDevice, GeolocationOptions, NoDevice};
pub use error::PositionError;
pub use logger::{spawn_location_logger, DEFAULT_LOG_INTERVAL};
pub use slot::LastKnownLocation;
pub use source::{LocationWatch, PositionSource, PositionSourceConfig, SourceMode};
pub use state::{Location, LocationSource, MockLocation};

#[cfg(test)]
pub(crate) use slot::channel as last_known_channel;
#[cfg(test)]
pub use source::tests::CountingDevice;
