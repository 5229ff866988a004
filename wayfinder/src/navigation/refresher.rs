//! Location refresh seam.

use std::future::Future;

use crate::position::{DeviceGeolocation, Location, PositionError, PositionSource};

/// Something that can resolve a fresh current location on demand.
pub trait LocationRefresher: Send + Sync {
    fn refresh(&self) -> impl Future<Output = Result<Location, PositionError>> + Send;
}

impl<D: DeviceGeolocation> LocationRefresher for PositionSource<D> {
    async fn refresh(&self) -> Result<Location, PositionError> {
        self.current_location().await
    }
}
