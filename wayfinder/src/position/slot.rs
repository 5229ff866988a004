//! Last-known location slot.
//!
//! A single-writer, multi-reader cell built on [`tokio::sync::watch`]. Only
//! the position source holds the [`LocationPublisher`]; everything else reads
//! through [`LastKnownLocation`].

use tokio::sync::watch;

use super::Location;

/// Create a connected publisher/reader pair, initially empty.
pub(crate) fn channel() -> (LocationPublisher, LastKnownLocation) {
    let (tx, rx) = watch::channel(None);
    (LocationPublisher { tx }, LastKnownLocation { rx })
}

/// Write side of the slot.
#[derive(Debug)]
pub(crate) struct LocationPublisher {
    tx: watch::Sender<Option<Location>>,
}

impl LocationPublisher {
    pub(crate) fn publish(&self, location: Location) {
        self.tx.send_replace(Some(location));
    }
}

/// Read side of the last-known location slot.
#[derive(Debug, Clone)]
pub struct LastKnownLocation {
    rx: watch::Receiver<Option<Location>>,
}

impl LastKnownLocation {
    /// The most recently resolved location, if any.
    pub fn get(&self) -> Option<Location> {
        self.rx.borrow().clone()
    }

    /// Receiver notified on every new location.
    pub fn subscribe(&self) -> watch::Receiver<Option<Location>> {
        self.rx.clone()
    }
}
