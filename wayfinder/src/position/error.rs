//! Error types for position sourcing.

use std::time::Duration;

use thiserror::Error;

/// Errors surfaced by [`PositionSource`](super::PositionSource).
///
/// Unlike routing and search failures, these reach the caller: the UI has to
/// tell "ask for permission" apart from "try again later".
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PositionError {
    /// No positioning capability exists on this device.
    #[error("Position unavailable: {0}")]
    Unavailable(String),

    /// The user or platform denied access to positioning.
    #[error("Location permission denied")]
    PermissionDenied,

    /// No fix arrived within the time budget.
    #[error("Position request timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

impl PositionError {
    /// True when the caller should prompt the user for permission.
    pub fn requires_permission(&self) -> bool {
        matches!(self, PositionError::PermissionDenied)
    }
}
