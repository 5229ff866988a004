//! Error types for the navigation coordinator.

use thiserror::Error;

/// Caller misuse of the coordinator.
///
/// External failures (routing, search) never surface here; they arrive as
/// neutral values and [`Notice`](super::Notice)s.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// A candidate without coordinates cannot become a destination.
    #[error("Destination '{0}' has no coordinates; retrieve it first")]
    MissingCoordinates(String),

    /// A test-mode operation was called outside test mode.
    #[error("Test mode is not active")]
    NotInTestMode,

    /// A live navigation command was issued while test mode is active.
    #[error("Test mode is active; exit it before changing live navigation")]
    TestModeActive,
}
