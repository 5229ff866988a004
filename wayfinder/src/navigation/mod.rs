//! Navigation coordination.
//!
//! The [`NavigationCoordinator`] owns the navigation state machine:
//!
//! ```text
//! Idle -> Searching -> DestinationSelected -> RouteConfirmed -> RouteActive
//!                           ^    |                  |
//!                           |    +-- cancel --------+--> Idle (pin kept)
//!                           +-- route unavailable --+
//! ```
//!
//! plus an orthogonal test mode with its own isolated session.

mod command;
mod coordinator;
mod error;
mod refresher;
mod state;
mod test_mode;

pub use command::NavigationCommand;
pub use coordinator::{FetchTag, NavigationConfig, NavigationCoordinator, DEFAULT_STALE_AFTER};
pub use error::NavigationError;
pub use refresher::LocationRefresher;
pub use state::{Destination, NavigationPhase, NavigationSnapshot, NavigationState, Notice};
pub use test_mode::{DEFAULT_TEST_DESTINATION, DEFAULT_TEST_ORIGIN, TEST_DESTINATION_ID};
