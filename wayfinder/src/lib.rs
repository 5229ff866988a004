//! Wayfinder - location tracking, place search and route coordination.
//!
//! The library is organised around one coordinator that owns all navigation
//! state and a handful of I/O components it drives:
//!
//! - [`position`]: device location with a mock override and a last-known slot
//! - [`routing`]: Mapbox Directions client returning a neutral route outcome
//! - [`search`]: Mapbox Search Box proxy with session tokens and debouncing
//! - [`navigation`]: the coordinator state machine, including test mode
//! - [`render`]: layer plans a map surface applies
//!
//! ```ignore
//! use wayfinder::navigation::{NavigationCoordinator, NavigationCommand};
//!
//! let mut coordinator = NavigationCoordinator::new(fetcher, source.clone(), source.last_known(), config);
//! coordinator.enter_test_mode();
//! coordinator.generate_test_route();
//! ```

pub mod app_state;
pub mod config;
pub mod geo;
pub mod http;
pub mod logging;
pub mod navigation;
pub mod position;
pub mod render;
pub mod routing;
pub mod search;

/// Version of the Wayfinder library and CLI.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
