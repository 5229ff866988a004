//! Route fetching.
//!
//! - [`RouteFetcher`] - trait for anything that can produce a [`RouteOutcome`]
//! - [`MapboxDirections`] - Mapbox Directions API implementation
//! - [`format_duration`] / [`format_distance_km`] - summary formatting
//!
//! Failures are absorbed at this boundary: callers only ever see
//! `RouteOutcome::Found` or `RouteOutcome::Empty`.

mod directions;
mod error;
mod format;
mod types;

pub use directions::{
    DirectionsConfig, MapboxDirections, RouteFetcher, DEFAULT_DIRECTIONS_URL, DEFAULT_LANGUAGE,
};
pub use error::{ProfileParseError, RouteError};
pub use format::{format_distance_km, format_duration};
pub use types::{Route, RouteOutcome, RouteStep, RoutingProfile};

#[cfg(test)]
pub use directions::tests::{sample_route, ScriptedFetcher};
