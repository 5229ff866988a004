//! Error types for route fetching.

use thiserror::Error;

use crate::http::HttpError;

/// Reasons a route request produced no route.
///
/// These never reach callers of [`RouteFetcher`](super::RouteFetcher); the
/// fetcher logs them and returns [`RouteOutcome::Empty`](super::RouteOutcome::Empty).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    /// Transport failure or non-success HTTP status.
    #[error("HTTP request failed: {0}")]
    Http(#[from] HttpError),

    /// Body could not be parsed as a directions response.
    #[error("Invalid directions response: {0}")]
    InvalidResponse(String),

    /// Service answered successfully but with zero routes.
    #[error("No route between the requested points")]
    NoRoute,

    /// Service reported an error code (e.g. `NoSegment`, `InvalidInput`).
    #[error("Directions service error {code}: {message}")]
    Service { code: String, message: String },
}

/// Unknown routing profile name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown routing profile '{0}' (expected driving, walking or cycling)")]
pub struct ProfileParseError(pub String);
