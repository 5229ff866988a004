//! Error types for place search.

use thiserror::Error;

use crate::http::HttpError;

/// Errors from the raw search service.
///
/// [`PlaceSearchProxy`](super::PlaceSearchProxy) converts all of these into
/// empty results; they are only visible to code calling a
/// [`PlaceSearch`](super::PlaceSearch) implementation directly.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    /// Transport failure or non-success status.
    #[error("Search service error: {0}")]
    Service(#[from] HttpError),

    /// The requested place id does not exist.
    #[error("Place '{0}' not found")]
    NotFound(String),

    /// Body could not be parsed.
    #[error("Invalid search response: {0}")]
    InvalidResponse(String),
}
