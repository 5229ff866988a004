//! Place search.
//!
//! - [`PlaceSearch`] / [`MapboxSearchBox`] - raw suggest/retrieve service
//! - [`PlaceSearchProxy`] - converts failures to empty results, owns the session token
//! - [`DebouncedSearch`] - debounced, last-query-wins pipeline for search boxes

mod client;
mod debounce;
mod error;
mod proxy;
mod session;
mod types;

pub use client::{
    MapboxSearchBox, PlaceSearch, SearchConfig, DEFAULT_LIMIT, DEFAULT_SEARCH_URL, DEFAULT_TYPES,
};
pub use debounce::{DebouncedSearch, DEFAULT_DEBOUNCE};
pub use error::SearchError;
pub use proxy::PlaceSearchProxy;
pub use session::SessionToken;
pub use types::{PlaceContext, SearchCandidate, SearchResults};

#[cfg(test)]
pub use proxy::tests::{candidate, ScriptedSearch};
