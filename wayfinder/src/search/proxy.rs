//! Failure-absorbing search boundary.
//!
//! [`PlaceSearchProxy`] wraps a [`PlaceSearch`] service and turns every
//! failure into a neutral value (no candidates, no place), logging the
//! cause. It also owns the session token shared by suggest and retrieve.

use parking_lot::Mutex;
use tracing::{debug, warn};

use super::client::PlaceSearch;
use super::session::SessionToken;
use super::types::SearchCandidate;
use super::SearchError;
use crate::geo::Coordinate;

/// Search proxy with session management.
pub struct PlaceSearchProxy<S: PlaceSearch> {
    service: S,
    session: Mutex<SessionToken>,
}

impl<S: PlaceSearch> PlaceSearchProxy<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            session: Mutex::new(SessionToken::new()),
        }
    }

    /// Token used by the current session.
    pub fn session(&self) -> SessionToken {
        self.session.lock().clone()
    }

    /// Start a new billing session.
    pub fn new_session(&self) -> SessionToken {
        let token = SessionToken::new();
        *self.session.lock() = token.clone();
        debug!(session = %token, "New search session");
        token
    }

    /// Suggest places matching `query`, biased toward `proximity`.
    ///
    /// Blank queries and missing credentials return no candidates without
    /// touching the network.
    pub async fn search(&self, query: &str, proximity: Option<Coordinate>) -> Vec<SearchCandidate> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        if !self.service.is_configured() {
            debug!("Search service not configured, returning no candidates");
            return Vec::new();
        }

        let session = self.session();
        match self.service.suggest(query, proximity, &session).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(error = %e, query, "Place search failed");
                Vec::new()
            }
        }
    }

    /// Fetch full details (including coordinates) for a candidate id.
    pub async fn retrieve(&self, id: &str) -> Option<SearchCandidate> {
        if id.is_empty() || !self.service.is_configured() {
            return None;
        }

        let session = self.session();
        match self.service.retrieve(id, &session).await {
            Ok(candidate) => Some(candidate),
            Err(SearchError::NotFound(_)) => {
                debug!(id, "Place not found");
                None
            }
            Err(e) => {
                warn!(error = %e, id, "Place retrieve failed");
                None
            }
        }
    }

    /// Return `candidate` with coordinates, retrieving them when missing.
    pub async fn resolve(&self, candidate: SearchCandidate) -> Option<SearchCandidate> {
        if candidate.has_coordinates() {
            return Some(candidate);
        }
        self.retrieve(&candidate.id).await
    }
}
