//! Conversions from file settings into the runtime configs each component takes.

use std::time::Duration;

use super::defaults::MAPBOX_TOKEN_ENV;
use super::settings::ConfigFile;
use crate::navigation::NavigationConfig;
use crate::position::PositionSourceConfig;
use crate::routing::DirectionsConfig;
use crate::search::SearchConfig;

impl ConfigFile {
    /// Access token from the file, falling back to `MAPBOX_TOKEN`.
    ///
    /// Returns an empty string when neither is set.
    pub fn resolve_access_token(&self) -> String {
        resolve_token(
            self.mapbox.access_token.as_deref(),
            std::env::var(MAPBOX_TOKEN_ENV).ok(),
        )
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.routing.timeout)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.search.debounce_ms)
    }

    pub fn directions_config(&self) -> DirectionsConfig {
        DirectionsConfig {
            base_url: self.mapbox.directions_url.clone(),
            access_token: self.resolve_access_token(),
            language: self.routing.language.clone(),
        }
    }

    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            base_url: self.mapbox.search_url.clone(),
            access_token: self.resolve_access_token(),
            types: self.search.types.clone(),
            limit: self.search.limit,
            language: self.search.language.clone(),
        }
    }

    pub fn position_config(&self) -> PositionSourceConfig {
        PositionSourceConfig {
            timeout: Duration::from_secs(self.location.timeout_secs),
            current_max_age: Duration::from_secs(self.location.current_max_age_secs),
            watch_max_age: Duration::from_secs(self.location.watch_max_age_secs),
            mock_interval: Duration::from_secs(self.location.mock_interval_secs),
        }
    }

    pub fn navigation_config(&self) -> NavigationConfig {
        NavigationConfig {
            profile: self.routing.profile,
            test_origin: self.test_mode.origin,
            test_destination: self.test_mode.destination,
            stale_after: Duration::from_secs(self.location.stale_after_secs),
        }
    }
}

fn resolve_token(configured: Option<&str>, env: Option<String>) -> String {
    configured
        .map(str::to_string)
        .or_else(|| env.filter(|t| !t.trim().is_empty()))
        .map(|t| t.trim().to_string())
        .unwrap_or_default()
}
