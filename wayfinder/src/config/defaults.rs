//! Default values and constants for all configuration settings.
//!
//! Contains all `DEFAULT_*` constants and the `ConfigFile::default()`
//! implementation.

use super::file::config_directory;
use super::settings::*;
use crate::navigation::{DEFAULT_TEST_DESTINATION, DEFAULT_TEST_ORIGIN};
use crate::routing::{RoutingProfile, DEFAULT_DIRECTIONS_URL, DEFAULT_LANGUAGE};
use crate::search::{DEFAULT_LIMIT, DEFAULT_SEARCH_URL, DEFAULT_TYPES};

/// Environment variable consulted when no access token is configured.
pub const MAPBOX_TOKEN_ENV: &str = "MAPBOX_TOKEN";

/// HTTP timeout for routing and search requests (seconds).
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Debounce for typed search queries (milliseconds).
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Time budget for a device fix (seconds).
pub const DEFAULT_LOCATION_TIMEOUT_SECS: u64 = 10;

/// Maximum cached fix age for one-shot requests (seconds).
pub const DEFAULT_CURRENT_MAX_AGE_SECS: u64 = 300;

/// Maximum cached fix age for continuous watches (seconds).
pub const DEFAULT_WATCH_MAX_AGE_SECS: u64 = 60;

/// Mock re-emission interval (seconds).
pub const DEFAULT_MOCK_INTERVAL_SECS: u64 = 5;

/// Live location age that triggers a refresh after test mode (seconds).
pub const DEFAULT_STALE_AFTER_SECS: u64 = 300;

/// Log file name inside the config directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "wayfinder.log";

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            mapbox: MapboxSettings {
                access_token: None,
                directions_url: DEFAULT_DIRECTIONS_URL.to_string(),
                search_url: DEFAULT_SEARCH_URL.to_string(),
            },
            routing: RoutingSettings {
                profile: RoutingProfile::Driving,
                language: DEFAULT_LANGUAGE.to_string(),
                timeout: DEFAULT_HTTP_TIMEOUT_SECS,
            },
            search: SearchSettings {
                limit: DEFAULT_LIMIT,
                types: DEFAULT_TYPES.to_string(),
                language: DEFAULT_LANGUAGE.to_string(),
                debounce_ms: DEFAULT_DEBOUNCE_MS,
            },
            location: LocationSettings {
                timeout_secs: DEFAULT_LOCATION_TIMEOUT_SECS,
                current_max_age_secs: DEFAULT_CURRENT_MAX_AGE_SECS,
                watch_max_age_secs: DEFAULT_WATCH_MAX_AGE_SECS,
                mock_interval_secs: DEFAULT_MOCK_INTERVAL_SECS,
                stale_after_secs: DEFAULT_STALE_AFTER_SECS,
            },
            test_mode: TestModeSettings {
                origin: DEFAULT_TEST_ORIGIN,
                destination: DEFAULT_TEST_DESTINATION,
            },
            logging: LoggingSettings {
                file: config_directory().join(DEFAULT_LOG_FILE_NAME),
            },
        }
    }
}
