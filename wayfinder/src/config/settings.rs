//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

use crate::geo::Coordinate;
use crate::routing::RoutingProfile;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Mapbox credentials and endpoints
    pub mapbox: MapboxSettings,
    /// Directions request settings
    pub routing: RoutingSettings,
    /// Place search settings
    pub search: SearchSettings,
    /// Device positioning timings
    pub location: LocationSettings,
    /// Fixed coordinates used by test mode
    pub test_mode: TestModeSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Mapbox configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct MapboxSettings {
    /// Access token. When unset, `MAPBOX_TOKEN` from the environment is used.
    pub access_token: Option<String>,
    /// Directions API base URL
    pub directions_url: String,
    /// Search Box API base URL
    pub search_url: String,
}

/// Routing configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingSettings {
    pub profile: RoutingProfile,
    /// Language for maneuver instructions.
    pub language: String,
    /// HTTP timeout in seconds.
    pub timeout: u64,
}

/// Search configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSettings {
    /// Maximum suggestions per query.
    pub limit: u32,
    /// Comma-separated place types.
    pub types: String,
    pub language: String,
    /// Quiet period before a typed query is sent.
    pub debounce_ms: u64,
}

/// Location configuration. All values in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationSettings {
    pub timeout_secs: u64,
    pub current_max_age_secs: u64,
    pub watch_max_age_secs: u64,
    pub mock_interval_secs: u64,
    /// Live location age that triggers a refresh when leaving test mode.
    pub stale_after_secs: u64,
}

/// Test mode configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TestModeSettings {
    pub origin: Coordinate,
    pub destination: Coordinate,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
