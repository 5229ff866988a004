//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;
use std::str::FromStr;

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::geo::Coordinate;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [mapbox] section
    if let Some(section) = ini.section(Some("mapbox")) {
        if let Some(v) = section.get("access_token") {
            let v = v.trim();
            if !v.is_empty() {
                config.mapbox.access_token = Some(v.to_string());
            }
        }
        if let Some(v) = non_empty(section.get("directions_url")) {
            config.mapbox.directions_url = v.to_string();
        }
        if let Some(v) = non_empty(section.get("search_url")) {
            config.mapbox.search_url = v.to_string();
        }
    }

    // [routing] section
    if let Some(section) = ini.section(Some("routing")) {
        if let Some(v) = section.get("profile") {
            config.routing.profile = parse_value(
                "routing",
                "profile",
                v,
                "must be one of: driving, walking, cycling",
            )?;
        }
        if let Some(v) = non_empty(section.get("language")) {
            config.routing.language = v.to_string();
        }
        if let Some(v) = section.get("timeout") {
            config.routing.timeout = parse_positive(
                "routing",
                "timeout",
                v,
                "must be a positive integer (seconds)",
            )?;
        }
    }

    // [search] section
    if let Some(section) = ini.section(Some("search")) {
        if let Some(v) = section.get("limit") {
            config.search.limit = parse_value("search", "limit", v, "must be between 1 and 10")?;
            if !(1..=10).contains(&config.search.limit) {
                return Err(invalid("search", "limit", v, "must be between 1 and 10"));
            }
        }
        if let Some(v) = non_empty(section.get("types")) {
            config.search.types = v.to_string();
        }
        if let Some(v) = non_empty(section.get("language")) {
            config.search.language = v.to_string();
        }
        if let Some(v) = section.get("debounce_ms") {
            config.search.debounce_ms = parse_value(
                "search",
                "debounce_ms",
                v,
                "must be a non-negative integer (milliseconds)",
            )?;
        }
    }

    // [location] section
    if let Some(section) = ini.section(Some("location")) {
        let seconds = "must be a positive integer (seconds)";
        if let Some(v) = section.get("timeout") {
            config.location.timeout_secs = parse_positive("location", "timeout", v, seconds)?;
        }
        if let Some(v) = section.get("current_max_age") {
            config.location.current_max_age_secs =
                parse_value("location", "current_max_age", v, seconds)?;
        }
        if let Some(v) = section.get("watch_max_age") {
            config.location.watch_max_age_secs =
                parse_value("location", "watch_max_age", v, seconds)?;
        }
        if let Some(v) = section.get("mock_interval") {
            config.location.mock_interval_secs =
                parse_positive("location", "mock_interval", v, seconds)?;
        }
        if let Some(v) = section.get("stale_after") {
            config.location.stale_after_secs = parse_value("location", "stale_after", v, seconds)?;
        }
    }

    // [test_mode] section
    if let Some(section) = ini.section(Some("test_mode")) {
        let reason = "expected 'lat,lon' in decimal degrees";
        if let Some(v) = section.get("origin") {
            config.test_mode.origin = parse_value::<Coordinate>("test_mode", "origin", v, reason)?;
        }
        if let Some(v) = section.get("destination") {
            config.test_mode.destination =
                parse_value::<Coordinate>("test_mode", "destination", v, reason)?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = non_empty(section.get("file")) {
            config.logging.file = expand_tilde(v);
        }
    }

    Ok(config)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_value<T: FromStr>(
    section: &str,
    key: &str,
    value: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, reason))
}

fn parse_positive(section: &str, key: &str, value: &str, reason: &str) -> Result<u64, ConfigFileError> {
    match parse_value::<u64>(section, key, value, reason)? {
        0 => Err(invalid(section, key, value, reason)),
        n => Ok(n),
    }
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::*;
    use crate::routing::RoutingProfile;
    use tempfile::TempDir;

    fn load(content: &str) -> Result<ConfigFile, ConfigFileError> {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, content).unwrap();
        ConfigFile::load_from(&config_path)
    }

    #[test]
    fn test_invalid_profile() {
        let err = load(
            r#"
[routing]
profile = flying
"#,
        )
        .unwrap_err();

        assert!(err.to_string().contains("must be one of:"));
        assert!(err.to_string().contains("profile"));
    }

    #[test]
    fn test_profile_is_case_insensitive() {
        let config = load(
            r#"
[routing]
profile = Cycling
"#,
        )
        .unwrap();

        assert_eq!(config.routing.profile, RoutingProfile::Cycling);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = load(
            r#"
[location]
timeout = 0
"#,
        )
        .unwrap_err();

        assert!(matches!(err, ConfigFileError::InvalidValue { ref key, .. } if key == "timeout"));
    }

    #[test]
    fn test_search_limit_out_of_range() {
        let err = load(
            r#"
[search]
limit = 25
"#,
        )
        .unwrap_err();

        assert!(err.to_string().contains("search.limit"));
    }

    #[test]
    fn test_test_mode_coordinates() {
        let config = load(
            r#"
[test_mode]
origin = 19.4326, -99.1332
destination = 19.4270,-99.1677
"#,
        )
        .unwrap();

        assert_eq!(config.test_mode.origin, Coordinate::new(19.4326, -99.1332));
        assert_eq!(config.test_mode.destination, Coordinate::new(19.4270, -99.1677));
    }

    #[test]
    fn test_malformed_test_coordinate() {
        let err = load(
            r#"
[test_mode]
origin = -99.1332
"#,
        )
        .unwrap_err();

        assert!(err.to_string().contains("lat,lon"));
    }

    #[test]
    fn test_empty_token_stays_unset() {
        let config = load(
            r#"
[mapbox]
access_token =
"#,
        )
        .unwrap();

        assert!(config.mapbox.access_token.is_none());
    }

    #[test]
    fn test_expand_tilde() {
        let path = expand_tilde("~/test/path");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(path, home.join("test/path"));
        }

        let path = expand_tilde("/absolute/path");
        assert_eq!(path, PathBuf::from("/absolute/path"));
    }

    #[test]
    fn test_partial_config() {
        let config = load(
            r#"
[search]
debounce_ms = 150
"#,
        )
        .unwrap();

        assert_eq!(config.search.debounce_ms, 150);
        assert_eq!(config.search.limit, crate::search::DEFAULT_LIMIT);
        assert_eq!(config.location.timeout_secs, DEFAULT_LOCATION_TIMEOUT_SECS);
        assert_eq!(config.routing.timeout, DEFAULT_HTTP_TIMEOUT_SECS);
    }
}
