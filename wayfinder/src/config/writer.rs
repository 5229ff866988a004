//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let access_token = config.mapbox.access_token.as_deref().unwrap_or("");

    format!(
        r#"[mapbox]
; Mapbox access token used for directions and place search.
; When empty, the MAPBOX_TOKEN environment variable is used instead.
; Without a token, routes come back empty and search returns no results.
; Get one at: https://www.mapbox.com/
access_token = {}
; Directions API base URL (profile and coordinates are appended)
directions_url = {}
; Search Box API base URL (/suggest and /retrieve are appended)
search_url = {}

[routing]
; Travel profile:
;   driving - Road network for cars (default)
;   walking - Pedestrian paths and sidewalks
;   cycling - Bike lanes and low-traffic roads
profile = {}
; Language for turn-by-turn instructions (e.g., es, en)
language = {}
; HTTP timeout for routing and search requests in seconds (default: 10)
timeout = {}

[search]
; Maximum number of suggestions per query (1-10, default: 8)
limit = {}
; Comma-separated place types to search (default: poi,address)
types = {}
; Language for suggestion labels
language = {}
; Quiet period after the last keystroke before a query is sent, in milliseconds
debounce_ms = {}

[location]
; Time budget for a single device fix in seconds (default: 10)
timeout = {}
; Accept a cached fix up to this age for one-shot requests in seconds (default: 300)
current_max_age = {}
; Accept a cached fix up to this age while watching in seconds (default: 60)
watch_max_age = {}
; Re-emit interval while a mock location is active in seconds (default: 5)
mock_interval = {}
; When leaving test mode, refresh the live location if it is older than this (default: 300)
stale_after = {}

[test_mode]
; Fixed coordinates used for test routes, as lat,lon
origin = {}
destination = {}

[logging]
; Log file location
file = {}
"#,
        access_token,
        config.mapbox.directions_url,
        config.mapbox.search_url,
        config.routing.profile,
        config.routing.language,
        config.routing.timeout,
        config.search.limit,
        config.search.types,
        config.search.language,
        config.search.debounce_ms,
        config.location.timeout_secs,
        config.location.current_max_age_secs,
        config.location.watch_max_age_secs,
        config.location.mock_interval_secs,
        config.location.stale_after_secs,
        config.test_mode.origin,
        config.test_mode.destination,
        path_to_string(&config.logging.file),
    )
}

/// Render a path with the home directory collapsed back to `~`.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_written_config_has_every_section() {
        let content = to_config_string(&ConfigFile::default());

        for section in [
            "[mapbox]",
            "[routing]",
            "[search]",
            "[location]",
            "[test_mode]",
            "[logging]",
        ] {
            assert!(content.contains(section), "missing {}", section);
        }
        assert!(content.contains("access_token = \n"));
        assert!(content.contains("profile = driving"));
    }

    #[test]
    fn test_home_paths_are_collapsed() {
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".wayfinder").join("wayfinder.log");
            assert_eq!(path_to_string(&path), "~/.wayfinder/wayfinder.log");
        }
    }
}
