//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;
use std::time::Duration;

use wayfinder::app_state::AppStateError;
use wayfinder::config::ConfigFileError;
use wayfinder::http::HttpError;
use wayfinder::navigation::NavigationError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(ConfigFileError),
    /// Persisted app state could not be read or written
    AppState(AppStateError),
    /// No Mapbox access token in config or environment
    MissingToken,
    /// Failed to build the HTTP client
    Http(HttpError),
    /// Search returned nothing usable
    NoResults(String),
    /// Coordinator rejected a command
    Navigation(NavigationError),
    /// A background operation did not finish in time
    Timeout { what: &'static str, after: Duration },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::MissingToken => {
                eprintln!();
                eprintln!("Set a token in one of these places:");
                eprintln!("  1. access_token under [mapbox] in the config file");
                eprintln!("     (run 'wayfinder config init' to create it)");
                eprintln!("  2. the MAPBOX_TOKEN environment variable");
            }
            CliError::Config(ConfigFileError::InvalidValue { .. }) => {
                eprintln!();
                eprintln!("Fix the value above or run 'wayfinder config show' to review settings.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::AppState(e) => write!(f, "App state error: {}", e),
            CliError::MissingToken => write!(f, "No Mapbox access token configured"),
            CliError::Http(e) => write!(f, "Failed to create HTTP client: {}", e),
            CliError::NoResults(query) => write!(f, "No places found for '{}'", query),
            CliError::Navigation(e) => write!(f, "Navigation error: {}", e),
            CliError::Timeout { what, after } => {
                write!(f, "Timed out waiting for {} after {}s", what, after.as_secs())
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::AppState(e) => Some(e),
            CliError::Http(e) => Some(e),
            CliError::Navigation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<AppStateError> for CliError {
    fn from(e: AppStateError) -> Self {
        CliError::AppState(e)
    }
}

impl From<HttpError> for CliError {
    fn from(e: HttpError) -> Self {
        CliError::Http(e)
    }
}

impl From<NavigationError> for CliError {
    fn from(e: NavigationError) -> Self {
        CliError::Navigation(e)
    }
}
