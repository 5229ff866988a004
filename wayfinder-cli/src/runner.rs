//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization and construction of
//! the network-backed components shared by command handlers.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use wayfinder::app_state::{AppStateStore, AppStateUpdate};
use wayfinder::config::{config_file_path, ConfigFile};
use wayfinder::http::AsyncReqwestClient;
use wayfinder::logging::{init_logging, split_log_path, LoggingGuard};
use wayfinder::routing::MapboxDirections;
use wayfinder::search::{MapboxSearchBox, PlaceSearchProxy};

use crate::error::CliError;

/// Global flags that affect setup.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub debug: bool,
    pub stdout_logging: bool,
    /// Overrides the default config file location.
    pub config_path: Option<PathBuf>,
}

impl RunOptions {
    pub fn config_path(&self) -> PathBuf {
        self.config_path.clone().unwrap_or_else(config_file_path)
    }
}

pub type Directions = MapboxDirections<AsyncReqwestClient>;
pub type SearchProxy = PlaceSearchProxy<MapboxSearchBox<AsyncReqwestClient>>;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    _logging_guard: LoggingGuard,
    config_path: PathBuf,
    /// Loaded configuration file
    config: ConfigFile,
    app_state: AppStateStore,
}

impl CliRunner {
    /// Load config, initialize logging and open the persisted app state.
    pub fn new(options: RunOptions) -> Result<Self, CliError> {
        let config_path = options.config_path();
        let config = ConfigFile::load_from(&config_path)?;

        let (log_dir, log_file) = split_log_path(&config.logging.file);
        let logging_guard =
            init_logging(&log_dir, &log_file, options.stdout_logging, options.debug)
                .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        let app_state = AppStateStore::open_default()?;

        Ok(Self {
            _logging_guard: logging_guard,
            config_path,
            config,
            app_state,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information and show the first-run hint once.
    pub fn log_startup(&self, command: &str) -> Result<(), CliError> {
        info!("Wayfinder v{}", wayfinder::VERSION);
        info!(command, "Wayfinder CLI command starting");

        if !self.app_state.get().seen_onboarding {
            println!("Welcome to Wayfinder. Settings live in:");
            println!("  {}", self.config_path.display());
            println!("Run 'wayfinder config init' to create a commented config file.");
            println!();
            self.app_state
                .update(AppStateUpdate::SeenOnboarding(true))?;
        }
        Ok(())
    }

    /// Fail with [`CliError::MissingToken`] unless a token is available.
    pub fn require_token(&self) -> Result<(), CliError> {
        if self.config.resolve_access_token().is_empty() {
            Err(CliError::MissingToken)
        } else {
            Ok(())
        }
    }

    fn http_client(&self) -> Result<AsyncReqwestClient, CliError> {
        Ok(AsyncReqwestClient::with_timeout(self.config.http_timeout())?)
    }

    /// Directions client built from `[mapbox]` and `[routing]`.
    pub fn directions(&self) -> Result<Directions, CliError> {
        Ok(MapboxDirections::new(
            self.http_client()?,
            self.config.directions_config(),
        ))
    }

    /// Search proxy built from `[mapbox]` and `[search]`.
    pub fn search_proxy(&self) -> Result<Arc<SearchProxy>, CliError> {
        let service = MapboxSearchBox::new(self.http_client()?, self.config.search_config());
        Ok(Arc::new(PlaceSearchProxy::new(service)))
    }
}
