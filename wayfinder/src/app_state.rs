//! Persisted application state (`~/.wayfinder/app-state.json`).
//!
//! Small user-facing flags that outlive a session. [`AppStateStore`] owns the
//! file and publishes every change through a `watch` channel, so interested
//! components react to updates instead of re-reading the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::config::config_directory;

/// File name inside the config directory.
pub const APP_STATE_FILE: &str = "app-state.json";

/// Persisted application state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    /// Interface language code.
    pub language: String,
    pub splash_enabled: bool,
    pub seen_onboarding: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            splash_enabled: true,
            seen_onboarding: false,
        }
    }
}

/// A single-key change to [`AppState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppStateUpdate {
    Language(String),
    SplashEnabled(bool),
    SeenOnboarding(bool),
}

impl AppStateUpdate {
    fn apply(self, state: &mut AppState) -> bool {
        match self {
            Self::Language(language) if state.language != language => {
                state.language = language;
                true
            }
            Self::SplashEnabled(enabled) if state.splash_enabled != enabled => {
                state.splash_enabled = enabled;
                true
            }
            Self::SeenOnboarding(seen) if state.seen_onboarding != seen => {
                state.seen_onboarding = seen;
                true
            }
            _ => false,
        }
    }
}

/// Errors reading or writing the state file.
#[derive(Debug, Error)]
pub enum AppStateError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize app state: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Owner of the persisted state file.
pub struct AppStateStore {
    path: PathBuf,
    tx: watch::Sender<AppState>,
}

impl AppStateStore {
    /// Open the store at the default location.
    pub fn open_default() -> Result<Self, AppStateError> {
        Self::open(config_directory().join(APP_STATE_FILE))
    }

    /// Open the store at `path`, writing defaults when the file is absent.
    ///
    /// A file that cannot be parsed is replaced with defaults.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AppStateError> {
        let path = path.into();
        let state = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(state) => state,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "App state unreadable, resetting to defaults");
                    let state = AppState::default();
                    write_state(&path, &state)?;
                    state
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Creating app state with defaults");
                let state = AppState::default();
                write_state(&path, &state)?;
                state
            }
            Err(source) => return Err(AppStateError::Io { path, source }),
        };

        let (tx, _rx) = watch::channel(state);
        Ok(Self { path, tx })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current state.
    pub fn get(&self) -> AppState {
        self.tx.borrow().clone()
    }

    /// Receiver that observes every persisted change.
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.tx.subscribe()
    }

    /// Apply one change, persist it and notify subscribers.
    ///
    /// Returns `false` when the value was already set; nothing is written
    /// and subscribers are not woken in that case.
    pub fn update(&self, update: AppStateUpdate) -> Result<bool, AppStateError> {
        let mut next = self.get();
        if !update.apply(&mut next) {
            return Ok(false);
        }

        write_state(&self.path, &next)?;
        self.tx.send_replace(next);
        Ok(true)
    }
}

fn write_state(path: &Path, state: &AppState) -> Result<(), AppStateError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| AppStateError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let content = serde_json::to_string_pretty(state)?;
    std::fs::write(path, content).map_err(|source| AppStateError::Io {
        path: path.to_path_buf(),
        source,
    })
}
