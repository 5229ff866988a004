//! User configuration stored in `~/.wayfinder/config.ini`.
//!
//! The file is split into `[mapbox]`, `[routing]`, `[search]`, `[location]`,
//! `[test_mode]` and `[logging]` sections. Missing keys fall back to the
//! values in [`defaults`], and [`ConfigFile`] converts into the runtime
//! configuration each component takes.
//!
//! # Example
//!
//! ```no_run
//! use wayfinder::config::ConfigFile;
//!
//! let config = ConfigFile::load()?;
//! let directions = config.directions_config();
//! # Ok::<(), wayfinder::config::ConfigFileError>(())
//! ```

mod convert;
pub mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    ConfigFile, LocationSettings, LoggingSettings, MapboxSettings, RoutingSettings,
    SearchSettings, TestModeSettings,
};
