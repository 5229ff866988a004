//! Configuration management CLI commands.
//!
//! Provides `config path`, `config show` and `config init`.

use std::path::Path;

use clap::Subcommand;
use wayfinder::app_state::AppStateStore;
use wayfinder::config::ConfigFile;

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Show the effective settings
    Show,

    /// Write a commented config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands, path: &Path) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => run_path(path),
        ConfigCommands::Show => run_show(path),
        ConfigCommands::Init { force } => run_init(path, force),
    }
}

fn run_path(path: &Path) -> Result<(), CliError> {
    println!("{}", path.display());
    Ok(())
}

fn run_show(path: &Path) -> Result<(), CliError> {
    let config = ConfigFile::load_from(path)?;
    let token = config.resolve_access_token();

    println!("Configuration Settings");
    println!("======================");
    println!();
    println!("[mapbox]");
    println!("  access_token = {}", mask_token(&token));
    println!("  directions_url = {}", config.mapbox.directions_url);
    println!("  search_url = {}", config.mapbox.search_url);
    println!();
    println!("[routing]");
    println!("  profile = {}", config.routing.profile);
    println!("  language = {}", config.routing.language);
    println!("  timeout = {}s", config.routing.timeout);
    println!();
    println!("[search]");
    println!("  limit = {}", config.search.limit);
    println!("  types = {}", config.search.types);
    println!("  language = {}", config.search.language);
    println!("  debounce_ms = {}", config.search.debounce_ms);
    println!();
    println!("[location]");
    println!("  timeout = {}s", config.location.timeout_secs);
    println!("  current_max_age = {}s", config.location.current_max_age_secs);
    println!("  watch_max_age = {}s", config.location.watch_max_age_secs);
    println!("  mock_interval = {}s", config.location.mock_interval_secs);
    println!("  stale_after = {}s", config.location.stale_after_secs);
    println!();
    println!("[test_mode]");
    println!("  origin = {}", config.test_mode.origin);
    println!("  destination = {}", config.test_mode.destination);
    println!();
    println!("[logging]");
    println!("  file = {}", config.logging.file.display());

    let state = AppStateStore::open_default()?.get();
    println!();
    println!("App state");
    println!("  language = {}", state.language);
    println!("  splash_enabled = {}", state.splash_enabled);
    println!("  seen_onboarding = {}", state.seen_onboarding);

    Ok(())
}

fn run_init(path: &Path, force: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        println!("Config file already exists: {}", path.display());
        println!("Use --force to overwrite it with defaults.");
        return Ok(());
    }

    ConfigFile::default().save_to(path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

/// Show only the token prefix.
fn mask_token(token: &str) -> String {
    if token.is_empty() {
        return "(not set)".to_string();
    }
    let visible: String = token.chars().take(6).collect();
    format!("{}...", visible)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token(""), "(not set)");
        assert_eq!(mask_token("pk.eyJ1Ijoid2F5"), "pk.eyJ...");
    }
}
