//! Wayfinder CLI - Command-line interface
//!
//! Drives the wayfinder library from a terminal: one-off routes and place
//! searches, a scripted test-mode run, and a full search-select-confirm
//! navigation flow.

mod commands;
mod error;
mod runner;
mod text_map;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use wayfinder::geo::Coordinate;
use wayfinder::routing::RoutingProfile;

use commands::config::ConfigCommands;
use error::CliError;

#[derive(Parser)]
#[command(name = "wayfinder")]
#[command(version = wayfinder::VERSION)]
#[command(about = "Location, place search and route coordination", long_about = None)]
struct Cli {
    /// Enable debug logging regardless of RUST_LOG
    #[arg(long, global = true)]
    debug: bool,

    /// Mirror log output to stdout
    #[arg(long, global = true)]
    verbose: bool,

    /// Config file to use instead of ~/.wayfinder/config.ini
    #[arg(long, global = true, env = "WAYFINDER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a route between two points and print a summary
    Route {
        /// Start point as lat,lon
        #[arg(long, allow_hyphen_values = true)]
        from: Coordinate,

        /// End point as lat,lon
        #[arg(long, allow_hyphen_values = true)]
        to: Coordinate,

        /// Travel profile (driving, walking, cycling); defaults to config
        #[arg(long)]
        profile: Option<RoutingProfile>,

        /// Print every maneuver instead of the summary only
        #[arg(long)]
        steps: bool,
    },

    /// Search for places and print the candidates
    Search {
        /// Free-text query; omit to read queries interactively from stdin
        query: Option<String>,

        /// Bias results toward this point (lat,lon)
        #[arg(long, allow_hyphen_values = true)]
        near: Option<Coordinate>,
    },

    /// Run test mode against the fixed test coordinates and print the map plan
    TestRoute {
        /// Print render plans as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search, pick the first result, confirm and print the navigation state
    Navigate {
        /// Free-text destination query
        query: String,

        /// Current location as lat,lon
        #[arg(long, allow_hyphen_values = true)]
        at: Coordinate,

        /// Print render plans as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect or initialize the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        e.exit();
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let options = runner::RunOptions {
        debug: cli.debug,
        stdout_logging: cli.verbose,
        config_path: cli.config,
    };

    match cli.command {
        Commands::Config { command } => {
            commands::config::run(command, &options.config_path())
        }
        Commands::Route {
            from,
            to,
            profile,
            steps,
        } => commands::route::run(options, from, to, profile, steps).await,
        Commands::Search { query, near } => {
            commands::search::run(options, query.as_deref(), near).await
        }
        Commands::TestRoute { json } => commands::test_route::run(options, json).await,
        Commands::Navigate { query, at, json } => {
            commands::navigate::run(options, &query, at, json).await
        }
    }
}
