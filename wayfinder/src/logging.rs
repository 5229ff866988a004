//! Logging setup for Wayfinder.
//!
//! Provides structured logging with file output and optional console output:
//! - Writes to the configured log file (cleared on session start)
//! - Optionally mirrors events to stdout
//! - Configurable via RUST_LOG environment variable

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "wayfinder.log";

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping this guard will flush and close the log file writer.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Initialize the global tracing subscriber.
///
/// Creates `log_dir` if needed, clears any previous `log_file`, and installs
/// a file layer plus an optional stdout layer. The filter comes from
/// `RUST_LOG` when set, otherwise `debug` or `info`.
///
/// # Errors
///
/// Returns an error if the log directory cannot be created or the log file
/// cannot be cleared.
pub fn init_logging(
    log_dir: &Path,
    log_file: &str,
    stdout_enabled: bool,
    debug: bool,
) -> Result<LoggingGuard, io::Error> {
    prepare_log_file(log_dir, log_file)?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_file);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_span_events(FmtSpan::CLOSE);

    let stdout_layer = stdout_enabled.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(io::stdout)
            .with_ansi(true)
            .compact()
    });

    let default_level = if debug { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Split a configured log path into the directory and file name that
/// [`init_logging`] takes.
pub fn split_log_path(path: &Path) -> (PathBuf, String) {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let file = path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());
    (dir, file)
}

fn prepare_log_file(log_dir: &Path, log_file: &str) -> Result<PathBuf, io::Error> {
    fs::create_dir_all(log_dir)?;
    let log_path = log_dir.join(log_file);
    fs::write(&log_path, "")?;
    Ok(log_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_creates_directory_and_file() {
        let temp = TempDir::new().unwrap();
        let log_dir = temp.path().join("logs");

        let log_path = prepare_log_file(&log_dir, "test.log").unwrap();

        assert!(log_dir.exists());
        assert_eq!(fs::read_to_string(&log_path).unwrap(), "");
    }

    #[test]
    fn test_clears_existing_file() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("test.log"), "old log data").unwrap();

        let log_path = prepare_log_file(temp.path(), "test.log").unwrap();

        assert_eq!(fs::read_to_string(&log_path).unwrap(), "");
    }

    #[test]
    fn test_split_log_path() {
        let (dir, file) = split_log_path(Path::new("/var/log/wayfinder/app.log"));
        assert_eq!(dir, PathBuf::from("/var/log/wayfinder"));
        assert_eq!(file, "app.log");

        let (dir, file) = split_log_path(Path::new("app.log"));
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(file, "app.log");
    }
}
