//! Integration tests for the `wayfinder` binary.
//!
//! These run the built CLI against a temporary home directory so config and
//! app-state files never touch the real user profile. Nothing here needs
//! network access.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

/// Run the CLI with `home` as the home directory and no ambient token.
fn run_cli(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_wayfinder"))
        .args(args)
        .env("HOME", home)
        .env_remove("MAPBOX_TOKEN")
        .env_remove("WAYFINDER_CONFIG")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command")
}

/// Assert a command succeeded.
fn assert_success(output: &Output, context: &str) {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        panic!(
            "{} failed:\nstdout: {}\nstderr: {}",
            context, stdout, stderr
        );
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_config_init_writes_commented_file() {
    let home = TempDir::new().unwrap();
    let config_path = home.path().join("custom").join("config.ini");
    let config_arg = config_path.to_str().unwrap();

    let output = run_cli(home.path(), &["config", "init", "--config", config_arg]);
    assert_success(&output, "config init");

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[mapbox]"));
    assert!(content.contains("; Travel profile:"));

    let output = run_cli(home.path(), &["config", "init", "--config", config_arg]);
    assert_success(&output, "second config init");
    assert!(stdout(&output).contains("already exists"));
}

#[test]
fn test_config_path_honours_override() {
    let home = TempDir::new().unwrap();
    let config_path = home.path().join("elsewhere.ini");

    let output = run_cli(
        home.path(),
        &["config", "path", "--config", config_path.to_str().unwrap()],
    );

    assert_success(&output, "config path");
    assert_eq!(stdout(&output).trim(), config_path.display().to_string());
}

#[test]
fn test_config_show_uses_file_values() {
    let home = TempDir::new().unwrap();
    let config_path = home.path().join("config.ini");
    std::fs::write(
        &config_path,
        "[routing]\nprofile = walking\n\n[mapbox]\naccess_token = pk.abcdefghij\n",
    )
    .unwrap();

    let output = run_cli(
        home.path(),
        &["config", "show", "--config", config_path.to_str().unwrap()],
    );

    assert_success(&output, "config show");
    let text = stdout(&output);
    assert!(text.contains("profile = walking"));
    assert!(text.contains("access_token = pk.abc..."));
    assert!(!text.contains("pk.abcdefghij"));
    assert!(text.contains("seen_onboarding = false"));
}

#[test]
fn test_invalid_config_exits_with_error() {
    let home = TempDir::new().unwrap();
    let config_path = home.path().join("config.ini");
    std::fs::write(&config_path, "[routing]\nprofile = teleport\n").unwrap();

    let output = run_cli(
        home.path(),
        &["config", "show", "--config", config_path.to_str().unwrap()],
    );

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("routing.profile"));
}

#[test]
fn test_route_without_token_explains_setup() {
    let home = TempDir::new().unwrap();

    let output = run_cli(
        home.path(),
        &["route", "--from", "20.674289,-103.386854", "--to", "20.689791,-103.417812"],
    );

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No Mapbox access token"));
    assert!(stderr.contains("MAPBOX_TOKEN"));
    assert!(home.path().join(".wayfinder").join("app-state.json").exists());
}
