//! CLI integration tests
//!
//! Runs the built `cookbook-server` binary for the subcommands that do not
//! start the HTTP listener.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_cookbook(args: &[&str], working_dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cookbook-server"))
        .args(args)
        .current_dir(working_dir)
        .env_remove("RUST_LOG")
        .env_remove("JWT_SECRET")
        .output()
        .expect("Failed to execute command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

// =============================================================================
// Help and Version
// =============================================================================

#[test]
fn test_help_lists_subcommands() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = run_cookbook(&["--help"], temp_dir.path());

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("init"));
    assert!(text.contains("config"));
    assert!(text.contains("serve"));
}

#[test]
fn test_version_command() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = run_cookbook(&["--version"], temp_dir.path());

    assert!(output.status.success());
    assert!(stdout(&output).contains("cookbook-server"));
}

// =============================================================================
// Init
// =============================================================================

#[test]
fn test_init_scaffolds_project() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = run_cookbook(&["--no-color", "init"], temp_dir.path());

    assert!(output.status.success(), "init failed: {:?}", output);
    assert!(temp_dir.path().join("data").is_dir());

    let content =
        fs::read_to_string(temp_dir.path().join("cookbook.toml")).expect("cookbook.toml");
    assert!(content.contains("[server]"));
    assert!(content.contains("[auth]"));
    assert!(content.contains("[database]"));
    assert!(content.contains("[admin]"));

    let env = fs::read_to_string(temp_dir.path().join(".env.example")).expect(".env.example");
    assert!(env.contains("JWT_SECRET"));

    let gitignore = fs::read_to_string(temp_dir.path().join(".gitignore")).expect(".gitignore");
    assert!(gitignore.contains("/data/"));
}

#[test]
fn test_init_keeps_existing_config_without_force() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(temp_dir.path().join("cookbook.toml"), "# mine").expect("Failed to write");

    let output = run_cookbook(&["--no-color", "init"], temp_dir.path());
    assert!(output.status.success());
    assert!(stdout(&output).contains("already exists"));

    let content = fs::read_to_string(temp_dir.path().join("cookbook.toml")).expect("read");
    assert_eq!(content, "# mine");
}

#[test]
fn test_init_force_overwrites() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(temp_dir.path().join("cookbook.toml"), "# mine").expect("Failed to write");

    let output = run_cookbook(&["--no-color", "init", "--force"], temp_dir.path());
    assert!(output.status.success());

    let content = fs::read_to_string(temp_dir.path().join("cookbook.toml")).expect("read");
    assert!(content.contains("[server]"));
}

// =============================================================================
// Config
// =============================================================================

#[test]
fn test_config_validate_requires_secret() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    run_cookbook(&["--no-color", "init"], temp_dir.path());

    let output = run_cookbook(&["--no-color", "config", "--validate"], temp_dir.path());
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("JWT_SECRET"));
}

#[test]
fn test_config_shows_settings_without_secrets() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    run_cookbook(&["--no-color", "init"], temp_dir.path());

    let output = Command::new(env!("CARGO_BIN_EXE_cookbook-server"))
        .args(["--no-color", "config"])
        .current_dir(temp_dir.path())
        .env("JWT_SECRET", "cli-test-secret-value")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "config failed: {:?}", output);
    let text = stdout(&output);
    assert!(text.contains("127.0.0.1:3000"));
    assert!(text.contains("JWT_SECRET (set)"));
    assert!(!text.contains("cli-test-secret-value"));
}

#[test]
fn test_config_missing_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let output = run_cookbook(
        &["--no-color", "--config", "missing.toml", "config"],
        temp_dir.path(),
    );
    assert!(!output.status.success());
}
