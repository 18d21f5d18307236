//! Integration tests for config loading and startup validation.
//!
//! These exercise the binary end to end for the paths that need no
//! network access: status output and startup precondition failures.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

fn tgl_binary() -> String {
    env!("CARGO_BIN_EXE_tgl").to_string()
}

fn write_config(dir: &Path, contents: &str) -> std::path::PathBuf {
    let path = dir.join("config.toml");
    std::fs::write(&path, contents).unwrap();
    path
}

/// Run the binary with an isolated HOME so no real config is picked up.
fn tgl(temp: &TempDir, args: &[&str]) -> std::process::Output {
    Command::new(tgl_binary())
        .env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.path().join(".config"))
        .args(args)
        .output()
        .expect("failed to run tgl")
}

const VALID: &str = r#"
api_token = "0123456789abcdef"
workspace_id = 42
workspace = "Acme"

[[schedules]]
project = "Acme Platform"
project_id = 101
description = "Daily work"
duration = "7h30m"
billable = true
cron = "0 17 * * 1-5"
start_hour = 8
"#;

#[test]
fn status_shows_configured_schedules() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), VALID);

    let output = tgl(&temp, &["--config", config.to_str().unwrap(), "status"]);

    assert!(
        output.status.success(),
        "status should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Workspace: Acme (ID: 42)"));
    assert!(stdout.contains("Daily work"));
    assert!(stdout.contains("0 17 * * 1-5"));
}

#[test]
fn environment_overrides_config_file() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), VALID);

    let output = Command::new(tgl_binary())
        .env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.path().join(".config"))
        .env("TGL_WORKSPACE_ID", "77")
        .args(["--config", config.to_str().unwrap(), "status"])
        .output()
        .expect("failed to run tgl");

    assert!(
        output.status.success(),
        "status should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("(ID: 77)"), "stdout was: {stdout}");
}

#[test]
fn malformed_cron_rejects_the_whole_config() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), &VALID.replace("0 17 * * 1-5", "0 17 * *"));

    let output = tgl(&temp, &["--config", config.to_str().unwrap(), "status"]);

    assert!(!output.status.success(), "four-field cron must be rejected");
}

#[test]
fn malformed_duration_rejects_the_whole_config() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), &VALID.replace("7h30m", "soon"));

    let output = tgl(&temp, &["--config", config.to_str().unwrap(), "status"]);

    assert!(!output.status.success(), "bad duration must be rejected");
}

#[test]
fn run_refuses_to_start_with_zero_schedules() {
    let temp = TempDir::new().unwrap();
    let config = write_config(
        temp.path(),
        "api_token = \"0123456789abcdef\"\nworkspace_id = 42\n",
    );

    let output = tgl(
        &temp,
        &["--config", config.to_str().unwrap(), "run", "--once"],
    );

    assert!(!output.status.success(), "zero schedules is a startup error");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("no schedules configured"),
        "stderr was: {stderr}"
    );
}

#[test]
fn help_prints_without_config() {
    let temp = TempDir::new().unwrap();
    let output = tgl(&temp, &["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("run"));
    assert!(stdout.contains("status"));
}
