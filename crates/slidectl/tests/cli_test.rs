//! Integration tests for the `slidectl` binary.
//!
//! Argument parsing, help output, completions and error handling run without
//! any device. Device-facing tests point a config file at a wiremock server
//! speaking the local JSON-RPC API.
#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `slidectl` binary with env isolation.
///
/// Clears all `SLIDE_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn slidectl_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("slidectl");
    cmd.env("HOME", "/tmp/slidectl-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/slidectl-test-nonexistent")
        .env_remove("SLIDE_CONFIG")
        .env_remove("SLIDE_OUTPUT")
        .env_remove("SLIDE_CLOUD_PASSWORD")
        .env_remove("SLIDE_TIMEOUT")
        .env_remove("SLIDE_SCAN_INTERVAL")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Write a config with one local device at the mock server's address.
fn local_config(dir: &TempDir, server: &MockServer) -> PathBuf {
    let host = server.address().to_string();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        format!("timeout = 2\n\n[[local]]\nhost = \"{host}\"\n"),
    )
    .unwrap();
    path
}

async fn device_at(pos: f64) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rpc/Slide.GetInfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "slide_id": "slide_300000000000",
            "mac": "300000000000",
            "board_rev": 1,
            "device_name": "",
            "zone_name": "",
            "curtain_type": 0,
            "calib_time": 10239,
            "pos": pos,
            "touch_go": true
        })))
        .mount(&server)
        .await;
    server
}

fn with_config(path: &Path) -> assert_cmd::Command {
    let mut cmd = slidectl_cmd();
    cmd.arg("--config").arg(path);
    cmd
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = slidectl_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    slidectl_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Slide")
            .and(predicate::str::contains("covers"))
            .and(predicate::str::contains("watch"))
            .and(predicate::str::contains("config")),
    );
}

#[test]
fn test_version_flag() {
    slidectl_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("slidectl"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    slidectl_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    slidectl_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = slidectl_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_covers_list_without_config() {
    slidectl_cmd()
        .args(["covers", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("config init"));
}

#[test]
fn test_invalid_output_format() {
    let output = slidectl_cmd()
        .args(["--output", "invalid", "covers", "list"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("possible values"),
        "Expected error about valid output formats:\n{text}"
    );
}

#[test]
fn test_position_out_of_range_is_a_usage_error() {
    slidectl_cmd()
        .args(["covers", "set-position", "kitchen", "101"])
        .assert()
        .code(2);
}

#[test]
fn test_invalid_config_names_field() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "offset = 0.7\n\n[[local]]\nhost = \"10.0.0.2\"\n").unwrap();

    with_config(&path)
        .args(["covers", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("offset"));
}

// ── Config commands ─────────────────────────────────────────────────

#[test]
fn test_config_show_no_config() {
    slidectl_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn test_config_path_follows_flag() {
    slidectl_cmd()
        .args(["config", "path", "--config", "/tmp/somewhere/slide.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/tmp/somewhere/slide.toml"));
}

#[test]
fn test_config_show_redacts_passwords() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[cloud]\nusername = \"me@example.com\"\npassword = \"hunter2\"\n",
    )
    .unwrap();

    with_config(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("me@example.com")
                .and(predicate::str::contains("hunter2").not()),
        );
}

// ── Subcommand help discovery ───────────────────────────────────────

#[test]
fn test_covers_subcommands_exist() {
    slidectl_cmd()
        .args(["covers", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("set-position"))
                .and(predicate::str::contains("calibrate"))
                .and(predicate::str::contains("strength"))
                .and(predicate::str::contains("touch-go")),
        );
}

#[test]
fn test_config_subcommands_exist() {
    slidectl_cmd()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("init")
                .and(predicate::str::contains("show"))
                .and(predicate::str::contains("path"))
                .and(predicate::str::contains("set-password")),
        );
}

// ── Against a mocked local device ───────────────────────────────────

#[tokio::test]
async fn test_list_local_device_plain() {
    let server = device_at(0.25).await;
    let dir = TempDir::new().unwrap();
    let path = local_config(&dir, &server);

    with_config(&path)
        .args(["--output", "plain", "covers", "list"])
        .assert()
        .success()
        .stdout(predicate::str::diff("slide_300000000000\n"));
}

#[tokio::test]
async fn test_get_by_host_as_json() {
    let server = device_at(0.25).await;
    let dir = TempDir::new().unwrap();
    let path = local_config(&dir, &server);
    let host = server.address().to_string();

    let output = with_config(&path)
        .args(["--output", "json", "covers", "get", &host])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let cover: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(cover["id"], "slide_300000000000");
    assert_eq!(cover["status"], "open");
    assert_eq!(cover["online"], true);
    assert_eq!(cover["touch_go"], true);
}

#[tokio::test]
async fn test_set_position_posts_device_fraction() {
    let server = device_at(0.0).await;
    Mock::given(method("POST"))
        .and(path("/rpc/Slide.SetPos"))
        .and(body_json(json!({ "pos": 0.75 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let path = local_config(&dir, &server);

    with_config(&path)
        .args(["covers", "set-position", "slide_300000000000", "25"])
        .assert()
        .success()
        .stderr(predicate::str::contains("set-position sent"));
}

#[tokio::test]
async fn test_strength_sends_motor_currents() {
    let server = device_at(0.0).await;
    Mock::given(method("POST"))
        .and(path("/rpc/Slide.Config.Motor"))
        .and(body_json(json!({ "maxcurrent": 1250, "calib_current": 1200 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let path = local_config(&dir, &server);

    with_config(&path)
        .args(["-q", "covers", "strength", "slide_300000000000", "medium"])
        .assert()
        .success();
}

#[tokio::test]
async fn test_calibrate_requires_yes_without_terminal() {
    let server = device_at(0.0).await;
    Mock::given(method("POST"))
        .and(path("/rpc/Slide.Calibrate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let path = local_config(&dir, &server);

    with_config(&path)
        .args(["covers", "calibrate", "slide_300000000000"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--yes"));
}

#[tokio::test]
async fn test_unknown_cover_exit_code() {
    let server = device_at(0.0).await;
    let dir = TempDir::new().unwrap();
    let path = local_config(&dir, &server);

    with_config(&path)
        .args(["covers", "open", "kitchen"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("covers list"));
}

#[tokio::test]
async fn test_unanswered_setup_reports_connection_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rpc/Slide.GetInfo"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let path = local_config(&dir, &server);
    let host = server.address().to_string();

    with_config(&path)
        .args(["covers", "get", &host])
        .assert()
        .code(7);
}
