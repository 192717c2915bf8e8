//! Integration tests for the `parkly` CLI binary.
//!
//! Argument parsing, help output, shell completions and error handling run
//! without a service; the session flows run against a wiremock server.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `parkly` binary with env isolation.
///
/// Clears all `PARKLY_*` env vars and points config and data directories
/// at `home` so tests never touch the user's real configuration.
fn parkly_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("parkly");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env("NO_COLOR", "1")
        .env_remove("PARKLY_PROFILE")
        .env_remove("PARKLY_URL")
        .env_remove("PARKLY_OUTPUT")
        .env_remove("PARKLY_INSECURE")
        .env_remove("PARKLY_TIMEOUT")
        .env_remove("PARKLY_EMAIL")
        .env_remove("PARKLY_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run(home: &Path, args: Vec<String>) -> std::process::Output {
    let home = home.to_path_buf();
    tokio::task::spawn_blocking(move || {
        parkly_cmd(&home)
            .env("PARKLY_PASSWORD", "hunter2")
            .args(args)
            .output()
            .unwrap()
    })
    .await
    .unwrap()
}

fn args(server: &MockServer, rest: &[&str]) -> Vec<String> {
    let mut v = vec!["--url".to_owned(), server.uri()];
    v.extend(rest.iter().map(|s| (*s).to_owned()));
    v
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .and(body_json(json!({
            "email": "driver@example.com",
            "password": "hunter2"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "sid=abc123; Path=/")
                .set_body_json(json!({
                    "user": { "id": 7, "email": "driver@example.com" },
                    "expiresAt": "2999-01-01T00:00:00Z"
                })),
        )
        .mount(server)
        .await;
}

async fn login(server: &MockServer, home: &Path) {
    mount_login(server).await;
    let out = run(home, args(server, &["login", "--email", "driver@example.com"])).await;
    assert!(out.status.success(), "login failed:\n{}", combined_output(&out));
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = parkly_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = tempfile::tempdir().unwrap();
    parkly_cmd(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("parking")
                .and(predicate::str::contains("login"))
                .and(predicate::str::contains("cars")),
        );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    parkly_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("parkly"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let home = tempfile::tempdir().unwrap();
    parkly_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    let home = tempfile::tempdir().unwrap();
    parkly_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let home = tempfile::tempdir().unwrap();
    let output = parkly_cmd(home.path()).arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_cars_list_without_config() {
    let home = tempfile::tempdir().unwrap();
    parkly_cmd(home.path())
        .args(["cars", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No service configured"));
}

#[test]
fn test_config_show_no_config() {
    let home = tempfile::tempdir().unwrap();
    parkly_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success();
}

#[test]
fn test_config_set_then_profiles() {
    let home = tempfile::tempdir().unwrap();
    parkly_cmd(home.path())
        .args(["config", "set", "base_url", "http://localhost:5000"])
        .assert()
        .success();
    parkly_cmd(home.path())
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default *"));
}

#[test]
fn test_invalid_output_format() {
    let home = tempfile::tempdir().unwrap();
    let output = parkly_cmd(home.path())
        .args(["--output", "invalid", "cars", "list"])
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
fn test_invalid_car_id_is_usage_error() {
    // Rejected before any request: the URL is never contacted.
    let home = tempfile::tempdir().unwrap();
    parkly_cmd(home.path())
        .args(["--url", "http://127.0.0.1:9", "parking", "start", "abc", "12"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid car identifier"));
}

#[test]
fn test_whoami_without_session() {
    let home = tempfile::tempdir().unwrap();
    parkly_cmd(home.path())
        .args(["--url", "http://127.0.0.1:9", "whoami"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Not signed in"));
}

#[test]
fn test_parking_subcommands_exist() {
    let home = tempfile::tempdir().unwrap();
    parkly_cmd(home.path())
        .args(["parking", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("start").and(predicate::str::contains("stop")));
}

// ── Session flows ───────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_login_then_whoami_uses_stored_session() {
    let server = MockServer::start().await;
    let home = tempfile::tempdir().unwrap();
    login(&server, home.path()).await;

    let out = run(home.path(), args(&server, &["-o", "json", "whoami"])).await;
    assert!(out.status.success(), "{}", combined_output(&out));
    let body: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(body["user"]["id"], 7);
    assert_eq!(body["user"]["email"], "driver@example.com");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cars_list_plain_prints_ids() {
    let server = MockServer::start().await;
    let home = tempfile::tempdir().unwrap();
    login(&server, home.path()).await;

    Mock::given(method("GET"))
        .and(path("/api/cars"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 3, "brand": "Toyota", "model": "Yaris", "year": 2020,
              "licensePlate": "AAA-111", "isParked": false },
            { "id": 5, "brand": "BMW", "model": "i3", "year": 2018,
              "licensePlate": "BBB-222", "isParked": true }
        ])))
        .mount(&server)
        .await;

    let out = run(home.path(), args(&server, &["-o", "plain", "cars", "list"])).await;
    assert!(out.status.success(), "{}", combined_output(&out));
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "3\n5");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unauthorized_ends_session_with_notice() {
    let server = MockServer::start().await;
    let home = tempfile::tempdir().unwrap();
    login(&server, home.path()).await;

    Mock::given(method("GET"))
        .and(path("/api/cars"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let out = run(home.path(), args(&server, &["cars", "list"])).await;
    assert_eq!(out.status.code(), Some(3), "{}", combined_output(&out));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Session ended (unauthorized)"), "{stderr}");

    // The stored session is gone for the next invocation.
    let out = run(home.path(), args(&server, &["whoami"])).await;
    assert_eq!(out.status.code(), Some(3));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_logout_removes_session() {
    let server = MockServer::start().await;
    let home = tempfile::tempdir().unwrap();
    login(&server, home.path()).await;

    Mock::given(method("POST"))
        .and(path("/api/users/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let out = run(home.path(), args(&server, &["logout"])).await;
    assert!(out.status.success(), "{}", combined_output(&out));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Signed out"));

    let out = run(home.path(), args(&server, &["whoami"])).await;
    assert_eq!(out.status.code(), Some(3));
}
