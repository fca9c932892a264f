//! Integration tests for the gisph binary

mod common;

use assert_cmd::Command;
use common::{closed_port_url, MockServer};
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;

/// The binary with an isolated config file and no ambient API settings.
fn gisph(config: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("gisph").unwrap();
    cmd.env("GISPH_CONFIG", config.path().join("config.json"))
        .env_remove("API_URL")
        .env_remove("API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_commands() {
    let dir = TempDir::new().unwrap();
    gisph(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("regions"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("update"));
}

#[test]
fn version_flag() {
    let dir = TempDir::new().unwrap();
    gisph(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_command_fails() {
    let dir = TempDir::new().unwrap();
    gisph(&dir)
        .arg("provinces")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn usage_errors_keep_clap_exit_code() {
    let dir = TempDir::new().unwrap();
    gisph(&dir).arg("provinces").assert().code(2);
    gisph(&dir)
        .env("API_URL", closed_port_url())
        .args(["regions", "list", "--format", "xml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("xml"));
}

#[test]
fn regions_list_json_prints_response() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::json("200 OK", r#"{"data":[{"id":1,"name":"A"}]}"#);

    let output = gisph(&dir)
        .env("API_URL", &server.base_url)
        .args(["regions", "list", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let printed: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(printed["data"][0], json!({"id": 1, "name": "A"}));
    assert_eq!(server.next_request().path, "/v1/regions");
}

#[test]
fn regions_list_table_uses_configured_url_and_key() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::json(
        "200 OK",
        r#"{"data":[{"id":1,"name":"NCR","title":"National Capital Region","code":"130000000"}]}"#,
    );

    gisph(&dir)
        .args(["config", "set", "apiUrl", &server.base_url])
        .assert()
        .success();
    gisph(&dir)
        .args(["config", "set", "apiKey", "sk-test-4321"])
        .assert()
        .success();

    gisph(&dir)
        .env("API_URL", closed_port_url())
        .args(["regions", "list", "--limit", "1", "--filter", "code:130000000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("National Capital Region"))
        .stdout(predicate::str::contains("Total: 1 region(s)"));

    let req = server.next_request();
    assert_eq!(req.path, "/v1/regions?limit=1&code=130000000");
    assert_eq!(req.header("authorization"), Some("Bearer sk-test-4321"));
}

#[test]
fn api_error_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::json("404 Not Found", r#"{"message":"Region not found"}"#);

    gisph(&dir)
        .env("API_URL", &server.base_url)
        .args(["regions", "get", "999"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("API Error (404): Region not found"));
}

#[test]
fn unreachable_api_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let base = closed_port_url();

    gisph(&dir)
        .env("API_URL", &base)
        .args(["regions", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Network Error: Unable to reach API at"))
        .stderr(predicate::str::contains(base.as_str()));
}

#[test]
fn bad_filter_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    gisph(&dir)
        .env("API_URL", closed_port_url())
        .args(["regions", "list", "--filter", "active"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid filter"));
}

#[test]
fn config_round_trip() {
    let dir = TempDir::new().unwrap();

    gisph(&dir)
        .args(["config", "set", "apiKey", "abcdef123456"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration updated"))
        .stdout(predicate::str::contains("***3456"))
        .stdout(predicate::str::contains("abcdef").not());

    gisph(&dir)
        .args(["config", "get", "apiKey"])
        .assert()
        .success()
        .stdout(predicate::str::contains("***3456"));

    let stored: Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("config.json")).unwrap()).unwrap();
    assert_eq!(stored["apiKey"], "abcdef123456");

    gisph(&dir)
        .args(["config", "delete", "apiKey"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration deleted: apiKey"));

    gisph(&dir)
        .args(["config", "get", "apiKey"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not found"));
}

#[test]
fn config_list_hides_internal_keys() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.json"),
        r#"{"apiUrl":"https://api.gis.ph","lastUpdateCheck":1700000000000,"autoUpdateCheckDisabled":true}"#,
    )
    .unwrap();

    gisph(&dir)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://api.gis.ph"))
        .stdout(predicate::str::contains("lastUpdateCheck").not())
        .stdout(predicate::str::contains("disabled"));
}

#[test]
fn empty_config_list() {
    let dir = TempDir::new().unwrap();
    gisph(&dir)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No configuration set"));
}

#[test]
fn auto_update_toggle_and_invalid_action() {
    let dir = TempDir::new().unwrap();

    gisph(&dir)
        .args(["config", "auto-update", "disable"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Automatic update checks disabled"));
    let stored: Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("config.json")).unwrap()).unwrap();
    assert_eq!(stored["autoUpdateCheckDisabled"], true);

    gisph(&dir)
        .args(["config", "auto-update", "later"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid action: later"));
}

#[test]
fn config_file_flag_overrides_env() {
    let dir = TempDir::new().unwrap();
    let other = dir.path().join("other.json");

    gisph(&dir)
        .args(["config", "set", "region", "NCR", "--config-file"])
        .arg(&other)
        .assert()
        .success();

    assert!(other.exists());
    assert!(!dir.path().join("config.json").exists());
}
