//! CLI integration tests for argument handling and fatal config errors.
//!
//! Uses `assert_cmd` to spawn the `interpel` binary and verify exit codes,
//! stdout content, and stderr content. Nothing here touches the network.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper: an `interpel` command with no inherited configuration.
fn interpel() -> Command {
    let mut cmd = cargo_bin_cmd!("interpel");
    cmd.env_remove("INTERPEL_CONFIG")
        .env_remove("INTERPEL_DATA_DIR")
        .env_remove("MATTERMOST_WEBHOOK_URL");
    cmd
}

// ──────────────────────────────────────────────
// 1. Help and version
// ──────────────────────────────────────────────

#[test]
fn help_exits_0_with_description() {
    interpel()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sejm interpellations"))
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--data-dir"));
}

#[test]
fn version_exits_0() {
    interpel()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("interpel"));
}

#[test]
fn unknown_flag_is_rejected() {
    interpel().arg("--frobnicate").assert().failure();
}

// ──────────────────────────────────────────────
// 2. Fatal config errors
// ──────────────────────────────────────────────

#[test]
fn missing_config_exits_1() {
    let tmp = TempDir::new().expect("tempdir");
    let missing = tmp.path().join("nope.json");

    interpel()
        .arg("--config")
        .arg(&missing)
        .arg("--data-dir")
        .arg(tmp.path().join("data"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("could not read config"))
        .stderr(predicate::str::contains("nope.json"));
}

#[test]
fn config_path_from_env() {
    let tmp = TempDir::new().expect("tempdir");
    let missing = tmp.path().join("from-env.json");

    interpel()
        .env("INTERPEL_CONFIG", &missing)
        .arg("--data-dir")
        .arg(tmp.path().join("data"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("from-env.json"));
}

#[test]
fn malformed_config_exits_1() {
    let tmp = TempDir::new().expect("tempdir");
    let config = tmp.path().join("config.json");
    fs::write(&config, "{ not json").expect("write config");

    interpel()
        .arg("--config")
        .arg(&config)
        .arg("--data-dir")
        .arg(tmp.path().join("data"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("could not parse config"));
}

#[test]
fn config_without_representatives_exits_1() {
    let tmp = TempDir::new().expect("tempdir");
    let config = tmp.path().join("config.json");
    fs::write(&config, r#"{"sejm_term": "10", "mps": [{"id": ""}]}"#).expect("write config");

    interpel()
        .arg("--config")
        .arg(&config)
        .arg("--data-dir")
        .arg(tmp.path().join("data"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no representatives"));
}

// ──────────────────────────────────────────────
// 3. Per-person failures are not fatal
// ──────────────────────────────────────────────

#[test]
fn unreachable_api_still_exits_0_and_writes_nothing() {
    let tmp = TempDir::new().expect("tempdir");
    let config = tmp.path().join("config.json");
    let data = tmp.path().join("data");
    fs::write(
        &config,
        r#"{"api_base_url": "http://127.0.0.1:9/sejm", "mps": [{"id": "1", "mattermost_users": "@a"}]}"#,
    )
    .expect("write config");

    interpel()
        .arg("--config")
        .arg(&config)
        .arg("--data-dir")
        .arg(&data)
        .assert()
        .success()
        .stderr(predicate::str::contains("skipping representative"));

    assert!(!data.join("interpel_1.json").exists());
}
