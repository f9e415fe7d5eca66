use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

#[allow(deprecated)]
fn get_osprey_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("osprey")
}

#[test]
fn test_help_lists_the_flag_surface() {
    let mut cmd = Command::new(get_osprey_bin());
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("POST /api/audit"))
        .stdout(predicate::str::contains("--listen"))
        .stdout(predicate::str::contains("--chrome-path"))
        .stdout(predicate::str::contains("--lighthouse-path"))
        .stdout(predicate::str::contains("--scan-timeout"))
        .stdout(predicate::str::contains("--verbose"));
}

#[test]
fn test_rejects_malformed_listen_address() {
    let mut cmd = Command::new(get_osprey_bin());
    cmd.arg("--listen").arg("not-an-address");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_missing_lighthouse_is_a_startup_error() {
    let mut cmd = Command::new(get_osprey_bin());
    cmd.arg("--lighthouse-path").arg("/nonexistent/lighthouse");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Lighthouse not found"));
}
