//! CLI integration tests

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_subcommands() {
    Command::cargo_bin("skugraph")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("categorize"))
        .stdout(predicate::str::contains("seed"))
        .stdout(predicate::str::contains("stats"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_categorize_requires_description() {
    Command::cargo_bin("skugraph")
        .unwrap()
        .arg("categorize")
        .assert()
        .failure()
        .stderr(predicate::str::contains("DESCRIPTION"));
}

#[test]
fn test_unknown_subcommand_fails() {
    Command::cargo_bin("skugraph")
        .unwrap()
        .arg("frobnicate")
        .assert()
        .failure();
}

#[test]
fn test_version_flag() {
    Command::cargo_bin("skugraph")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("skugraph"));
}
