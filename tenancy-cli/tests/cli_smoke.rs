//! Smoke tests for the tenancy binary

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_serve() {
    let mut cmd = Command::cargo_bin("tenancy").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("--debug"));
}

#[test]
fn test_serve_help() {
    let mut cmd = Command::cargo_bin("tenancy").unwrap();
    cmd.arg("serve").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--database-url"))
        .stdout(predicate::str::contains("--host-database"))
        .stdout(predicate::str::contains("127.0.0.1:3030"));
}

#[test]
fn test_serve_without_database_url_fails() {
    let dir = std::env::temp_dir();
    let mut cmd = Command::cargo_bin("tenancy").unwrap();
    // no .env in the temp dir, and nothing inherited
    cmd.current_dir(dir)
        .env_remove("DATABASE_URL")
        .arg("serve");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("DATABASE_URL not set"));
}

#[test]
fn test_serve_rejects_bad_bind_address() {
    let mut cmd = Command::cargo_bin("tenancy").unwrap();
    cmd.args(["serve", "--bind", "not-an-address", "--database-url", "postgres://x"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_unknown_subcommand_fails() {
    let mut cmd = Command::cargo_bin("tenancy").unwrap();
    cmd.arg("migrate");

    cmd.assert().failure();
}
