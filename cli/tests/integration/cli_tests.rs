//! Binary-level tests: help, version, and configuration failures.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn ssm_shell() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ssm-shell"));
    cmd.env("NO_COLOR", "1")
        .env_remove("CLUSTER")
        .env_remove("SERVICE")
        .env_remove("IAM_ROLE");
    cmd
}

#[test]
fn test_cli_help_flag_shows_help() {
    ssm_shell()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("IAM_ROLE"));
}

#[test]
fn test_cli_version_flag_shows_version() {
    ssm_shell()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ssm-shell 0.1.0"));
}

#[test]
fn test_cli_rejects_unknown_arguments() {
    ssm_shell().arg("--cluster").assert().code(2);
}

#[test]
fn test_missing_config_names_every_variable_and_exits_2() {
    ssm_shell()
        .write_stdin("exit\n")
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "Missing required environment variables: CLUSTER, SERVICE, IAM_ROLE",
        ));
}

#[test]
fn test_missing_single_variable_is_named() {
    ssm_shell()
        .env("CLUSTER", "prod")
        .env("SERVICE", "api")
        .write_stdin("exit\n")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("IAM_ROLE"))
        .stderr(predicate::str::contains("CLUSTER").not());
}
