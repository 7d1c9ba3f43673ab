//! End-to-end tests for CLI exit codes.
//!
//! - Exit code 0: every selected project built or skipped
//! - Exit code 1: usage error, unreadable manifest, or a failed project

mod common;
use common::prelude::*;

/// Exit code 0 is returned for --help.
#[test]
fn test_exit_code_help() {
    let mut cmd = cargo_bin_cmd!("deployctl");

    cmd.arg("--help")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("BUILD_MODE"));
}

/// Exit code 0 is returned for --version.
#[test]
fn test_exit_code_version() {
    let mut cmd = cargo_bin_cmd!("deployctl");

    cmd.arg("--version").assert().code(0);
}

/// Exit code 1 is returned when positional arguments are missing.
#[test]
fn test_exit_code_missing_arguments() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .args(["dev", "CICD"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("REPO"));
}

/// Exit code 1 is returned when the manifest does not exist.
#[test]
fn test_exit_code_manifest_not_found() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .args(["dev", "CICD", "vml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration file not found"));
}

/// Exit code 1 is returned when the manifest is not valid JSON.
#[test]
fn test_exit_code_malformed_manifest() {
    let fixture = TestFixture::new().with_manifest(manifests::MALFORMED);

    fixture.command().args(["dev", "CICD", "vml"]).assert().code(1);
}

/// Exit code 1 is returned for an unknown build strategy.
#[test]
fn test_exit_code_invalid_strategy() {
    let fixture = TestFixture::new().with_manifest(manifests::SINGLE);

    fixture
        .command()
        .args(["--strategy", "magic", "dev", "CI", "vml"])
        .assert()
        .code(1);
}

/// Exit code 0 is returned when the filter matches nothing.
#[test]
fn test_exit_code_no_matching_projects() {
    let fixture = TestFixture::new().with_manifest(manifests::SINGLE);

    fixture
        .command()
        .args(["dev", "CICD", "vml", "svc-zzz"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("No projects were built"));
}

/// Exit code 1 is returned when a project directory cannot be found.
#[test]
fn test_exit_code_missing_project_directory() {
    let fixture = TestFixture::new().with_manifest(manifests::SINGLE);

    fixture
        .command()
        .args(["dev", "CICD", "vml"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[FAIL] svc-a"));
}
