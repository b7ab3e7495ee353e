//! Integration tests for the physique binary.
//!
//! These tests verify end-to-end behavior including:
//! - Onboarding workflow (create and update paths)
//! - Boundary range validation
//! - History queries and CSV export
//! - Data persistence across invocations

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("physique"))
}

/// Onboard a user with a full set of measurements
fn onboard_full(data_dir: &Path, user: &str) {
    cli()
        .arg("onboard")
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--user")
        .arg(user)
        .arg("--dob")
        .arg("1990-06-15")
        .arg("--sex")
        .arg("female")
        .arg("--max-hr")
        .arg("190")
        .arg("--resting-hr")
        .arg("60")
        .arg("--height-cm")
        .arg("180")
        .arg("--weight-kg")
        .arg("75")
        .arg("--fitness")
        .arg("intermediate")
        .assert()
        .success();
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Fitness profile and heart rate zone tracker",
        ));
}

#[test]
fn test_onboard_creates_profile_and_snapshots() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli()
        .arg("onboard")
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--user")
        .arg("ada")
        .arg("--dob")
        .arg("1990-06-15")
        .arg("--sex")
        .arg("female")
        .arg("--max-hr")
        .arg("190")
        .arg("--resting-hr")
        .arg("60")
        .arg("--height-cm")
        .arg("180")
        .arg("--weight-kg")
        .arg("75")
        .assert()
        .success()
        .stdout(predicate::str::contains("User onboarded successfully"))
        .stdout(predicate::str::contains("Zone 5 - VO2Max"))
        .stdout(predicate::str::contains("Estimated BMI: 23.1"));

    // Profile store and all three metric files exist
    assert!(data_dir.join("profiles.json").exists());
    assert!(data_dir.join("metrics/zones.jsonl").exists());
    assert!(data_dir.join("metrics/heights.jsonl").exists());
    assert!(data_dir.join("metrics/weights.jsonl").exists());

    let profiles = fs::read_to_string(data_dir.join("profiles.json")).unwrap();
    assert!(profiles.contains("\"ada\""));
    assert!(profiles.contains("1800"));
}

#[test]
fn test_onboard_update_appends_only_zones() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    onboard_full(data_dir, "ada");

    // Second call supplies only heart rates
    cli()
        .arg("onboard")
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--user")
        .arg("ada")
        .arg("--dob")
        .arg("1990-06-15")
        .arg("--sex")
        .arg("female")
        .arg("--max-hr")
        .arg("190")
        .arg("--resting-hr")
        .arg("55")
        .assert()
        .success()
        .stdout(predicate::str::contains("Estimated BMI").not());

    let zone_lines = fs::read_to_string(data_dir.join("metrics/zones.jsonl"))
        .unwrap()
        .lines()
        .count();
    let weight_lines = fs::read_to_string(data_dir.join("metrics/weights.jsonl"))
        .unwrap()
        .lines()
        .count();
    assert_eq!(zone_lines, 2);
    assert_eq!(weight_lines, 1);
}

#[test]
fn test_boundary_rejects_out_of_range_resting_hr() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("onboard")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--user")
        .arg("ada")
        .arg("--dob")
        .arg("1990-06-15")
        .arg("--resting-hr")
        .arg("20")
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 30-120"));

    // Rejected before the core ran: nothing was persisted
    assert!(!temp_dir.path().join("profiles.json").exists());
}

#[test]
fn test_boundary_rejects_out_of_range_height() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("onboard")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--user")
        .arg("ada")
        .arg("--dob")
        .arg("1990-06-15")
        .arg("--height-cm")
        .arg("90")
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 100-250"));
}

#[test]
fn test_zones_command_is_pure_display() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("zones")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--max-hr")
        .arg("200")
        .assert()
        .success()
        .stdout(predicate::str::contains("Zone 1 - Recovery"))
        .stdout(predicate::str::contains("100-120"))
        .stdout(predicate::str::contains("181-200"));

    // Nothing persisted
    assert!(!temp_dir.path().join("metrics").exists());
}

#[test]
fn test_history_shows_weight() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    onboard_full(data_dir, "ada");

    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--user")
        .arg("ada")
        .arg("--metric")
        .arg("weight")
        .assert()
        .success()
        .stdout(predicate::str::contains("75.0 kg"));
}

#[test]
fn test_history_unknown_metric_fails() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--user")
        .arg("ada")
        .arg("--metric")
        .arg("steps")
        .assert()
        .failure();
}

#[test]
fn test_latest_summarizes_measurements() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    onboard_full(data_dir, "ada");

    cli()
        .arg("latest")
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--user")
        .arg("ada")
        .assert()
        .success()
        .stdout(predicate::str::contains("Height: 180.0 cm"))
        .stdout(predicate::str::contains("Weight: 75.0 kg"))
        .stdout(predicate::str::contains("Zone 3 - Tempo"));
}

#[test]
fn test_export_writes_csv() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    let out_path = temp_dir.path().join("history.csv");

    onboard_full(data_dir, "ada");

    cli()
        .arg("export")
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--user")
        .arg("ada")
        .arg("--output")
        .arg(&out_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 rows"));

    let contents = fs::read_to_string(&out_path).unwrap();
    assert!(contents.starts_with("recorded_at,metric,value"));
    assert!(contents.contains("height_mm"));
    assert!(contents.contains("75000"));
}

#[test]
fn test_failed_onboarding_exits_nonzero() {
    let temp_dir = setup_test_dir();

    // Passes boundary validation (both in range) but violates the domain
    // invariant resting < max
    cli()
        .arg("onboard")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--user")
        .arg("ada")
        .arg("--dob")
        .arg("1990-06-15")
        .arg("--max-hr")
        .arg("120")
        .arg("--resting-hr")
        .arg("120")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to onboard user"));
}

#[test]
fn test_profile_persists_across_invocations() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    onboard_full(data_dir, "ada");
    onboard_full(data_dir, "grace");

    let profiles: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(data_dir.join("profiles.json")).unwrap())
            .unwrap();
    assert!(profiles.get("ada").is_some());
    assert!(profiles.get("grace").is_some());
}
