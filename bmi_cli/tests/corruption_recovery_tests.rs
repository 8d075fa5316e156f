//! Corruption recovery tests for the bmi binary.
//!
//! These tests verify the system can handle:
//! - Corrupted entry files
//! - Missing or unusable data directories
//! - Corrupted legacy data

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cli(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("bmi"));
    cmd.env("XDG_CONFIG_HOME", dir.path().join("config"))
        .env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(dir.path().join("data"));
    cmd
}

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

fn write_data_file(dir: &TempDir, name: &str, contents: &str) {
    let data_dir = dir.path().join("data");
    fs::create_dir_all(&data_dir).unwrap();
    fs::write(data_dir.join(name), contents).expect("Failed to write data file");
}

#[test]
fn test_corrupted_entries_show_empty_history() {
    let temp_dir = setup_test_dir();
    write_data_file(&temp_dir, "bmiDataArray.json", "[{ invalid json }}}}");

    cli(&temp_dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No entries yet"));

    cli(&temp_dir)
        .arg("chart")
        .assert()
        .success()
        .stdout(predicate::str::contains("No entries yet"));
}

#[test]
fn test_record_over_corrupted_entries_starts_fresh() {
    let temp_dir = setup_test_dir();
    write_data_file(&temp_dir, "bmiDataArray.json", "corrupted");

    cli(&temp_dir)
        .args(["record", "--weight", "70", "--height", "175"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Entry saved"));

    let content = fs::read_to_string(temp_dir.path().join("data/bmiDataArray.json")).unwrap();
    let parsed: Vec<serde_json::Value> =
        serde_json::from_str(&content).expect("Entries should be valid JSON");
    assert_eq!(parsed.len(), 1);
}

#[test]
fn test_partial_write_is_treated_as_no_data() {
    let temp_dir = setup_test_dir();
    // Simulate a crash halfway through an older, non-atomic writer
    write_data_file(
        &temp_dir,
        "bmiDataArray.json",
        r#"[{"weight":70.0,"height":175.0,"bmi":22.9,"date":"2026-01-0"#,
    );

    cli(&temp_dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No entries yet"));
}

#[test]
fn test_empty_entries_file() {
    let temp_dir = setup_test_dir();
    write_data_file(&temp_dir, "bmiDataArray.json", "");

    cli(&temp_dir).arg("history").assert().success();
}

#[test]
fn test_corrupted_legacy_data_is_ignored() {
    let temp_dir = setup_test_dir();
    write_data_file(&temp_dir, "bmiData.json", "{ not valid json at all }");

    cli(&temp_dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No entries yet"));

    // Nothing was migrated, so no canonical file exists yet
    assert!(!temp_dir.path().join("data/bmiDataArray.json").exists());
}

#[test]
fn test_unwritable_data_dir_reports_storage_error() {
    let temp_dir = setup_test_dir();
    // A regular file where the data directory should be
    fs::write(temp_dir.path().join("data"), "not a directory").unwrap();

    cli(&temp_dir)
        .args(["record", "--weight", "70", "--height", "175"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not access your saved data"));

    // Reading degrades to an empty history instead of failing
    cli(&temp_dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No entries yet"));
}

#[test]
fn test_permission_denied_entries() {
    // Skip on Windows (permission model is different)
    if cfg!(windows) {
        return;
    }

    let temp_dir = setup_test_dir();
    write_data_file(&temp_dir, "bmiDataArray.json", "[]");
    let entries_path = temp_dir.path().join("data/bmiDataArray.json");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(&entries_path).unwrap().permissions();
        perms.set_mode(0o000); // No permissions
        fs::set_permissions(&entries_path, perms).unwrap();

        // History must not fail whether or not the read is refused
        cli(&temp_dir)
            .arg("history")
            .assert()
            .success()
            .stdout(predicate::str::contains("No entries yet"));

        // Clean up permissions for temp dir cleanup
        let mut perms = fs::metadata(&entries_path).unwrap().permissions();
        perms.set_mode(0o644);
        fs::set_permissions(&entries_path, perms).unwrap();
    }
}

#[test]
fn test_unreadable_entries_still_allow_reading_commands() {
    let temp_dir = setup_test_dir();
    // A directory where the entries file should be; reading it fails even as root
    fs::create_dir_all(temp_dir.path().join("data/bmiDataArray.json")).unwrap();

    cli(&temp_dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No entries yet"));

    cli(&temp_dir)
        .arg("chart")
        .assert()
        .success()
        .stdout(predicate::str::contains("No entries yet"));

    cli(&temp_dir)
        .args(["calc", "--weight", "70", "--height", "175"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Your BMI is: 22.9"));

    cli(&temp_dir)
        .args(["record", "--weight", "70", "--height", "175"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not access your saved data"));
}

#[test]
fn test_calc_ignores_broken_config() {
    let temp_dir = setup_test_dir();
    let config_path = temp_dir.path().join("broken.toml");
    fs::write(&config_path, "[chart\nwindow_size = ").unwrap();

    cli(&temp_dir)
        .arg("--config")
        .arg(&config_path)
        .args(["calc", "--weight", "70", "--height", "175"])
        .assert()
        .success()
        .stdout(predicate::str::contains("at a healthy weight"));
}

#[test]
fn test_record_keeps_readable_rows_and_backs_up_the_rest() {
    let temp_dir = setup_test_dir();
    write_data_file(
        &temp_dir,
        "bmiDataArray.json",
        r#"[{"weight":70.0,"height":175.0,"bmi":22.9,"date":"2025-01-05T07:00:00Z"},
            {"weight":71.0,"height":175.0,"bmi":"23.2","date":"2025-01-06T07:00:00Z"},
            {"weight":72.0,"height":175.0,"bmi":23.5}]"#,
    );

    cli(&temp_dir)
        .args(["record", "--weight", "73", "--height", "175"])
        .assert()
        .success();

    let content = fs::read_to_string(temp_dir.path().join("data/bmiDataArray.json")).unwrap();
    let parsed: Vec<serde_json::Value> = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed.len(), 3);
    assert_eq!(parsed[1]["bmi"], 23.2);

    let backup =
        fs::read_to_string(temp_dir.path().join("data/bmiDataArray-corrupt.json")).unwrap();
    assert!(backup.contains(r#""bmi":23.5}"#));
}
