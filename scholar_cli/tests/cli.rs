use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::{NamedTempFile, TempDir};

const SAMPLE_REPORT: &str = "\
**Textbook:** Calculus, 9th ed., by Stewart

**1. OpenStax Calculus** (Type: Open Textbook)
- **Link:** https://openstax.org/books/calculus
- **What it covers:** Single variable calculus with applications

**2. MIT OCW 18.01** (Type: Lecture Videos)
- **Link:** https://ocw.mit.edu/courses/18-01/
";

#[test]
fn test_version() {
    let mut cmd = Command::cargo_bin("scholar").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_parse_text_output() {
    let report = NamedTempFile::new().unwrap();
    fs::write(report.path(), SAMPLE_REPORT).unwrap();

    let mut cmd = Command::cargo_bin("scholar").unwrap();
    cmd.arg("parse")
        .arg(report.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("OpenStax Calculus"))
        .stdout(predicate::str::contains("https://openstax.org/books/calculus"))
        .stdout(predicate::str::contains("Stewart"));
}

#[test]
fn test_parse_json_output() {
    let report = NamedTempFile::new().unwrap();
    fs::write(report.path(), SAMPLE_REPORT).unwrap();

    let mut cmd = Command::cargo_bin("scholar").unwrap();
    let assert = cmd
        .arg("parse")
        .arg(report.path())
        .arg("--format")
        .arg("json")
        .assert()
        .success();

    let output = assert.get_output();
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(value["resources"].as_array().unwrap().len(), 2);
    assert_eq!(value["resources"][0]["type"], "Textbook");
    assert_eq!(value["textbook_info"]["title"], "Calculus");
}

#[test]
fn test_parse_with_excluded_sites() {
    let report = NamedTempFile::new().unwrap();
    fs::write(report.path(), SAMPLE_REPORT).unwrap();

    let mut cmd = Command::cargo_bin("scholar").unwrap();
    let assert = cmd
        .arg("parse")
        .arg(report.path())
        .arg("--excluded-sites")
        .arg("mit.edu")
        .arg("--format")
        .arg("json")
        .assert()
        .success();

    let value: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).unwrap();
    let resources = value["resources"].as_array().unwrap();

    assert_eq!(resources.len(), 1);
    assert!(
        resources[0]["url"]
            .as_str()
            .unwrap()
            .contains("openstax.org")
    );
}

#[test]
fn test_parse_missing_file_fails() {
    let mut cmd = Command::cargo_bin("scholar").unwrap();
    cmd.arg("parse")
        .arg("/nonexistent/report.md")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read report file"));
}

#[test]
fn test_config_path_prints_location() {
    let mut cmd = Command::cargo_bin("scholar").unwrap();
    cmd.arg("config")
        .arg("path")
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_cache_stats_against_fresh_database() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("scholar.db");

    let mut cmd = Command::cargo_bin("scholar").unwrap();
    cmd.env("SCHOLAR_CACHE__DB_PATH", &db_path)
        .arg("cache")
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total entries: 0"));
}

#[test]
fn test_cache_purge_reports_count() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("scholar.db");

    let mut cmd = Command::cargo_bin("scholar").unwrap();
    cmd.env("SCHOLAR_CACHE__DB_PATH", &db_path)
        .arg("cache")
        .arg("purge")
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 0 stale cache entries"));
}
