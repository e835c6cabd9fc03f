use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const FIXTURE: &str = r#"{
  "accounts": [
    { "id": "111", "name": "prod" },
    { "id": "222", "name": "shared" }
  ],
  "records": [
    { "date": "2025-05-10", "account_id": "111", "service": "EC2", "usage_type": "BoxUsage", "amount": 100.0 },
    { "date": "2025-06-10", "account_id": "111", "service": "EC2", "usage_type": "BoxUsage", "amount": 150.0 },
    { "date": "2025-05-10", "account_id": "222", "service": "S3", "usage_type": "Requests", "amount": 1000.0 },
    { "date": "2025-06-10", "account_id": "222", "service": "S3", "usage_type": "Requests", "amount": 1010.0 }
  ]
}"#;

fn cost_report(config_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("cost-report").unwrap();
    cmd.env("COST_REPORT_CONFIG_DIR", config_dir)
        .env_remove("RUST_LOG");
    cmd
}

fn write_fixture(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("fixture.json");
    fs::write(&path, FIXTURE).unwrap();
    path
}

#[test]
fn test_help() {
    let temp_dir = TempDir::new().unwrap();
    cost_report(temp_dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("window"));
}

#[test]
fn test_window_mid_year() {
    let temp_dir = TempDir::new().unwrap();
    cost_report(temp_dir.path())
        .args(["window", "--month", "6", "--year", "2025"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-05-01"))
        .stdout(predicate::str::contains("2025-07-01"));
}

#[test]
fn test_window_uses_settings_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("config.json"),
        r#"{ "month": 1, "year": 2025 }"#,
    )
    .unwrap();

    cost_report(temp_dir.path())
        .arg("window")
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-12-01"))
        .stdout(predicate::str::contains("2025-02-01"));
}

#[test]
fn test_config_shows_paths() {
    let temp_dir = TempDir::new().unwrap();
    cost_report(temp_dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("config.json"))
        .stdout(predicate::str::contains("AmortizedCost"))
        .stdout(predicate::str::contains("output.xlsx"));
}

#[test]
fn test_run_from_fixture_writes_workbook() {
    let temp_dir = TempDir::new().unwrap();
    let fixture = write_fixture(temp_dir.path());
    let output = temp_dir.path().join("report.xlsx");

    cost_report(temp_dir.path())
        .args(["run", "--month", "6", "--year", "2025"])
        .arg("--fixture")
        .arg(&fixture)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-05 vs 2025-06"))
        .stdout(predicate::str::contains("prod"))
        .stdout(predicate::str::contains("Report written to"));

    let bytes = fs::read(&output).unwrap();
    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn test_run_csv_ranks_accounts_by_change() {
    let temp_dir = TempDir::new().unwrap();
    let fixture = write_fixture(temp_dir.path());
    let output = temp_dir.path().join("report");

    cost_report(temp_dir.path())
        .args(["run", "-m", "6", "-y", "2025", "--format", "csv", "--quiet"])
        .arg("--fixture")
        .arg(&fixture)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Past Month").not());

    let summary = fs::read_to_string(output.join("Accounts.csv")).unwrap();
    let lines: Vec<&str> = summary.lines().collect();
    assert!(lines[1].starts_with("111,prod,100.00,150.00,50.00,50.00"));
    assert!(lines[2].starts_with("222,shared,1000.00,1010.00,10.00,1.00"));

    let prod = fs::read_to_string(output.join("prod.csv")).unwrap();
    assert!(prod.starts_with("Service,Sum,Past Month"));
    assert!(prod.contains("BoxUsage,250.00"));
}

#[test]
fn test_run_unknown_account_fails_without_output() {
    let temp_dir = TempDir::new().unwrap();
    let fixture = write_fixture(temp_dir.path());
    let output = temp_dir.path().join("report.xlsx");

    cost_report(temp_dir.path())
        .args(["run", "--month", "6", "--year", "2025", "--account", "999"])
        .arg("--fixture")
        .arg(&fixture)
        .arg("--output")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("999"));

    assert!(!output.exists());
}

#[test]
fn test_run_rejects_non_numeric_month() {
    let temp_dir = TempDir::new().unwrap();
    cost_report(temp_dir.path())
        .args(["run", "--month", "june"])
        .assert()
        .failure();
}

#[test]
fn test_config_init_writes_settings_file() {
    let temp_dir = TempDir::new().unwrap();
    cost_report(temp_dir.path())
        .args(["config", "--init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"));

    let contents = fs::read_to_string(temp_dir.path().join("config.json")).unwrap();
    assert!(contents.contains("\"top_n\": 10"));
}

#[test]
fn test_run_details_prints_service_tables() {
    let temp_dir = TempDir::new().unwrap();
    let fixture = write_fixture(temp_dir.path());
    let output = temp_dir.path().join("report.xlsx");

    cost_report(temp_dir.path())
        .args(["run", "--month", "6", "--year", "2025", "--details"])
        .arg("--fixture")
        .arg(&fixture)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("prod (111)"))
        .stdout(predicate::str::contains("shared (222)"))
        .stdout(predicate::str::contains("EC2"))
        .stdout(predicate::str::contains("S3"));
}
