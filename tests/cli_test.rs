//! End-to-end tests for the sheet-fixture binary.

use assert_cmd::Command;
use duckdb::Connection;
use fixture_book_gen::{write_book, FixtureSheet};
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn database(dir: &Path) -> PathBuf {
    let path = dir.join("app.duckdb");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE company (company_cd VARCHAR PRIMARY KEY, company_name VARCHAR, founded_year INTEGER);",
    )
    .unwrap();
    path
}

fn company_book(dir: &Path, name: &str, rows: &[&[&str]]) -> PathBuf {
    let mut sheet = FixtureSheet::new("company", "company", &["company_cd", "company_name", "founded_year"]);
    for row in rows {
        sheet = sheet.row(row);
    }
    let path = dir.join(name);
    write_book(&path, &[sheet]).unwrap();
    path
}

fn sheet_fixture() -> Command {
    let mut cmd = Command::cargo_bin("sheet-fixture").expect("binary exists");
    cmd.env_remove("SHEET_FIXTURE_CONNECTION");
    cmd
}

#[test]
fn test_load_then_compare() {
    let dir = TempDir::new().unwrap();
    let db = database(dir.path());
    let book = company_book(dir.path(), "company.xlsx", &[&["0001", "Future", "1989"]]);

    sheet_fixture()
        .args(["-c", db.to_str().unwrap(), "load", book.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded 1 sheet(s), 1 row(s)"));

    sheet_fixture()
        .args(["-c", db.to_str().unwrap(), "compare", book.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("All sheets match"));
}

#[test]
fn test_compare_mismatch_exits_non_zero() {
    let dir = TempDir::new().unwrap();
    let db = database(dir.path());
    let input = company_book(dir.path(), "input.xlsx", &[&["0001", "Future", "1989"]]);
    let want = company_book(
        dir.path(),
        "want.xlsx",
        &[&["0001", "Future", "1989"], &["0002", "YDC", "1972"]],
    );

    sheet_fixture()
        .args(["-c", db.to_str().unwrap(), "load", input.to_str().unwrap()])
        .assert()
        .success();

    sheet_fixture()
        .args(["-c", db.to_str().unwrap(), "compare", want.to_str().unwrap()])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("sheet company: table(company) mismatch (-want +got):"))
        .stderr(predicate::str::contains("row count: want 2, got 1"));
}

#[test]
fn test_compare_ignore_column_and_json() {
    let dir = TempDir::new().unwrap();
    let db = database(dir.path());
    let input = company_book(dir.path(), "input.xlsx", &[&["0001", "Future", "1989"]]);
    let want = company_book(dir.path(), "want.xlsx", &[&["0001", "Future", "2024"]]);

    sheet_fixture()
        .args(["-c", db.to_str().unwrap(), "load", input.to_str().unwrap()])
        .assert()
        .success();

    sheet_fixture()
        .args(["-c", db.to_str().unwrap(), "compare", want.to_str().unwrap(), "--json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"equal\": false"))
        .stdout(predicate::str::contains("\"kind\": \"mismatch\""));

    sheet_fixture()
        .args([
            "-c",
            db.to_str().unwrap(),
            "compare",
            want.to_str().unwrap(),
            "--ignore-column",
            "founded_year",
            "--json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"equal\": true"));
}

#[test]
fn test_connection_from_environment_and_config_file() {
    let dir = TempDir::new().unwrap();
    let db = database(dir.path());
    let input = company_book(dir.path(), "input.xlsx", &[&["0001", "Future", "1989"]]);
    let want = company_book(dir.path(), "want.xlsx", &[&["0001", "Future", "2024"]]);
    let config = dir.path().join("fixture.yaml");
    fs::write(&config, "ignore_columns: [founded_year]\n").unwrap();

    sheet_fixture()
        .env("SHEET_FIXTURE_CONNECTION", db.to_str().unwrap())
        .args(["load", input.to_str().unwrap()])
        .assert()
        .success();

    sheet_fixture()
        .env("SHEET_FIXTURE_CONNECTION", db.to_str().unwrap())
        .args([
            "compare",
            want.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ])
        .assert()
        .success();
}

#[test]
fn test_failed_load_reports_sheet() {
    let dir = TempDir::new().unwrap();
    let db = database(dir.path());
    let book = dir.path().join("broken.xlsx");
    write_book(
        &book,
        &[FixtureSheet::new("broken", "", &["company_cd"]).row(&["0001"])],
    )
    .unwrap();

    sheet_fixture()
        .args(["-c", db.to_str().unwrap(), "load", book.to_str().unwrap()])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("sheet broken: table name is empty (cell A2)"));
}

#[test]
fn test_dump_and_export_csv() {
    let dir = TempDir::new().unwrap();
    let db = database(dir.path());
    let book = company_book(dir.path(), "input.xlsx", &[&["0001", "Future", "1989"]]);
    let template = dir.path().join("template.xlsx");

    sheet_fixture()
        .args(["-c", db.to_str().unwrap(), "load", book.to_str().unwrap()])
        .assert()
        .success();

    sheet_fixture()
        .args(["-c", db.to_str().unwrap(), "dump", template.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 1 sheet(s), 1 row(s)"));
    assert!(template.exists());

    sheet_fixture()
        .args(["export-csv", template.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("template_company.csv"));
}

#[test]
fn test_completions() {
    sheet_fixture()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sheet-fixture"));
}
