//! Integration tests for template dumps and CSV export.

use sheet_fixture::sheet::{decode_sheet, LayoutVersion, SheetLayout};
use sheet_fixture::{
    dump_template, export_book_csv, CompareRequest, DumpRequest, Error, FixtureEngine,
    LoadRequest, SchemaError, Workbook, XlsxBook, MEMORY_SOURCE,
};
use std::fs;
use tempfile::TempDir;

const SCHEMA: &str = "
CREATE TABLE company (
    company_cd VARCHAR PRIMARY KEY,
    company_name VARCHAR NOT NULL,
    founded_year INTEGER,
    founded_on DATE
);
INSERT INTO company VALUES
    ('0002', 'YDC', 1972, DATE '1972-04-01'),
    ('0001', 'Future', 1989, NULL);
CREATE TABLE audit_log (id INTEGER PRIMARY KEY, message VARCHAR);
";

fn setup() -> FixtureEngine {
    let engine = FixtureEngine::open(MEMORY_SOURCE).unwrap();
    engine.connection().execute_batch(SCHEMA).unwrap();
    engine
}

// =============================================================================
// Template dump
// =============================================================================

#[test]
fn test_dump_writes_current_layout() {
    let engine = setup();
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("template.xlsx");

    let stats = dump_template(
        engine.connection(),
        &DumpRequest {
            output: output.clone(),
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(stats.sheets.len(), 2);
    assert_eq!(stats.total_rows(), 2);

    let mut book = XlsxBook::open(&output).unwrap();
    assert_eq!(book.sheet_names(), vec!["audit_log", "company"]);

    let layout = SheetLayout::detect(&mut book, "company").unwrap();
    assert_eq!(layout.version, LayoutVersion::Current);

    let rows = book.rows("company").unwrap();
    assert_eq!(rows[4][1..], ["VARCHAR", "VARCHAR", "INTEGER", "DATE"]);

    let table = decode_sheet(&mut book, "company").unwrap();
    assert_eq!(table.name, "company");
    assert_eq!(
        table.columns,
        vec!["company_cd", "company_name", "founded_year", "founded_on"]
    );
    assert_eq!(
        table.rows,
        vec![
            vec!["0001", "Future", "1989", ""],
            vec!["0002", "YDC", "1972", "1972-04-01"],
        ]
    );
}

#[test]
fn test_dump_table_filter_and_row_limit() {
    let engine = setup();
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("company.xlsx");

    let stats = dump_template(
        engine.connection(),
        &DumpRequest {
            output: output.clone(),
            tables: vec!["company".to_string()],
            max_rows: 1,
        },
    )
    .unwrap();

    assert_eq!(stats.sheets.len(), 1);
    assert_eq!(stats.sheets[0].rows, 1);

    let mut book = XlsxBook::open(&output).unwrap();
    let table = decode_sheet(&mut book, "company").unwrap();
    assert_eq!(table.rows, vec![vec!["0001", "Future", "1989", ""]]);
}

#[test]
fn test_dump_unknown_table_fails() {
    let engine = setup();
    let dir = TempDir::new().unwrap();

    let err = dump_template(
        engine.connection(),
        &DumpRequest {
            output: dir.path().join("x.xlsx"),
            tables: vec!["no_such_table".to_string()],
            ..Default::default()
        },
    )
    .unwrap_err();

    assert!(matches!(
        err,
        Error::Schema(SchemaError::UnknownTable { ref table }) if table == "no_such_table"
    ));
}

#[test]
fn test_dumped_template_loads_and_compares() {
    let mut engine = setup();
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("roundtrip.xlsx");
    dump_template(
        engine.connection(),
        &DumpRequest {
            output: output.clone(),
            ..Default::default()
        },
    )
    .unwrap();

    // The dump matches the tables it came from
    let outcome = engine.compare(&CompareRequest::new(&output));
    assert!(outcome.equal, "{}", outcome.message());

    // Loading it into a fresh store reproduces the tables
    let mut fresh = FixtureEngine::open(MEMORY_SOURCE).unwrap();
    fresh
        .connection()
        .execute_batch(
            "CREATE TABLE company (company_cd VARCHAR PRIMARY KEY, company_name VARCHAR NOT NULL, founded_year INTEGER, founded_on DATE);
             CREATE TABLE audit_log (id INTEGER PRIMARY KEY, message VARCHAR);",
        )
        .unwrap();
    fresh.load(&LoadRequest::new(&output)).unwrap();
    let outcome = fresh.compare(&CompareRequest::new(&output));
    assert!(outcome.equal, "{}", outcome.message());
}

// =============================================================================
// CSV export
// =============================================================================

#[test]
fn test_export_book_csv() {
    let engine = setup();
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("book.xlsx");
    dump_template(
        engine.connection(),
        &DumpRequest {
            output: output.clone(),
            ..Default::default()
        },
    )
    .unwrap();

    let written = export_book_csv(&output).unwrap();

    // audit_log has no rows and is not exported
    assert_eq!(written, vec![dir.path().join("csv").join("book_company.csv")]);
    let csv = fs::read_to_string(&written[0]).unwrap();
    assert_eq!(
        csv,
        "company_cd,company_name,founded_year,founded_on\n0001,Future,1989,\n0002,YDC,1972,1972-04-01\n"
    );
}
