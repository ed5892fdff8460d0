//! Read path: compare store tables against expected sheets.
//!
//! Expected values are never compared as sheet strings. They are inserted into
//! a shadow table cloned from the real one, so the store coerces them exactly
//! like real data, and both sides are read back with the same projection and
//! the same primary-key ordering.

mod diff;
mod value;

pub use diff::diff_rows;
pub use value::{CellValue, ComparableRow};

use crate::error::{Error, Result};
use crate::loader::replace_table;
use crate::schema;
use crate::sheet::{decode_sheet, Workbook};
use crate::statement::{create_shadow_sql, select_projection_sql, shadow_table_name};
use duckdb::Connection;
use log::{debug, info, warn};
use serde::Serialize;

/// Compares sheets against the tables they name.
pub struct SheetComparer<'a> {
    conn: &'a Connection,
    ignore_columns: &'a [String],
}

impl<'a> SheetComparer<'a> {
    pub fn new(conn: &'a Connection, ignore_columns: &'a [String]) -> Self {
        Self {
            conn,
            ignore_columns,
        }
    }

    /// Compare one sheet. `Ok` means equal; a difference is an
    /// [`Error::Mismatch`]. Errors are attributed to the sheet.
    pub fn compare_sheet(&self, book: &mut dyn Workbook, sheet: &str) -> Result<()> {
        self.compare_sheet_inner(book, sheet)
            .map_err(|e| e.in_sheet(sheet))
    }

    fn compare_sheet_inner(&self, book: &mut dyn Workbook, sheet: &str) -> Result<()> {
        let expected = decode_sheet(book, sheet)?;
        let pk = schema::primary_key(self.conn, &expected.name)?;

        let columns = self.projected_columns(&expected.columns);
        for ignored in self.ignore_columns {
            if pk.contains(ignored) {
                warn!(
                    "Ignored column {} is part of the primary key of {}; rows are still ordered by it",
                    ignored, expected.name
                );
            }
        }
        let order_by = pk.order_by();

        let got_sql = select_projection_sql(&expected.name, &columns, &order_by);
        let got = fetch_rows(self.conn, &got_sql, &columns)?;

        self.conn
            .execute_batch(&create_shadow_sql(&expected.name))
            .map_err(Error::store(format!(
                "create temporary table for {}",
                expected.name
            )))?;
        let shadow = expected.with_name(shadow_table_name(&expected.name));
        replace_table(self.conn, &shadow)?;

        let want_sql = select_projection_sql(&shadow.name, &columns, &order_by);
        let want = fetch_rows(self.conn, &want_sql, &columns)?;

        match diff_rows(&want, &got) {
            None => {
                info!("Sheet {} matches {} ({} rows)", sheet, expected.name, got.len());
                Ok(())
            }
            Some(diff) => Err(Error::Mismatch {
                table: expected.name,
                diff,
            }),
        }
    }

    /// Sheet columns minus the ignored ones, in sheet order.
    fn projected_columns(&self, columns: &[String]) -> Vec<String> {
        columns
            .iter()
            .filter(|c| !self.ignore_columns.contains(*c))
            .cloned()
            .collect()
    }
}

/// Run `sql` and pair every selected value with its column name.
///
/// `columns` must name the projection of `sql` in order. An empty list reads
/// one empty row per result row.
pub fn fetch_rows(conn: &Connection, sql: &str, columns: &[String]) -> Result<Vec<ComparableRow>> {
    debug!("{}", sql);

    let mut stmt = conn
        .prepare(sql)
        .map_err(Error::store(format!("prepare query: {}", sql)))?;
    let mut rows = stmt
        .query([])
        .map_err(Error::store(format!("execute query: {}", sql)))?;

    let mut result = Vec::new();
    while let Some(row) = rows
        .next()
        .map_err(Error::store(format!("read rows: {}", sql)))?
    {
        let mut values = Vec::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            let value = row
                .get_ref(i)
                .map_err(Error::store(format!("read column {}", column)))?;
            values.push((column.clone(), CellValue::from(value)));
        }
        result.push(values);
    }

    Ok(result)
}

/// Result of comparing a whole workbook
#[derive(Debug)]
pub struct CompareOutcome {
    /// True when every selected sheet matched
    pub equal: bool,
    /// One error per failing sheet, in sheet order
    pub errors: Vec<Error>,
}

impl CompareOutcome {
    pub fn new() -> Self {
        Self {
            equal: true,
            errors: Vec::new(),
        }
    }

    pub fn failed(error: Error) -> Self {
        Self {
            equal: false,
            errors: vec![error],
        }
    }

    pub fn push(&mut self, error: Error) {
        self.equal = false;
        self.errors.push(error);
    }

    /// All error messages, one per line.
    pub fn message(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn report(&self) -> CompareReport {
        CompareReport {
            equal: self.equal,
            errors: self
                .errors
                .iter()
                .map(|e| ReportedError {
                    sheet: e.sheet().map(str::to_string),
                    kind: e.kind(),
                    message: e.root().to_string(),
                })
                .collect(),
        }
    }
}

/// Machine-readable comparison result
#[derive(Debug, Serialize)]
pub struct CompareReport {
    pub equal: bool,
    pub errors: Vec<ReportedError>,
}

#[derive(Debug, Serialize)]
pub struct ReportedError {
    pub sheet: Option<String>,
    pub kind: &'static str,
    pub message: String,
}
