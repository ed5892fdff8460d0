//! Template workbooks generated from store metadata.
//!
//! One sheet per table in the current layout: table name in A2, the version
//! marker in A3/B3, column types in row 5, column names in row 6 and existing
//! rows from row 7. The result loads back unchanged.

use crate::compare::fetch_rows;
use crate::error::{Error, Result, SchemaError};
use crate::schema::{self, ColumnMetadata};
use crate::statement::select_projection_sql;
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_xlsxwriter::{Workbook as XlsxWorkbook, Worksheet, XlsxError};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Excel limit on sheet name length
const MAX_SHEET_NAME_LEN: usize = 31;

const VERSION_LABEL: &str = "version";
const VERSION_VALUE: &str = "2.0";
const TYPE_ROW_LABEL: &str = "type";
const NAME_ROW_LABEL: &str = "column";

const TABLE_NAME_ROW: u32 = 1;
const VERSION_ROW: u32 = 2;
const TYPE_ROW: u32 = 4;
const HEADER_ROW: u32 = 5;
const DATA_START_ROW: u32 = 6;

static RE_SHEET_NAME_INVALID: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\[\]:*?/\\]").unwrap());

/// Configuration for a template dump
#[derive(Debug, Clone)]
pub struct DumpRequest {
    /// Workbook to write
    pub output: PathBuf,
    /// Tables to dump; empty means every base table
    pub tables: Vec<String>,
    /// Maximum rows copied per table
    pub max_rows: usize,
}

impl Default for DumpRequest {
    fn default() -> Self {
        Self {
            output: PathBuf::new(),
            tables: Vec::new(),
            max_rows: 1000,
        }
    }
}

/// Statistics from a dump
#[derive(Debug, Default, Serialize)]
pub struct DumpStats {
    pub sheets: Vec<DumpedSheet>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DumpedSheet {
    pub table: String,
    pub sheet: String,
    pub rows: usize,
}

impl DumpStats {
    pub fn total_rows(&self) -> usize {
        self.sheets.iter().map(|s| s.rows).sum()
    }
}

/// Write a template workbook for the tables of `conn`.
pub fn dump_template(conn: &duckdb::Connection, request: &DumpRequest) -> Result<DumpStats> {
    let tables = if request.tables.is_empty() {
        schema::list_tables(conn)?
    } else {
        request.tables.clone()
    };

    let mut workbook = XlsxWorkbook::new();
    let mut used_names = HashSet::new();
    let mut stats = DumpStats::default();

    for table in &tables {
        let columns = schema::table_columns(conn, table)?;
        if columns.is_empty() {
            return Err(SchemaError::UnknownTable {
                table: table.clone(),
            }
            .into());
        }
        let rows = table_rows(conn, table, &columns, request.max_rows)?;

        let sheet = unique_sheet_name(table, &mut used_names);
        let worksheet = workbook
            .add_worksheet()
            .set_name(&sheet)
            .map_err(xlsx_err(&request.output))?;
        write_sheet(worksheet, table, &columns, &rows).map_err(xlsx_err(&request.output))?;

        info!("Dumped {} ({} rows) to sheet {}", table, rows.len(), sheet);
        stats.sheets.push(DumpedSheet {
            table: table.clone(),
            sheet,
            rows: rows.len(),
        });
    }

    if stats.sheets.is_empty() {
        // A workbook needs at least one sheet
        workbook.add_worksheet();
    }
    workbook
        .save(&request.output)
        .map_err(xlsx_err(&request.output))?;

    Ok(stats)
}

fn xlsx_err(path: &Path) -> impl FnOnce(XlsxError) -> Error + '_ {
    move |e| Error::Workbook {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

/// Existing rows as cell strings, ordered by primary key when there is one.
fn table_rows(
    conn: &duckdb::Connection,
    table: &str,
    columns: &[ColumnMetadata],
    max_rows: usize,
) -> Result<Vec<Vec<String>>> {
    if max_rows == 0 {
        return Ok(Vec::new());
    }

    let names: Vec<String> = columns.iter().map(|c| c.name.clone()).collect();
    let order_by = match schema::primary_key(conn, table) {
        Ok(pk) => pk.order_by(),
        Err(_) => names.join(", "),
    };

    let sql = select_projection_sql(table, &names, &order_by);
    let sql = format!("{} LIMIT {};", sql.trim_end_matches(';'), max_rows);

    Ok(fetch_rows(conn, &sql, &names)?
        .into_iter()
        .map(|row| row.into_iter().map(|(_, v)| v.to_cell_string()).collect())
        .collect())
}

fn write_sheet(
    worksheet: &mut Worksheet,
    table: &str,
    columns: &[ColumnMetadata],
    rows: &[Vec<String>],
) -> std::result::Result<(), XlsxError> {
    worksheet.write_string(TABLE_NAME_ROW, 0, table)?;
    worksheet.write_string(VERSION_ROW, 0, VERSION_LABEL)?;
    worksheet.write_string(VERSION_ROW, 1, VERSION_VALUE)?;
    worksheet.write_string(TYPE_ROW, 0, TYPE_ROW_LABEL)?;
    worksheet.write_string(HEADER_ROW, 0, NAME_ROW_LABEL)?;

    for (i, column) in columns.iter().enumerate() {
        let col = (i + 1) as u16;
        worksheet.write_string(TYPE_ROW, col, &column.data_type)?;
        worksheet.write_string(HEADER_ROW, col, &column.name)?;
    }

    for (r, row) in rows.iter().enumerate() {
        let sheet_row = DATA_START_ROW + r as u32;
        worksheet.write_string(sheet_row, 0, (r + 1).to_string())?;
        for (i, cell) in row.iter().enumerate() {
            if !cell.is_empty() {
                worksheet.write_string(sheet_row, (i + 1) as u16, cell)?;
            }
        }
    }

    Ok(())
}

/// Sheet name for `table`: invalid characters replaced, cut to the Excel
/// length limit and made unique within the workbook.
fn unique_sheet_name(table: &str, used: &mut HashSet<String>) -> String {
    let base: String = RE_SHEET_NAME_INVALID
        .replace_all(table, "_")
        .chars()
        .take(MAX_SHEET_NAME_LEN)
        .collect();

    let mut name = base.clone();
    let mut n = 1;
    while !used.insert(name.to_lowercase()) {
        n += 1;
        let suffix = format!("~{}", n);
        let keep = MAX_SHEET_NAME_LEN - suffix.len();
        name = format!("{}{}", base.chars().take(keep).collect::<String>(), suffix);
    }
    name
}
