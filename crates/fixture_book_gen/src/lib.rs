//! Fixture workbook generator for sheet-fixture integration tests.
//!
//! Builds sheets in either fixture layout and writes them as real `.xlsx`
//! files, so tests exercise the same reader that production workbooks go
//! through.
//!
//! # Example
//!
//! ```rust,no_run
//! use fixture_book_gen::{write_book, FixtureSheet};
//!
//! let sheet = FixtureSheet::new("company", "company", &["company_cd", "company_name"])
//!     .current()
//!     .row(&["0001", "Future"])
//!     .row(&["0002", "YDC"]);
//!
//! write_book("company.xlsx", &[sheet]).unwrap();
//! ```

use anyhow::{Context, Result};
use rust_xlsxwriter::Workbook;
use std::path::Path;

/// Sheet layout version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Header in row 9, data from row 10
    Legacy,
    /// `version 2.0` marker in A3/B3, types in row 5, header in row 6, data from row 7
    Current,
}

impl Layout {
    /// Zero-based header row
    pub fn header_row(self) -> usize {
        match self {
            Layout::Legacy => 8,
            Layout::Current => 5,
        }
    }
}

/// One fixture sheet
#[derive(Debug, Clone)]
pub struct FixtureSheet {
    pub name: String,
    pub table: String,
    pub layout: Layout,
    pub types: Vec<String>,
    /// Header cells after the label column; empty strings are allowed
    pub columns: Vec<String>,
    /// Full data rows including the label cell
    pub rows: Vec<Vec<String>>,
}

fn owned(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

impl FixtureSheet {
    /// A legacy-layout sheet named `name` for `table`.
    pub fn new(name: &str, table: &str, columns: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            table: table.to_string(),
            layout: Layout::Legacy,
            types: Vec::new(),
            columns: owned(columns),
            rows: Vec::new(),
        }
    }

    /// Switch to the current layout.
    pub fn current(mut self) -> Self {
        self.layout = Layout::Current;
        self
    }

    /// Column types written to the type row of the current layout.
    pub fn types(mut self, types: &[&str]) -> Self {
        self.types = owned(types);
        self
    }

    /// Append a data row with the next sequence label.
    pub fn row(mut self, cells: &[&str]) -> Self {
        let mut row = vec![(self.rows.len() + 1).to_string()];
        row.extend(owned(cells));
        self.rows.push(row);
        self
    }

    /// Append a row exactly as given, label cell included.
    pub fn raw_row(mut self, cells: &[&str]) -> Self {
        self.rows.push(owned(cells));
        self
    }

    /// The sheet as a grid addressed from A1.
    pub fn to_grid(&self) -> Vec<Vec<String>> {
        let header_row = self.layout.header_row();
        let mut grid = vec![Vec::new(); header_row];

        grid[0] = vec![self.name.clone()];
        grid[1] = vec![self.table.clone()];
        if self.layout == Layout::Current {
            grid[2] = vec!["version".to_string(), "2.0".to_string()];
            let mut types = vec!["type".to_string()];
            types.extend(self.types.iter().cloned());
            grid[header_row - 1] = types;
        }

        let mut header = vec!["No".to_string()];
        header.extend(self.columns.iter().cloned());
        grid.push(header);
        grid.extend(self.rows.iter().cloned());
        grid
    }
}

/// Write `sheets` into a new workbook at `path`.
///
/// Every cell is written as a string; empty strings leave the cell empty.
pub fn write_book(path: impl AsRef<Path>, sheets: &[FixtureSheet]) -> Result<()> {
    let path = path.as_ref();
    let mut workbook = Workbook::new();

    for sheet in sheets {
        let worksheet = workbook
            .add_worksheet()
            .set_name(&sheet.name)
            .with_context(|| format!("Failed to create sheet '{}'", sheet.name))?;

        for (r, row) in sheet.to_grid().iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if cell.is_empty() {
                    continue;
                }
                worksheet
                    .write_string(r as u32, c as u16, cell)
                    .with_context(|| format!("Failed to write {}!R{}C{}", sheet.name, r + 1, c + 1))?;
            }
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("Failed to save {}", path.display()))?;
    Ok(())
}

/// A deterministic `company` sheet with `rows` rows.
///
/// Columns: `company_cd` (zero-padded), `company_name`, `founded_year`.
pub fn company_sheet(rows: usize) -> FixtureSheet {
    let mut sheet = FixtureSheet::new("company", "company", &["company_cd", "company_name", "founded_year"])
        .current()
        .types(&["VARCHAR", "VARCHAR", "INTEGER"]);
    for i in 0..rows {
        let code = format!("{:05}", i + 1);
        let name = format!("Company {}", i + 1);
        let year = (1900 + (i * 7) % 120).to_string();
        sheet = sheet.row(&[code.as_str(), name.as_str(), year.as_str()]);
    }
    sheet
}
