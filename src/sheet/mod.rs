//! Spreadsheet access and fixture sheet decoding.
//!
//! The decoder only needs three things from a workbook: the sheet names in
//! file order, every row of a sheet as strings, and a single cell by address.
//! [`Workbook`] captures exactly that, with an xlsx implementation backed by
//! calamine and an in-memory one for callers that already hold the grid.

mod layout;
mod xlsx;

pub use layout::{decode_rows, decode_sheet, trim_cell, LayoutVersion, SheetLayout};
pub use xlsx::XlsxBook;

use crate::error::{Error, Result};
use ahash::AHashMap;
use std::fmt;
use std::path::PathBuf;

/// Zero-based cell coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Parse an A1-style address such as `A2` or `AB10`.
    pub fn parse(address: &str) -> Option<Self> {
        let address = address.trim();
        let split = address.find(|c: char| c.is_ascii_digit())?;
        let (letters, digits) = address.split_at(split);
        if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }

        let mut col = 0usize;
        for c in letters.chars() {
            col = col * 26 + (c.to_ascii_uppercase() as usize - 'A' as usize + 1);
        }
        let row: usize = digits.parse().ok()?;
        if row == 0 {
            return None;
        }
        Some(Self::new(row - 1, col - 1))
    }

    /// Look the cell up in a row grid, treating missing cells as empty.
    pub fn lookup<'a>(&self, rows: &'a [Vec<String>]) -> &'a str {
        rows.get(self.row)
            .and_then(|r| r.get(self.col))
            .map(String::as_str)
            .unwrap_or("")
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut letters = Vec::new();
        let mut n = self.col + 1;
        while n > 0 {
            let rem = (n - 1) % 26;
            letters.push((b'A' + rem as u8) as char);
            n = (n - 1) / 26;
        }
        let letters: String = letters.into_iter().rev().collect();
        write!(f, "{}{}", letters, self.row + 1)
    }
}

/// Read access to a workbook
pub trait Workbook {
    /// Sheet names in file order
    fn sheet_names(&self) -> Vec<String>;

    /// All rows of a sheet as strings, addressed from A1
    fn rows(&mut self, sheet: &str) -> Result<Vec<Vec<String>>>;

    /// A single cell; missing cells read as the empty string
    fn cell(&mut self, sheet: &str, cell: CellRef) -> Result<String> {
        let rows = self.rows(sheet)?;
        Ok(cell.lookup(&rows).to_string())
    }
}

/// A workbook held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryBook {
    order: Vec<String>,
    sheets: AHashMap<String, Vec<Vec<String>>>,
}

impl MemoryBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sheet. A sheet with the same name is replaced in place.
    pub fn with_sheet(mut self, name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        self.insert_sheet(name, rows);
        self
    }

    pub fn insert_sheet(&mut self, name: impl Into<String>, rows: Vec<Vec<String>>) {
        let name = name.into();
        if !self.sheets.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.sheets.insert(name, rows);
    }
}

impl Workbook for MemoryBook {
    fn sheet_names(&self) -> Vec<String> {
        self.order.clone()
    }

    fn rows(&mut self, sheet: &str) -> Result<Vec<Vec<String>>> {
        self.sheets
            .get(sheet)
            .cloned()
            .ok_or_else(|| Error::Workbook {
                path: PathBuf::from("<memory>"),
                message: format!("sheet '{}' not found", sheet),
            })
    }

    fn cell(&mut self, sheet: &str, cell: CellRef) -> Result<String> {
        let rows = self.sheets.get(sheet).ok_or_else(|| Error::Workbook {
            path: PathBuf::from("<memory>"),
            message: format!("sheet '{}' not found", sheet),
        })?;
        Ok(cell.lookup(rows).to_string())
    }
}
