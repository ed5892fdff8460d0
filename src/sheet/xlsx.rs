//! xlsx/xls/ods access through calamine.

use super::{CellRef, Workbook};
use crate::error::{Error, Result};
use ahash::AHashMap;
use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use chrono::NaiveTime;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// A spreadsheet file opened for reading.
///
/// Each sheet is converted to a string grid once and cached, so the decoder
/// can read single cells and whole rows without re-parsing the sheet.
pub struct XlsxBook {
    path: PathBuf,
    sheets: Sheets<BufReader<File>>,
    names: Vec<String>,
    cache: AHashMap<String, Vec<Vec<String>>>,
}

impl XlsxBook {
    pub fn open(path: &Path) -> Result<Self> {
        let sheets = open_workbook_auto(path).map_err(|e| Error::Workbook {
            path: path.to_path_buf(),
            message: format!("open: {}", e),
        })?;
        let names = sheets.sheet_names().to_vec();

        Ok(Self {
            path: path.to_path_buf(),
            sheets,
            names,
            cache: AHashMap::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn grid(&mut self, sheet: &str) -> Result<&Vec<Vec<String>>> {
        if !self.cache.contains_key(sheet) {
            let range = self.sheets.worksheet_range(sheet).map_err(|e| Error::Workbook {
                path: self.path.clone(),
                message: format!("read sheet '{}': {}", sheet, e),
            })?;
            self.cache.insert(sheet.to_string(), range_to_grid(&range));
        }
        self.cache.get(sheet).ok_or_else(|| Error::Workbook {
            path: self.path.clone(),
            message: format!("sheet '{}' not found", sheet),
        })
    }
}

impl Workbook for XlsxBook {
    fn sheet_names(&self) -> Vec<String> {
        self.names.clone()
    }

    fn rows(&mut self, sheet: &str) -> Result<Vec<Vec<String>>> {
        self.grid(sheet).cloned()
    }

    fn cell(&mut self, sheet: &str, cell: CellRef) -> Result<String> {
        Ok(cell.lookup(self.grid(sheet)?).to_string())
    }
}

/// Convert a used range to a grid addressed from A1.
///
/// calamine ranges start at the first used cell; the fixture layout uses
/// absolute addresses, so the grid is padded with empty rows and cells up to
/// the range origin.
fn range_to_grid(range: &Range<Data>) -> Vec<Vec<String>> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };

    let mut grid: Vec<Vec<String>> = vec![Vec::new(); start_row as usize];
    for row in range.rows() {
        let mut cells = vec![String::new(); start_col as usize];
        cells.extend(row.iter().map(cell_to_string));
        grid.push(cells);
    }
    grid
}

/// Render one cell the way it reads in the spreadsheet.
pub(crate) fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => {
            // Integral numbers without decimals
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::Error(e) => format!("#{:?}", e),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) if Some(value.time()) == NaiveTime::from_hms_opt(0, 0, 0) => {
                value.format("%Y-%m-%d").to_string()
            }
            Some(value) => value.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => dt.as_f64().to_string(),
        },
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}
