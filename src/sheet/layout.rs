//! Fixture sheet layout and decoding.
//!
//! A fixture sheet carries the table name in A2, one row of column names and
//! the data rows below it. The first cell of every data row is a sequence
//! label and never part of the data. Two layouts exist:
//!
//! | Layout  | Marker                     | Header row | First data row |
//! |---------|----------------------------|------------|----------------|
//! | legacy  | none                       | 9          | 10             |
//! | current | A3 = `version`, B3 ≥ `2.0` | 6          | 7              |
//!
//! The layout is resolved once per sheet into a [`SheetLayout`]; the decoding
//! passes only ever read row indexes from it.

use super::{CellRef, Workbook};
use crate::error::{Error, LayoutError, Result};
use crate::table::FixtureTable;
use log::debug;

const TABLE_NAME_CELL: CellRef = CellRef::new(1, 0);
const VERSION_LABEL_CELL: CellRef = CellRef::new(2, 0);
const VERSION_VALUE_CELL: CellRef = CellRef::new(2, 1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutVersion {
    /// Sheets written before version markers existed
    Legacy,
    /// Sheets marked `version 2.0` or later
    Current,
}

/// Row positions of one sheet, zero-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    pub version: LayoutVersion,
    pub table_name_cell: CellRef,
    pub header_row: usize,
    pub data_start_row: usize,
}

impl SheetLayout {
    pub const LEGACY: SheetLayout = SheetLayout {
        version: LayoutVersion::Legacy,
        table_name_cell: TABLE_NAME_CELL,
        header_row: 8,
        data_start_row: 9,
    };

    pub const CURRENT: SheetLayout = SheetLayout {
        version: LayoutVersion::Current,
        table_name_cell: TABLE_NAME_CELL,
        header_row: 5,
        data_start_row: 6,
    };

    /// Pick the layout from the version marker cells (A3 and B3).
    pub fn resolve(label: &str, version: &str) -> SheetLayout {
        if !trim_cell(label).eq_ignore_ascii_case("version") {
            return Self::LEGACY;
        }

        let major = trim_cell(version)
            .split('.')
            .next()
            .and_then(|m| m.parse::<u32>().ok());
        match major {
            Some(m) if m >= 2 => Self::CURRENT,
            _ => Self::LEGACY,
        }
    }

    /// Resolve the layout of a sheet from its marker cells.
    pub fn detect(book: &mut dyn Workbook, sheet: &str) -> Result<SheetLayout> {
        let label = book.cell(sheet, VERSION_LABEL_CELL)?;
        let version = book.cell(sheet, VERSION_VALUE_CELL)?;
        Ok(Self::resolve(&label, &version))
    }
}

/// Strip leading/trailing half-width and full-width spaces.
pub fn trim_cell(cell: &str) -> &str {
    cell.trim_matches(|c| c == ' ' || c == '\u{3000}')
}

/// Decode one sheet of a workbook into a fixture table.
pub fn decode_sheet(book: &mut dyn Workbook, sheet: &str) -> Result<FixtureTable> {
    let layout = SheetLayout::detect(book, sheet)?;
    let table_name = book.cell(sheet, layout.table_name_cell)?;
    let rows = book.rows(sheet)?;

    debug!("Decoding sheet {} with {:?} layout", sheet, layout.version);
    decode_rows(&layout, &table_name, &rows).map_err(Error::from)
}

/// Decode a sheet grid that follows `layout`.
pub fn decode_rows(
    layout: &SheetLayout,
    table_name: &str,
    rows: &[Vec<String>],
) -> Result<FixtureTable, LayoutError> {
    let table_name = trim_cell(table_name);
    if table_name.is_empty() {
        return Err(LayoutError::EmptyTableName {
            cell: layout.table_name_cell.to_string(),
        });
    }

    let header = rows
        .get(layout.header_row)
        .ok_or(LayoutError::MissingHeaderRow {
            row: layout.header_row + 1,
        })?;

    let columns = header_columns(header)?;
    let data = data_rows(layout, header, rows, columns.len())?;

    Ok(FixtureTable::new(table_name, columns, data))
}

/// Positions of the header cells that carry a column name.
///
/// Position 0 is the label column. Both decoding passes go through this
/// function so header names and data cells stay aligned after compaction.
fn kept_positions(header: &[String]) -> Vec<usize> {
    header
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, cell)| !trim_cell(cell).is_empty())
        .map(|(pos, _)| pos)
        .collect()
}

fn header_columns(header: &[String]) -> Result<Vec<String>, LayoutError> {
    let mut columns: Vec<String> = Vec::new();
    for pos in kept_positions(header) {
        let name = trim_cell(&header[pos]).to_string();
        if columns.contains(&name) {
            return Err(LayoutError::DuplicateColumn { column: name });
        }
        columns.push(name);
    }
    Ok(columns)
}

fn data_rows(
    layout: &SheetLayout,
    header: &[String],
    rows: &[Vec<String>],
    column_count: usize,
) -> Result<Vec<Vec<String>>, LayoutError> {
    let positions = kept_positions(header);
    let mut data = Vec::new();

    for (index, row) in rows.iter().enumerate().skip(layout.data_start_row) {
        let sheet_row = index + 1;

        // Blank separator row
        if row.iter().skip(1).all(|cell| trim_cell(cell).is_empty()) {
            continue;
        }
        if row.first().map_or(true, |label| trim_cell(label).is_empty()) {
            debug!("Skipping row {} without a sequence label", sheet_row);
            continue;
        }

        let cells = row.len() - 1;
        if cells < column_count {
            return Err(LayoutError::ShortRow {
                row: sheet_row,
                cells,
                columns: column_count,
            });
        }

        let values: Vec<String> = positions
            .iter()
            .map(|&pos| row.get(pos).cloned().unwrap_or_default())
            .collect();
        if values.len() != column_count {
            return Err(LayoutError::ColumnCountMismatch {
                row: sheet_row,
                header: column_count,
                data: values.len(),
            });
        }
        data.push(values);
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::MemoryBook;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    fn legacy_sheet(header: &[&str], data: &[&[&str]]) -> Vec<Vec<String>> {
        let mut rows = grid(&[&[""], &["company"]]);
        rows.resize(8, Vec::new());
        rows.push(header.iter().map(|c| c.to_string()).collect());
        rows.extend(grid(data));
        rows
    }

    #[test]
    fn test_resolve_layout() {
        assert_eq!(SheetLayout::resolve("", ""), SheetLayout::LEGACY);
        assert_eq!(SheetLayout::resolve("version", "2.0"), SheetLayout::CURRENT);
        assert_eq!(SheetLayout::resolve(" Version ", "3"), SheetLayout::CURRENT);
        assert_eq!(SheetLayout::resolve("version", "1.0"), SheetLayout::LEGACY);
        assert_eq!(SheetLayout::resolve("version", "abc"), SheetLayout::LEGACY);
        assert_eq!(SheetLayout::resolve("note", "2.0"), SheetLayout::LEGACY);
    }

    #[test]
    fn test_trim_cell_full_and_half_width() {
        assert_eq!(trim_cell("\u{3000} name \u{3000}"), "name");
        assert_eq!(trim_cell(" \u{3000} "), "");
        assert_eq!(trim_cell("a b"), "a b");
    }

    #[test]
    fn test_decode_legacy_sheet() {
        let rows = legacy_sheet(
            &["No", "company_cd", "company_name", "founded_year"],
            &[&["1", "00001", "Future", "1989"], &["2", "00002", "YDC", "1972"]],
        );

        let table = decode_rows(&SheetLayout::LEGACY, "company", &rows).unwrap();
        assert_eq!(table.name, "company");
        assert_eq!(table.columns, vec!["company_cd", "company_name", "founded_year"]);
        assert_eq!(
            table.rows,
            vec![
                vec!["00001", "Future", "1989"],
                vec!["00002", "YDC", "1972"]
            ]
        );
    }

    #[test]
    fn test_decode_current_sheet_from_book() {
        let rows = grid(&[
            &["会社"],
            &["company"],
            &["version", "2.0"],
            &[],
            &["型", "varchar", "varchar"],
            &["項目物理名", "company_cd", "company_name"],
            &["1", "00001", "Future"],
        ]);
        let mut book = MemoryBook::new().with_sheet("会社", rows);

        let table = decode_sheet(&mut book, "会社").unwrap();
        assert_eq!(table.name, "company");
        assert_eq!(table.columns, vec!["company_cd", "company_name"]);
        assert_eq!(table.rows, vec![vec!["00001", "Future"]]);
    }

    #[test]
    fn test_empty_table_name_fails() {
        let rows = legacy_sheet(&["No", "a"], &[]);
        let err = decode_rows(&SheetLayout::LEGACY, " \u{3000}", &rows).unwrap_err();
        assert_eq!(
            err,
            LayoutError::EmptyTableName {
                cell: "A2".to_string()
            }
        );
    }

    #[test]
    fn test_missing_header_row_fails() {
        let rows = grid(&[&[""], &["company"]]);
        let err = decode_rows(&SheetLayout::LEGACY, "company", &rows).unwrap_err();
        assert_eq!(err, LayoutError::MissingHeaderRow { row: 9 });
    }

    #[test]
    fn test_header_compaction_keeps_alignment() {
        // Column C has an empty (full-width space) header and must be dropped
        // together with every data cell below it.
        let rows = legacy_sheet(
            &["No", " a ", "\u{3000}", "b"],
            &[&["1", "x", "ignored", "y"]],
        );

        let table = decode_rows(&SheetLayout::LEGACY, "t", &rows).unwrap();
        assert_eq!(table.columns, vec!["a", "b"]);
        assert_eq!(table.rows, vec![vec!["x", "y"]]);
    }

    #[test]
    fn test_blank_and_unlabelled_rows_are_skipped() {
        let rows = legacy_sheet(
            &["No", "a", "b"],
            &[
                &["1", "x", "y"],
                &["2", " ", "\u{3000}"],
                &["3"],
                &["", "p", "q"],
                &[],
                &["4", "z", ""],
            ],
        );

        let table = decode_rows(&SheetLayout::LEGACY, "t", &rows).unwrap();
        assert_eq!(table.rows, vec![vec!["x", "y"], vec!["z", ""]]);
    }

    #[test]
    fn test_short_row_fails() {
        let rows = legacy_sheet(&["No", "a", "b", "c"], &[&["1", "x", "y"]]);
        let err = decode_rows(&SheetLayout::LEGACY, "t", &rows).unwrap_err();
        assert_eq!(
            err,
            LayoutError::ShortRow {
                row: 10,
                cells: 2,
                columns: 3
            }
        );
    }

    #[test]
    fn test_duplicate_column_fails() {
        let rows = legacy_sheet(&["No", "a", "a "], &[]);
        let err = decode_rows(&SheetLayout::LEGACY, "t", &rows).unwrap_err();
        assert_eq!(
            err,
            LayoutError::DuplicateColumn {
                column: "a".to_string()
            }
        );
    }

    #[test]
    fn test_data_values_are_not_trimmed() {
        let rows = legacy_sheet(&["No", "a"], &[&["1", " padded "]]);
        let table = decode_rows(&SheetLayout::LEGACY, "t", &rows).unwrap();
        assert_eq!(table.rows, vec![vec![" padded "]]);
    }
}
