//! CSV export of fixture workbooks.
//!
//! Every decodable sheet with at least one data row is written to
//! `<book dir>/csv/<book stem>_<sheet>.csv`: the column names followed by the
//! data rows, without the sequence labels.

use crate::error::Result;
use crate::sheet::{decode_sheet, Workbook, XlsxBook};
use crate::table::FixtureTable;
use log::{debug, info};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Directory created next to the workbook
pub const CSV_DIR: &str = "csv";

/// Export every sheet of the workbook at `book_path`.
///
/// Returns the written files in sheet order.
pub fn export_book_csv(book_path: &Path) -> Result<Vec<PathBuf>> {
    let mut book = XlsxBook::open(book_path)?;
    let out_dir = book_path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(CSV_DIR);
    let stem = book_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    export_workbook_csv(&mut book, &out_dir, &stem)
}

/// Export every sheet of `book` into `out_dir`, naming files `<stem>_<sheet>.csv`.
pub fn export_workbook_csv(
    book: &mut dyn Workbook,
    out_dir: &Path,
    stem: &str,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)?;

    let mut written = Vec::new();
    for sheet in book.sheet_names() {
        let table = match decode_sheet(book, &sheet) {
            Ok(table) => table,
            Err(e) => {
                debug!("Not exporting sheet {}: {}", sheet, e);
                continue;
            }
        };
        if table.is_empty() {
            debug!("Not exporting sheet {}: no data rows", sheet);
            continue;
        }

        let path = out_dir.join(format!("{}_{}.csv", stem, sheet));
        write_table_csv(&table, &path)?;
        info!("Exported sheet {} to {}", sheet, path.display());
        written.push(path);
    }

    Ok(written)
}

fn write_table_csv(table: &FixtureTable, path: &Path) -> Result<()> {
    let file = BufWriter::new(File::create(path)?);
    let mut writer = csv::WriterBuilder::new().from_writer(file);

    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}
