//! Transaction boundaries for whole-workbook loads and comparisons.

use crate::compare::{CompareOutcome, SheetComparer};
use crate::error::{Error, Result};
use crate::export::export_book_csv;
use crate::loader::SheetLoader;
use crate::request::{is_cancelled, CompareRequest, LoadRequest};
use crate::sheet::{Workbook, XlsxBook};
use duckdb::Connection;
use log::{debug, info, warn};
use serde::Serialize;
use std::fmt;

/// Connection source that opens a private in-memory store
pub const MEMORY_SOURCE: &str = ":memory:";

/// Statistics from a load
#[derive(Debug, Default, Serialize)]
pub struct LoadStats {
    pub sheets_loaded: usize,
    pub sheets_skipped: usize,
    pub rows_inserted: usize,
    pub tables: Vec<TableLoadStats>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableLoadStats {
    pub sheet: String,
    pub table: String,
    pub rows: usize,
}

impl fmt::Display for LoadStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Loaded {} sheet(s), {} row(s); skipped {} sheet(s)",
            self.sheets_loaded, self.rows_inserted, self.sheets_skipped
        )?;
        for table in &self.tables {
            writeln!(f, "  {} -> {}: {} row(s)", table.sheet, table.table, table.rows)?;
        }
        Ok(())
    }
}

/// Loads fixture workbooks into a store and compares the store against them.
///
/// The engine owns its connection exclusively; every call runs in one
/// transaction on it.
pub struct FixtureEngine {
    conn: Connection,
}

impl FixtureEngine {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Open `:memory:` or a database file.
    pub fn open(source: &str) -> Result<Self> {
        let conn = if source.is_empty() || source == MEMORY_SOURCE {
            Connection::open_in_memory()
        } else {
            Connection::open(source)
        }
        .map_err(Error::store(format!("open store {}", source)))?;
        Ok(Self::new(conn))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn into_connection(self) -> Connection {
        self.conn
    }

    /// Load every selected sheet of the workbook at `request.book_path`.
    ///
    /// All sheets are committed together or not at all. The CSV export runs
    /// after the commit.
    pub fn load(&mut self, request: &LoadRequest) -> Result<LoadStats> {
        let mut book = XlsxBook::open(&request.book_path)?;
        let stats = self.load_book(&mut book, request)?;

        if request.dump_csv {
            export_book_csv(&request.book_path)?;
        }
        Ok(stats)
    }

    /// Load the selected sheets of an already opened workbook.
    pub fn load_book(&mut self, book: &mut dyn Workbook, request: &LoadRequest) -> Result<LoadStats> {
        let filter = request.filter();
        let tx = self
            .conn
            .transaction()
            .map_err(Error::store("start transaction"))?;
        let loader = SheetLoader::new(&tx).auto_complete_not_null(request.auto_complete_not_null);

        let mut stats = LoadStats::default();
        for sheet in book.sheet_names() {
            if !filter.selects(&sheet) {
                debug!("Skipping sheet {}", sheet);
                stats.sheets_skipped += 1;
                continue;
            }
            if is_cancelled(request.cancel.as_ref()) {
                warn!("Load cancelled before sheet {}", sheet);
                return Err(Error::Cancelled { sheet });
            }

            let table = loader.load_sheet(book, &sheet)?;
            stats.sheets_loaded += 1;
            stats.rows_inserted += table.row_count();
            stats.tables.push(TableLoadStats {
                sheet,
                table: table.name,
                rows: table.rows.len(),
            });
        }

        tx.commit().map_err(Error::store("commit"))?;
        info!(
            "Committed {} sheet(s), {} row(s)",
            stats.sheets_loaded, stats.rows_inserted
        );
        Ok(stats)
    }

    /// Compare the store against every selected sheet of the workbook at
    /// `request.book_path`.
    pub fn compare(&mut self, request: &CompareRequest) -> CompareOutcome {
        let mut book = match XlsxBook::open(&request.book_path) {
            Ok(book) => book,
            Err(e) => return CompareOutcome::failed(e),
        };
        let mut outcome = self.compare_book(&mut book, request);

        if request.dump_csv {
            if let Err(e) = export_book_csv(&request.book_path) {
                outcome.push(e);
            }
        }
        outcome
    }

    /// Compare the store against the selected sheets of an opened workbook.
    ///
    /// Every sheet is visited; each failing sheet contributes one error. The
    /// transaction is always rolled back, which also drops the shadow tables.
    pub fn compare_book(&mut self, book: &mut dyn Workbook, request: &CompareRequest) -> CompareOutcome {
        let filter = request.filter();
        let mut outcome = CompareOutcome::new();

        let mut tx = match self.conn.transaction() {
            Ok(tx) => tx,
            Err(e) => return CompareOutcome::failed(Error::store("start transaction")(e)),
        };

        for sheet in book.sheet_names() {
            if !filter.selects(&sheet) {
                debug!("Skipping sheet {}", sheet);
                continue;
            }
            if is_cancelled(request.cancel.as_ref()) {
                warn!("Compare cancelled before sheet {}", sheet);
                outcome.push(Error::Cancelled { sheet });
                break;
            }

            let result = SheetComparer::new(&tx, &request.ignore_columns).compare_sheet(book, &sheet);
            let Err(e) = result else {
                continue;
            };

            let restart = e.aborts_transaction();
            warn!("{}", e);
            outcome.push(e);

            if restart {
                // A failed statement leaves the transaction unusable
                if let Err(e) = tx.rollback() {
                    outcome.push(Error::store("rollback")(e));
                    return outcome;
                }
                tx = match self.conn.transaction() {
                    Ok(tx) => tx,
                    Err(e) => {
                        outcome.push(Error::store("restart transaction")(e));
                        return outcome;
                    }
                };
            }
        }

        drop(tx);
        outcome
    }
}
