//! Load and compare requests.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Which sheets of a workbook take part in a request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetFilter {
    /// Only sheets whose name starts with this prefix are used
    pub prefix: String,
    /// Sheets skipped by exact name
    pub ignore: Vec<String>,
}

impl SheetFilter {
    pub fn new(prefix: impl Into<String>, ignore: Vec<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ignore,
        }
    }

    pub fn selects(&self, sheet: &str) -> bool {
        !self.ignore.iter().any(|s| s == sheet) && sheet.starts_with(&self.prefix)
    }
}

/// Cooperative cancellation flag shared between a caller and a running request.
///
/// The flag is only looked at between sheets.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Configuration for loading a fixture workbook
#[derive(Debug, Clone, Default)]
pub struct LoadRequest {
    /// Workbook to load
    pub book_path: PathBuf,
    pub sheet_prefix: String,
    pub ignore_sheets: Vec<String>,
    /// Fill not-null columns the sheet omits with a type default
    pub auto_complete_not_null: bool,
    /// Write every sheet as CSV next to the workbook after commit
    pub dump_csv: bool,
    pub cancel: Option<CancelToken>,
}

impl LoadRequest {
    pub fn new(book_path: impl Into<PathBuf>) -> Self {
        Self {
            book_path: book_path.into(),
            ..Default::default()
        }
    }

    pub fn filter(&self) -> SheetFilter {
        SheetFilter::new(self.sheet_prefix.clone(), self.ignore_sheets.clone())
    }
}

/// Configuration for comparing tables against a fixture workbook
#[derive(Debug, Clone, Default)]
pub struct CompareRequest {
    /// Workbook holding the expected contents
    pub book_path: PathBuf,
    pub sheet_prefix: String,
    pub ignore_sheets: Vec<String>,
    /// Columns left out of both sides of every comparison
    pub ignore_columns: Vec<String>,
    /// Write every sheet as CSV next to the workbook after comparing
    pub dump_csv: bool,
    pub cancel: Option<CancelToken>,
}

impl CompareRequest {
    pub fn new(book_path: impl Into<PathBuf>) -> Self {
        Self {
            book_path: book_path.into(),
            ..Default::default()
        }
    }

    pub fn filter(&self) -> SheetFilter {
        SheetFilter::new(self.sheet_prefix.clone(), self.ignore_sheets.clone())
    }
}

pub(crate) fn is_cancelled(token: Option<&CancelToken>) -> bool {
    token.is_some_and(CancelToken::is_cancelled)
}
