//! Error taxonomy for loading and comparing fixtures.
//!
//! - [`LayoutError`]: the sheet does not follow the fixture layout
//! - [`SchemaError`]: store metadata is missing or could not be read
//! - [`Error::Store`]: any statement the store rejected, with the failing step
//! - [`Error::Mismatch`]: expected and actual table contents differ
//!
//! Errors raised while handling one sheet are wrapped in [`Error::Sheet`] so
//! that every reported failure names the sheet it came from.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Malformed sheet structure
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("table name is empty (cell {cell})")]
    EmptyTableName { cell: String },

    #[error("column header row {row} is missing")]
    MissingHeaderRow { row: usize },

    #[error("column '{column}' is defined more than once")]
    DuplicateColumn { column: String },

    #[error("row {row} has {cells} data cell(s) but {columns} column(s) are defined")]
    ShortRow {
        row: usize,
        cells: usize,
        columns: usize,
    },

    #[error("header yielded {header} column(s) but row {row} yielded {data} value(s)")]
    ColumnCountMismatch {
        row: usize,
        header: usize,
        data: usize,
    },
}

/// Store metadata problems
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("table {table} has no primary key")]
    NoPrimaryKey { table: String },

    #[error("table {table} not found")]
    UnknownTable { table: String },

    #[error("introspect table {table}: {source}")]
    Query {
        table: String,
        #[source]
        source: duckdb::Error,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("sheet {sheet}: {source}")]
    Sheet {
        sheet: String,
        #[source]
        source: Box<Error>,
    },

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("{context}: {source}")]
    Store {
        context: String,
        #[source]
        source: duckdb::Error,
    },

    #[error("table({table}) mismatch (-want +got):\n{diff}")]
    Mismatch { table: String, diff: String },

    #[error("workbook {}: {message}", path.display())]
    Workbook { path: PathBuf, message: String },

    #[error("config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("csv export: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("cancelled before sheet {sheet}")]
    Cancelled { sheet: String },
}

impl Error {
    /// Adapter for `map_err` that attaches the failing step to a store error.
    pub(crate) fn store(context: impl Into<String>) -> impl FnOnce(duckdb::Error) -> Error {
        let context = context.into();
        move |source| Error::Store { context, source }
    }

    /// Attribute this error to a sheet. Already-attributed errors are kept as is.
    pub fn in_sheet(self, sheet: &str) -> Error {
        match self {
            Error::Sheet { .. } => self,
            other => Error::Sheet {
                sheet: sheet.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// The sheet this error was attributed to, if any.
    pub fn sheet(&self) -> Option<&str> {
        match self {
            Error::Sheet { sheet, .. } => Some(sheet),
            _ => None,
        }
    }

    /// The underlying error with any sheet attribution removed.
    pub fn root(&self) -> &Error {
        match self {
            Error::Sheet { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether the store rejected a statement, which leaves an open
    /// transaction unusable.
    pub fn aborts_transaction(&self) -> bool {
        matches!(
            self.root(),
            Error::Store { .. } | Error::Schema(SchemaError::Query { .. })
        )
    }

    /// Short classification used in reports.
    pub fn kind(&self) -> &'static str {
        match self.root() {
            Error::Sheet { .. } => "sheet",
            Error::Layout(_) => "layout",
            Error::Schema(_) => "schema",
            Error::Store { .. } => "store",
            Error::Mismatch { .. } => "mismatch",
            Error::Workbook { .. } => "workbook",
            Error::Config { .. } => "config",
            Error::Csv(_) => "csv",
            Error::Io(_) => "io",
            Error::Cancelled { .. } => "cancelled",
        }
    }
}
