//! Spreadsheet-driven fixtures for database integration tests.
//!
//! A fixture workbook holds one table per sheet. [`FixtureEngine::load`]
//! replaces the contents of every named table in one transaction, and
//! [`FixtureEngine::compare`] checks the tables against expected sheets,
//! reporting one error per differing sheet.
//!
//! ```ignore
//! use sheet_fixture::{CompareRequest, FixtureEngine, LoadRequest};
//!
//! let mut engine = FixtureEngine::open("app.duckdb")?;
//! engine.load(&LoadRequest::new("testdata/input.xlsx"))?;
//! // ... run the code under test ...
//! let outcome = engine.compare(&CompareRequest::new("testdata/want.xlsx"));
//! assert!(outcome.equal, "{}", outcome.message());
//! ```

pub mod compare;
pub mod config;
pub mod dump;
pub mod engine;
pub mod error;
pub mod export;
pub mod loader;
pub mod request;
pub mod schema;
pub mod sheet;
pub mod statement;
pub mod table;

pub use compare::{CompareOutcome, CompareReport, SheetComparer};
pub use config::FixtureYamlConfig;
pub use dump::{dump_template, DumpRequest, DumpStats};
pub use engine::{FixtureEngine, LoadStats, MEMORY_SOURCE};
pub use error::{Error, LayoutError, Result, SchemaError};
pub use export::export_book_csv;
pub use loader::{load_raw, LoadRawRequest, SheetLoader};
pub use request::{CancelToken, CompareRequest, LoadRequest, SheetFilter};
pub use sheet::{MemoryBook, Workbook, XlsxBook};
pub use table::{DefaultColumn, FixtureTable};
