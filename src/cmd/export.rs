//! CSV export command.

use anyhow::{Context, Result};
use clap::Args;
use sheet_fixture::export_book_csv;
use std::path::PathBuf;

/// Write every fixture sheet of a workbook into <book dir>/csv
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Fixture workbook (.xlsx)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

pub fn run(args: ExportArgs) -> Result<()> {
    let written = export_book_csv(&args.file)
        .with_context(|| format!("export {}", args.file.display()))?;
    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}
