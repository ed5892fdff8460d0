//! CLI for generating fixture workbooks.
//!
//! Usage:
//!   gen-books --rows 1000 --output company.xlsx

use clap::Parser;
use fixture_book_gen::{company_sheet, write_book};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gen-books")]
#[command(about = "Generate fixture workbooks for sheet-fixture", long_about = None)]
struct Args {
    /// Rows in the company sheet
    #[arg(long, default_value = "100")]
    rows: usize,

    /// Output workbook
    #[arg(short, long, default_value = "company.xlsx")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    write_book(&args.output, &[company_sheet(args.rows)])?;
    eprintln!("Wrote {} rows to {}", args.rows, args.output.display());
    Ok(())
}
