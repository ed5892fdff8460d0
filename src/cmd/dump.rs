//! Dump command: template workbook from database tables.

use anyhow::{Context, Result};
use clap::Args;
use sheet_fixture::{dump_template, DumpRequest, FixtureEngine};
use std::path::PathBuf;

/// Write a fixture template workbook, one sheet per table
#[derive(Args, Debug)]
#[command(after_help = "Examples:
  sheet-fixture -c app.duckdb dump template.xlsx
  sheet-fixture -c app.duckdb dump company.xlsx --tables company,employee --max-rows 100")]
pub struct DumpArgs {
    /// Workbook to write (.xlsx)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Only dump these tables (comma-separated)
    #[arg(long, value_name = "TABLES", value_delimiter = ',')]
    pub tables: Vec<String>,

    /// Maximum rows copied per table
    #[arg(long, default_value_t = 1000)]
    pub max_rows: usize,
}

pub fn run(source: &str, args: DumpArgs) -> Result<()> {
    let engine = FixtureEngine::open(source)?;
    let request = DumpRequest {
        output: args.file.clone(),
        tables: args.tables,
        max_rows: args.max_rows,
    };

    let stats = dump_template(engine.connection(), &request)
        .with_context(|| format!("dump {}", args.file.display()))?;

    println!(
        "Wrote {} sheet(s), {} row(s) to {}",
        stats.sheets.len(),
        stats.total_rows(),
        args.file.display()
    );
    Ok(())
}
