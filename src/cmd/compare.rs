//! Compare command: database tables against expected sheets.

use anyhow::{bail, Context, Result};
use clap::Args;
use log::info;
use sheet_fixture::{CompareRequest, FixtureEngine, FixtureYamlConfig};
use std::path::PathBuf;

/// Compare tables with the expected contents of a fixture workbook
#[derive(Args, Debug)]
#[command(after_help = "Examples:
  sheet-fixture -c app.duckdb compare expected/company.xlsx
  sheet-fixture -c app.duckdb compare book.xlsx --ignore-column created_at,updated_at
  sheet-fixture -c app.duckdb compare book.xlsx --json")]
pub struct CompareArgs {
    /// Workbook with the expected contents (.xlsx)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Only compare sheets whose name starts with this prefix
    #[arg(long)]
    pub prefix: Option<String>,

    /// Sheets to skip (comma-separated)
    #[arg(long, value_name = "SHEETS", value_delimiter = ',')]
    pub ignore_sheet: Vec<String>,

    /// Columns left out of the comparison (comma-separated)
    #[arg(long, value_name = "COLUMNS", value_delimiter = ',')]
    pub ignore_column: Vec<String>,

    /// Write every sheet as CSV into <book dir>/csv after comparing
    #[arg(long)]
    pub dump_csv: bool,

    /// YAML request file with defaults for the options above
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl CompareArgs {
    fn to_request(&self) -> Result<CompareRequest> {
        let mut request = CompareRequest {
            sheet_prefix: self.prefix.clone().unwrap_or_default(),
            ignore_sheets: self.ignore_sheet.clone(),
            ignore_columns: self.ignore_column.clone(),
            dump_csv: self.dump_csv,
            ..CompareRequest::new(&self.file)
        };
        if let Some(path) = &self.config {
            let config = FixtureYamlConfig::load(path)
                .with_context(|| format!("Loading config {}", path.display()))?;
            config.apply_to_compare(&mut request);
        }
        Ok(request)
    }
}

pub fn run(source: &str, args: CompareArgs) -> Result<()> {
    let request = args.to_request()?;
    let mut engine = FixtureEngine::open(source)?;

    info!("Comparing {} with {}", source, args.file.display());
    let outcome = engine.compare(&request);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome.report())?);
        if !outcome.equal {
            bail!("{} sheet(s) failed", outcome.errors.len());
        }
        return Ok(());
    }

    if !outcome.equal {
        bail!("{}", outcome.message());
    }
    println!("All sheets match");
    Ok(())
}
