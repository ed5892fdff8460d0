//! Load command: fixture workbook into the database.

use anyhow::{Context, Result};
use clap::Args;
use log::info;
use sheet_fixture::{FixtureEngine, FixtureYamlConfig, LoadRequest};
use std::path::PathBuf;

/// Load fixture sheets into their tables, all or nothing
#[derive(Args, Debug)]
#[command(after_help = "Examples:
  sheet-fixture -c app.duckdb load fixtures/company.xlsx
  sheet-fixture -c app.duckdb load book.xlsx --prefix t_ --ignore-sheet README
  sheet-fixture -c app.duckdb load book.xlsx --auto-complete-not-null --dump-csv")]
pub struct LoadArgs {
    /// Fixture workbook (.xlsx)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Only load sheets whose name starts with this prefix
    #[arg(long)]
    pub prefix: Option<String>,

    /// Sheets to skip (comma-separated)
    #[arg(long, value_name = "SHEETS", value_delimiter = ',')]
    pub ignore_sheet: Vec<String>,

    /// Fill not-null columns the sheet omits with a type default
    #[arg(long)]
    pub auto_complete_not_null: bool,

    /// Write every sheet as CSV into <book dir>/csv after loading
    #[arg(long)]
    pub dump_csv: bool,

    /// YAML request file with defaults for the options above
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output statistics as JSON
    #[arg(long)]
    pub json: bool,
}

impl LoadArgs {
    fn to_request(&self) -> Result<LoadRequest> {
        let mut request = LoadRequest {
            sheet_prefix: self.prefix.clone().unwrap_or_default(),
            ignore_sheets: self.ignore_sheet.clone(),
            auto_complete_not_null: self.auto_complete_not_null,
            dump_csv: self.dump_csv,
            ..LoadRequest::new(&self.file)
        };
        if let Some(path) = &self.config {
            let config = FixtureYamlConfig::load(path)
                .with_context(|| format!("Loading config {}", path.display()))?;
            config.apply_to_load(&mut request);
        }
        Ok(request)
    }
}

pub fn run(source: &str, args: LoadArgs) -> Result<()> {
    let request = args.to_request()?;
    let mut engine = FixtureEngine::open(source)?;

    info!("Loading {} into {}", args.file.display(), source);
    let stats = engine
        .load(&request)
        .with_context(|| format!("load {}", args.file.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print!("{}", stats);
    }
    Ok(())
}
