mod compare;
mod dump;
mod export;
mod load;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;

pub use compare::CompareArgs;
pub use dump::DumpArgs;
pub use export::ExportArgs;
pub use load::LoadArgs;

#[derive(Parser)]
#[command(name = "sheet-fixture")]
#[command(version)]
#[command(about = "Load spreadsheet fixtures into database tables and compare tables against them", long_about = None)]
pub struct Cli {
    /// Database to connect to: a DuckDB file, or :memory:
    #[arg(
        short = 'c',
        long,
        global = true,
        env = "SHEET_FIXTURE_CONNECTION",
        default_value = ":memory:"
    )]
    pub source: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load every fixture sheet of a workbook in one transaction
    Load(LoadArgs),

    /// Compare tables against the expected sheets of a workbook
    Compare(CompareArgs),

    /// Write a fixture template workbook from the tables of the database
    Dump(DumpArgs),

    /// Write every fixture sheet of a workbook as CSV
    ExportCsv(ExportArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Load(args) => load::run(&cli.source, args),
        Commands::Compare(args) => compare::run(&cli.source, args),
        Commands::Dump(args) => dump::run(&cli.source, args),
        Commands::ExportCsv(args) => export::run(args),
        Commands::Completions { shell } => {
            generate(
                shell,
                &mut Cli::command(),
                "sheet-fixture",
                &mut io::stdout(),
            );
            Ok(())
        }
    }
}
