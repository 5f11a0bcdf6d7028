//! sheetsync: make a SQLite table match a spreadsheet export.
//!
//! Usage:
//!   sheetsync --database app.db --table people --pk id people.csv
//!
//! With `--pk`, rows are matched by key: missing rows are deleted, known
//! rows updated and new rows inserted. Without it the table's contents are
//! replaced. Either way the change is a single transaction.

use anyhow::Result;
use clap::Parser;
use sheetsync_cli::{execute, CliConfig, InputFormat, Invocation};
use sheetsync_engine::SnapshotMode;
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "sheetsync")]
#[command(about = "Sync spreadsheet rows into a SQLite table")]
struct Args {
    /// CSV or JSON file holding the rows to write
    input: PathBuf,

    /// SQLite database file
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Target table
    #[arg(short, long)]
    table: Option<String>,

    /// Primary-key column; omit to replace the table's contents
    #[arg(long)]
    pk: Option<String>,

    /// Tolerate table columns that are missing from the input
    #[arg(long)]
    no_exact_match: bool,

    /// Read existing keys inside the write transaction
    #[arg(long)]
    in_transaction_snapshot: bool,

    /// JSON config file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input format (defaults to the file extension)
    #[arg(long, value_enum)]
    format: Option<InputFormat>,

    /// Show what would change without writing
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    let file_config = match &args.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    let overrides = CliConfig {
        database: args.database,
        table: args.table,
        primary_key: args.pk,
        exact_match: args.no_exact_match.then_some(false),
        snapshot: args
            .in_transaction_snapshot
            .then_some(SnapshotMode::InTransaction),
    };
    let (database, config) = file_config.merge(overrides).resolve()?;
    debug!("resolved config: {:?}", config);

    let invocation = Invocation {
        database,
        config,
        input: args.input,
        format: args.format,
        dry_run: args.dry_run,
    };
    println!("{}", execute(&invocation)?);
    Ok(())
}
