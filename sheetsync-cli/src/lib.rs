//! Library half of the `sheetsync` binary.
//!
//! Loads configuration, reads a batch from a CSV or JSON export and hands it
//! to the engine, which coerces it against the target table.

mod config;
mod input;

pub use config::CliConfig;
pub use input::{read_csv, read_json, read_rows, InputFormat};

use anyhow::{Context, Result};
use sheetsync_engine::{SyncConfig, TableSync, WriteOutcome, WritePlan};
use sheetsync_storage::SqliteStore;
use std::path::PathBuf;
use tracing::info;

/// One fully resolved run of the tool.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub database: PathBuf,
    pub config: SyncConfig,
    pub input: PathBuf,
    pub format: Option<InputFormat>,
    pub dry_run: bool,
}

/// Reads the input, writes (or plans) it, and returns a summary line.
pub fn execute(invocation: &Invocation) -> Result<String> {
    let rows = read_rows(&invocation.input, invocation.format)?;
    info!("read {} rows from {}", rows.len(), invocation.input.display());

    let store = SqliteStore::open_existing(&invocation.database)
        .with_context(|| format!("Failed to open database {}", invocation.database.display()))?;

    let mut sync = TableSync::new(store);
    if invocation.dry_run {
        let plan = sync.plan(rows, &invocation.config)?;
        return Ok(describe_plan(&invocation.config.table, &plan));
    }
    let outcome = sync.write(rows, &invocation.config)?;
    Ok(describe_outcome(&invocation.config.table, &outcome))
}

/// One-line summary of a finished write.
pub fn describe_outcome(table: &str, outcome: &WriteOutcome) -> String {
    match outcome {
        WriteOutcome::NoOp => format!("{table}: no rows received, nothing written"),
        WriteOutcome::Replaced { deleted, inserted } => {
            format!("{table}: replaced contents ({deleted} deleted, {inserted} inserted)")
        }
        WriteOutcome::Reconciled {
            deleted,
            updated,
            inserted,
        } => format!("{table}: {deleted} deleted, {updated} updated, {inserted} inserted"),
    }
}

/// One-line summary of a dry run.
pub fn describe_plan(table: &str, plan: &WritePlan) -> String {
    match plan {
        WritePlan::NoOp => format!("{table}: no rows received, nothing to do"),
        WritePlan::Replace { rows } => {
            format!("{table}: would delete all rows and insert {}", rows.len())
        }
        WritePlan::Reconcile(plan) => format!(
            "{table}: would delete {}, update {}, insert {}",
            plan.to_delete.len(),
            plan.to_update.len(),
            plan.to_insert.len()
        ),
    }
}
