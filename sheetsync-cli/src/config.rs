//! File-based configuration, merged with command-line overrides.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use sheetsync_engine::{SnapshotMode, SyncConfig};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings read from a JSON config file. Every field is optional so flags
/// can fill in or override any of them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub database: Option<PathBuf>,
    pub table: Option<String>,
    #[serde(alias = "pk")]
    pub primary_key: Option<String>,
    pub exact_match: Option<bool>,
    pub snapshot: Option<SnapshotMode>,
}

impl CliConfig {
    /// Loads a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Returns `self` with every field set in `overrides` replaced.
    #[must_use]
    pub fn merge(self, overrides: CliConfig) -> CliConfig {
        CliConfig {
            database: overrides.database.or(self.database),
            table: overrides.table.or(self.table),
            primary_key: overrides.primary_key.or(self.primary_key),
            exact_match: overrides.exact_match.or(self.exact_match),
            snapshot: overrides.snapshot.or(self.snapshot),
        }
    }

    /// Splits into the database path and the engine config.
    pub fn resolve(self) -> Result<(PathBuf, SyncConfig)> {
        let Some(database) = self.database else {
            bail!("no database given (use --database or set \"database\" in the config file)");
        };
        let Some(table) = self.table else {
            bail!("no table given (use --table or set \"table\" in the config file)");
        };

        let mut config = SyncConfig::new(&table);
        config.primary_key = self.primary_key;
        if let Some(exact_match) = self.exact_match {
            config.exact_match = exact_match;
        }
        if let Some(snapshot) = self.snapshot {
            config.snapshot = snapshot;
        }
        Ok((database, config))
    }
}
