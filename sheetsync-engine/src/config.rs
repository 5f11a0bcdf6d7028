use serde::{Deserialize, Serialize};

/// Where the identity snapshot is read relative to the write transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotMode {
    /// Read before the transaction opens. A concurrent writer can change
    /// the table between the snapshot and the apply.
    #[default]
    Detached,
    /// Read inside the write transaction, which takes the write lock up front.
    InTransaction,
}

/// Configuration for one write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Target table.
    pub table: String,
    /// Identity column. `None` selects the full-replace strategy.
    #[serde(default, alias = "pk")]
    pub primary_key: Option<String>,
    /// Fail when the table declares columns the batch lacks.
    #[serde(default = "default_exact_match")]
    pub exact_match: bool,
    #[serde(default)]
    pub snapshot: SnapshotMode,
}

fn default_exact_match() -> bool {
    true
}

impl SyncConfig {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.into(),
            primary_key: None,
            exact_match: default_exact_match(),
            snapshot: SnapshotMode::default(),
        }
    }

    #[must_use]
    pub fn with_primary_key(mut self, column: &str) -> Self {
        self.primary_key = Some(column.into());
        self
    }

    #[must_use]
    pub fn with_exact_match(mut self, exact_match: bool) -> Self {
        self.exact_match = exact_match;
        self
    }

    #[must_use]
    pub fn with_snapshot(mut self, snapshot: SnapshotMode) -> Self {
        self.snapshot = snapshot;
        self
    }

    /// The configured key, trimmed. Blank keys count as unset.
    #[must_use]
    pub fn primary_key(&self) -> Option<&str> {
        self.primary_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}
