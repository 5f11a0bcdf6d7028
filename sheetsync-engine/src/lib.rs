//! Batch-to-table reconciliation engine for sheetsync.
//!
//! Makes a relational table match a batch of incoming rows (typically the
//! rows of an imported sheet) with the fewest statements, inside a single
//! transaction.
//!
//! ## Components
//!
//! - **Validator**: checks the batch's columns against the table's schema
//! - **Identity**: resolves the configured primary key against the table
//! - **Planner**: partitions the batch into updates and inserts and finds
//!   the persisted identities to delete
//! - **Executor**: applies delete, update, insert (or delete-all, insert)
//!   inside one transaction
//!
//! ## Write Process
//!
//! 1. **Short-circuit**: an empty batch returns without touching the store
//! 2. **Schema**: fetch the table's columns
//! 3. **Key**: resolve the primary key and check every row carries one
//! 4. **Validate**: compare columns under the exact-match policy
//! 5. **Plan**: read the identity snapshot and partition the batch
//! 6. **Apply**: run the phases in one transaction, commit or roll back
//!
//! # Example
//!
//! ```
//! use sheetsync_engine::{SyncConfig, TableSync, WriteOutcome};
//! use sheetsync_storage::SqliteStore;
//! use sheetsync_types::Row;
//!
//! let store = SqliteStore::open_in_memory().unwrap();
//! store
//!     .connection()
//!     .execute_batch("CREATE TABLE people (id INTEGER PRIMARY KEY, name TEXT)")
//!     .unwrap();
//!
//! let mut sync = TableSync::new(store);
//! let config = SyncConfig::new("people").with_primary_key("id");
//! let rows = vec![Row::new().with("id", 1).with("name", "Ada")];
//!
//! let outcome = sync.write(rows, &config).unwrap();
//! assert_eq!(
//!     outcome,
//!     WriteOutcome::Reconciled { deleted: 0, updated: 0, inserted: 1 }
//! );
//! ```

mod config;
mod engine;
mod error;
pub mod executor;
pub mod identity;
pub mod planner;
pub mod validator;

pub use config::{SnapshotMode, SyncConfig};
pub use engine::{write, TableSync, WritePlan};
pub use error::{Phase, WriteError, WriteResult};
pub use executor::WriteOutcome;
pub use identity::KeyColumn;
pub use planner::ReconciliationPlan;
