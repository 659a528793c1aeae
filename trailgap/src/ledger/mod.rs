//! Ledger of previously triaged hotspots.
//!
//! Reviewers record a disposition for every task they close. Before a
//! hotspot is emitted its identifier is looked up here: tasks judged too
//! hard or not an issue are dropped, tasks marked fixed are emitted again
//! with a warning since the activity is evidently still unmapped.

mod dedup;
mod entry;
mod store;

pub use dedup::{Deduplicator, Disposition};
pub use entry::{LedgerEntry, TaskStatus};
pub use store::{Ledger, LedgerError, MemoryLedger, SqliteLedger};
