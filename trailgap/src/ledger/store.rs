//! Ledger stores.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags, OptionalExtension};
use thiserror::Error;

use super::entry::{LedgerEntry, TaskStatus};

const LOOKUP_SQL: &str = "SELECT TaskStatus, Mapper, TaskLink FROM tasks WHERE TaskName = ?1";

/// Errors from a ledger store.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The ledger could not be opened or lacks the `tasks` table.
    #[error("failed to open ledger {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// A lookup failed.
    #[error("ledger lookup for {id} failed: {source}")]
    Query {
        id: String,
        #[source]
        source: rusqlite::Error,
    },
}

/// Read-only status lookup by hotspot identifier.
pub trait Ledger {
    /// Returns the entry for `id`, or `None` if the hotspot was never triaged.
    fn lookup(&self, id: &str) -> Result<Option<LedgerEntry>, LedgerError>;
}

/// SQLite ledger with a `tasks(TaskName, TaskStatus, Mapper, TaskLink)` table.
///
/// The database is opened read-only.
pub struct SqliteLedger {
    conn: Connection,
}

impl SqliteLedger {
    pub fn open(path: &Path) -> Result<Self, LedgerError> {
        let open_err = |source| LedgerError::Open {
            path: path.to_path_buf(),
            source,
        };
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(open_err)?;

        // Fail now rather than on the first hotspot if the schema is wrong.
        conn.prepare_cached(LOOKUP_SQL).map_err(open_err)?;

        Ok(Self { conn })
    }
}

impl Ledger for SqliteLedger {
    fn lookup(&self, id: &str) -> Result<Option<LedgerEntry>, LedgerError> {
        let query_err = |source| LedgerError::Query {
            id: id.to_string(),
            source,
        };
        let mut stmt = self.conn.prepare_cached(LOOKUP_SQL).map_err(query_err)?;
        let row = stmt
            .query_row([id], |row| {
                Ok((
                    row.get::<_, Option<String>>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, Option<String>>(2)?,
                ))
            })
            .optional()
            .map_err(query_err)?;

        Ok(row.map(|(status, mapper, link)| {
            let status = status
                .as_deref()
                .unwrap_or_default()
                .parse()
                .unwrap_or(TaskStatus::Unknown);
            LedgerEntry::new(id, status, mapper.unwrap_or_default(), link.unwrap_or_default())
        }))
    }
}

/// In-memory ledger.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    entries: HashMap<String, LedgerEntry>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: LedgerEntry) {
        self.entries.insert(entry.name.clone(), entry);
    }

    pub fn with_entry(mut self, entry: LedgerEntry) -> Self {
        self.insert(entry);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<LedgerEntry> for MemoryLedger {
    fn from_iter<I: IntoIterator<Item = LedgerEntry>>(iter: I) -> Self {
        let mut ledger = Self::new();
        for entry in iter {
            ledger.insert(entry);
        }
        ledger
    }
}

impl Ledger for MemoryLedger {
    fn lookup(&self, id: &str) -> Result<Option<LedgerEntry>, LedgerError> {
        Ok(self.entries.get(id).cloned())
    }
}
