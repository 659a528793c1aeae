//! Hotspot triage against the ledger.

use tracing::{debug, warn};

use super::entry::{LedgerEntry, TaskStatus};
use super::store::{Ledger, LedgerError};

/// What to do with a hotspot given its ledger history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Never triaged (or triage left no verdict).
    New,
    /// Marked fixed, yet detected again.
    Fixed(LedgerEntry),
    /// Marked already fixed, yet detected again.
    AlreadyFixed(LedgerEntry),
    /// Reviewers gave up on it.
    TooHard(LedgerEntry),
    /// Reviewers judged it a false positive.
    NotAnIssue(LedgerEntry),
}

impl Disposition {
    /// Whether a record should be emitted for the hotspot.
    pub fn should_emit(&self) -> bool {
        !matches!(self, Disposition::TooHard(_) | Disposition::NotAnIssue(_))
    }

    /// Whether the hotspot was previously reported as fixed.
    pub fn is_rediscovered(&self) -> bool {
        matches!(self, Disposition::Fixed(_) | Disposition::AlreadyFixed(_))
    }
}

/// Classifies hotspot identifiers against an optional ledger.
///
/// Without a ledger every hotspot is [`Disposition::New`].
pub struct Deduplicator<L: Ledger> {
    ledger: Option<L>,
}

impl<L: Ledger> Deduplicator<L> {
    pub fn new(ledger: L) -> Self {
        Self {
            ledger: Some(ledger),
        }
    }

    pub fn disabled() -> Self {
        Self { ledger: None }
    }

    /// Looks up `id` and logs rediscovered fixed tasks.
    pub fn classify(&self, id: &str) -> Result<Disposition, LedgerError> {
        let Some(ledger) = &self.ledger else {
            return Ok(Disposition::New);
        };
        let Some(entry) = ledger.lookup(id)? else {
            return Ok(Disposition::New);
        };
        debug!(id, status = %entry.status, url = entry.task_url(), "Ledger entry");

        let disposition = match entry.status {
            TaskStatus::Fixed => Disposition::Fixed(entry),
            TaskStatus::AlreadyFixed => Disposition::AlreadyFixed(entry),
            TaskStatus::TooHard => Disposition::TooHard(entry),
            TaskStatus::NotAnIssue => Disposition::NotAnIssue(entry),
            TaskStatus::Unset => Disposition::New,
            TaskStatus::Unknown => {
                warn!(id, "Unrecognised ledger status, treating hotspot as new");
                Disposition::New
            }
        };

        if let Disposition::Fixed(entry) | Disposition::AlreadyFixed(entry) = &disposition {
            warn!(
                "task marked fixed by {} but still detected: {}/inspect",
                entry.mapper,
                entry.task_url()
            );
        }

        Ok(disposition)
    }
}
