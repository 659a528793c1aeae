//! Ledger entries.

use std::fmt;
use std::str::FromStr;

/// Disposition a reviewer assigned to a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    Unset,
    Fixed,
    AlreadyFixed,
    TooHard,
    NotAnIssue,
    /// A status string this tool does not know.
    Unknown,
}

impl TaskStatus {
    /// The status as stored in the ledger.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Unset => "Unset",
            TaskStatus::Fixed => "Fixed",
            TaskStatus::AlreadyFixed => "Already_Fixed",
            TaskStatus::TooHard => "Too_Hard",
            TaskStatus::NotAnIssue => "Not_an_Issue",
            TaskStatus::Unknown => "Unknown",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "" | "Unset" => TaskStatus::Unset,
            "Fixed" => TaskStatus::Fixed,
            "Already_Fixed" => TaskStatus::AlreadyFixed,
            "Too_Hard" => TaskStatus::TooHard,
            "Not_an_Issue" => TaskStatus::NotAnIssue,
            _ => TaskStatus::Unknown,
        })
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One triaged task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    /// Hotspot identifier `zoom/x/y/row/col`.
    pub name: String,
    pub status: TaskStatus,
    /// Who closed the task.
    pub mapper: String,
    /// Raw link column; may be a spreadsheet `HYPERLINK` formula.
    pub link: String,
}

impl LedgerEntry {
    pub fn new(
        name: impl Into<String>,
        status: TaskStatus,
        mapper: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            status,
            mapper: mapper.into(),
            link: link.into(),
        }
    }

    /// The bare task URL, unwrapped from a `=HYPERLINK("...")` formula if
    /// needed. Empty when the link holds no URL.
    pub fn task_url(&self) -> &str {
        let Some(start) = self.link.find("http") else {
            return "";
        };
        let rest = &self.link[start..];
        let end = rest
            .find(|c: char| c == '"' || c == ',' || c == ')' || c.is_whitespace())
            .unwrap_or(rest.len());
        rest[..end].trim_end_matches('/')
    }
}
