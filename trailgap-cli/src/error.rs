//! CLI error type.

use std::fmt;

use trailgap::area::AreaError;
use trailgap::config::ConfigError;
use trailgap::ledger::LedgerError;
use trailgap::logging::LoggingError;
use trailgap::provider::ProviderError;
use trailgap::ScanError;

/// Errors that end the program.
#[derive(Debug)]
pub enum CliError {
    /// Missing or contradictory arguments.
    Usage(String),
    /// Configuration file problems.
    Config(String),
    /// Logging could not be initialized.
    Logging(String),
    /// The area file could not be loaded.
    Area(String),
    /// The ledger could not be opened.
    Ledger(String),
    /// The output file could not be created.
    Output(String),
    /// The HTTP client could not be built.
    Http(String),
    /// The scan itself failed.
    Scan(ScanError),
}

impl CliError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Logging(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Area(msg) => write!(f, "Area of interest: {}", msg),
            CliError::Ledger(msg) => write!(f, "Tasks database: {}", msg),
            CliError::Output(msg) => write!(f, "Output: {}", msg),
            CliError::Http(msg) => write!(f, "HTTP client: {}", msg),
            CliError::Scan(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e.to_string())
    }
}

impl From<AreaError> for CliError {
    fn from(e: AreaError) -> Self {
        CliError::Area(e.to_string())
    }
}

impl From<LedgerError> for CliError {
    fn from(e: LedgerError) -> Self {
        CliError::Ledger(e.to_string())
    }
}

impl From<ProviderError> for CliError {
    fn from(e: ProviderError) -> Self {
        CliError::Http(e.to_string())
    }
}

impl From<ScanError> for CliError {
    fn from(e: ScanError) -> Self {
        CliError::Scan(e)
    }
}
