//! Fatal run errors.

use thiserror::Error;

use crate::area::AreaError;
use crate::config::ConfigError;
use crate::ledger::LedgerError;
use crate::osm::OverpassError;
use crate::output::OutputError;

/// Errors that abort a scan.
///
/// Tile-level problems (network failures, missing or corrupt tiles) are not
/// errors: they are logged and counted in [`ScanStats`](crate::scan::ScanStats).
#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Area(#[from] AreaError),

    /// Without features the suppression of a tile cannot be trusted.
    #[error(transparent)]
    Overpass(#[from] OverpassError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Output(#[from] OutputError),
}
