//! Run configuration.
//!
//! - [`ScanConfig`]: detection parameters, immutable for a whole run and
//!   passed explicitly to every stage
//! - [`ServiceConfig`]: endpoints, cache location and network behaviour
//! - [`ConfigFile`]: optional `config.ini` supplying defaults for both
//!
//! Precedence is CLI argument, then config file, then built-in default.

mod file;
mod scan;
mod service;

pub use file::{config_file_path, ConfigError, ConfigFile};
pub use scan::ScanConfig;
pub use service::ServiceConfig;
