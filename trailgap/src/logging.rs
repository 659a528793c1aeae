//! Logging setup.
//!
//! Events go to stderr so stdout stays free for records. `RUST_LOG`, when
//! set, replaces the level chosen on the command line.

use std::path::Path;

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Errors initializing logging.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log file path {0}")]
    InvalidPath(String),

    #[error("failed to create log file: {0}")]
    File(String),

    #[error("failed to install subscriber: {0}")]
    Init(String),
}

/// Verbosity selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Errors only.
    Quiet,
    /// Warnings and errors.
    #[default]
    Normal,
    /// Progress information.
    Verbose,
    /// Everything, including per-tile diagnostics.
    Debug,
}

impl LogLevel {
    /// Resolves command-line toggles; debug wins over verbose, which wins
    /// over quiet.
    pub fn from_flags(quiet: bool, verbose: bool, debug: bool) -> Self {
        if debug {
            LogLevel::Debug
        } else if verbose {
            LogLevel::Verbose
        } else if quiet {
            LogLevel::Quiet
        } else {
            LogLevel::Normal
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Quiet => "error",
            LogLevel::Normal => "warn",
            LogLevel::Verbose => "info",
            LogLevel::Debug => "debug",
        }
    }

    /// Filter directive: this crate at the chosen level, dependencies at
    /// warn unless the level is lower.
    pub fn directive(&self) -> String {
        match self {
            LogLevel::Quiet => "error".to_string(),
            other => format!("warn,trailgap={}", other.as_str()),
        }
    }
}

/// Installs the global subscriber.
///
/// With `log_file` set, events are also appended to that file through a
/// background writer. The returned guard flushes it on drop and must be
/// kept alive until the program exits.
pub fn init_logging(
    level: LogLevel,
    log_file: Option<&Path>,
) -> Result<Option<WorkerGuard>, LoggingError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.directive()));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let (writer, guard) = tracing_appender::non_blocking(file_appender(path)?);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))?;

    Ok(guard)
}

fn file_appender(path: &Path) -> Result<RollingFileAppender, LoggingError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| LoggingError::InvalidPath(path.display().to_string()))?;
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| LoggingError::File(e.to_string()))?;

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name)
        .build(dir)
        .map_err(|e| LoggingError::File(e.to_string()))
}
