//! INI configuration file.
//!
//! ```ini
//! [heatmap]
//! url = https://strava-heatmap.tiles.freemap.sk
//! cache_dir = /var/cache/strava
//!
//! [overpass]
//! url = https://overpass-api.de/api/interpreter
//! retries = 10
//! retry_delay_secs = 5
//!
//! [http]
//! timeout_secs = 30
//!
//! [scan]
//! threshold = 100
//! distance = 35
//! min_size = 20
//! zoom = 15
//! activity = run
//! ```
//!
//! Every key is optional.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use ini::Ini;
use thiserror::Error;

use super::{ScanConfig, ServiceConfig};

/// Configuration errors. All of them are fatal before any I/O happens.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read or parsed.
    #[error("failed to read config file {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    /// A key holds a value of the wrong type.
    #[error("invalid value '{value}' for [{section}] {key}: {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Inconsistent or missing run parameters.
    #[error("{0}")]
    Invalid(String),
}

/// Default location: `<config dir>/trailgap/config.ini`.
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("trailgap").join("config.ini"))
}

/// Settings loaded from a configuration file, falling back to defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub scan: ScanConfig,
    pub service: ServiceConfig,
}

impl ConfigFile {
    /// Loads the file at the default location, or defaults if absent.
    pub fn load() -> Result<Self, ConfigError> {
        match config_file_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Loads `path`, or defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_ini(&ini)
    }

    /// Parses configuration text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(text).map_err(|e| ConfigError::Read {
            path: PathBuf::from("<string>"),
            reason: e.to_string(),
        })?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let service = &mut config.service;
        let scan = &mut config.scan;

        if let Some(url) = get_str(ini, "heatmap", "url") {
            service.heatmap_url = url.to_string();
        }
        if let Some(dir) = get_str(ini, "heatmap", "cache_dir") {
            service.cache_dir = PathBuf::from(dir);
        }
        if let Some(url) = get_str(ini, "overpass", "url") {
            service.overpass_url = url.to_string();
        }
        if let Some(retries) = get_parsed::<u32>(ini, "overpass", "retries")? {
            service.overpass_attempts = retries;
        }
        if let Some(secs) = get_parsed::<u64>(ini, "overpass", "retry_delay_secs")? {
            service.overpass_retry_delay = Duration::from_secs(secs);
        }
        if let Some(secs) = get_parsed::<u64>(ini, "http", "timeout_secs")? {
            service.http_timeout = Duration::from_secs(secs);
        }

        if let Some(threshold) = get_parsed::<u8>(ini, "scan", "threshold")? {
            scan.threshold = threshold;
        }
        if let Some(distance) = get_parsed::<f64>(ini, "scan", "distance")? {
            scan.distance = distance;
        }
        if let Some(min_size) = get_parsed::<usize>(ini, "scan", "min_size")? {
            scan.min_size = min_size;
        }
        if let Some(zoom) = get_parsed::<u8>(ini, "scan", "zoom")? {
            scan.zoom = zoom;
        }
        if let Some(activity) = get_str(ini, "scan", "activity") {
            scan.activity = activity.to_string();
        }

        Ok(config)
    }
}

fn get_str<'a>(ini: &'a Ini, section: &str, key: &str) -> Option<&'a str> {
    ini.section(Some(section))
        .and_then(|props| props.get(key))
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn get_parsed<T>(ini: &Ini, section: &str, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_str(ini, section, key)
        .map(|value| {
            value.parse::<T>().map_err(|e| ConfigError::InvalidValue {
                section: section.to_string(),
                key: key.to_string(),
                value: value.to_string(),
                reason: e.to_string(),
            })
        })
        .transpose()
}
