//! Trailgap CLI - Command-line interface
//!
//! Scans heatmap tiles for activity that has no matching path in
//! OpenStreetMap and writes one GeoJSON record per candidate.

mod error;
mod progress;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, info};
use trailgap::area::{AreaOfInterest, Partition, TilePlan};
use trailgap::cache::{DiskTileCache, MemoryTileCache, TileCache};
use trailgap::config::{ConfigFile, ScanConfig, ServiceConfig};
use trailgap::coord::TileCoord;
use trailgap::heatmap::HeatmapSource;
use trailgap::ledger::{Deduplicator, SqliteLedger};
use trailgap::logging::{init_logging, LogLevel};
use trailgap::osm::OverpassClient;
use trailgap::output::GeoJsonSeqWriter;
use trailgap::provider::ReqwestClient;
use trailgap::scan::TileScanner;

use error::CliError;
use progress::ColumnProgress;

#[derive(Debug, Parser)]
#[command(name = "trailgap", version, about = "Find heatmap activity missing from OpenStreetMap")]
struct Args {
    /// Area of interest (GeoJSON polygon or multipolygon)
    #[arg(short = 'a', long)]
    area: Option<PathBuf>,

    /// Minimum heatmap intensity of a hotspot (0-255) [default: 100]
    #[arg(short = 'm', long)]
    minlevel: Option<u8>,

    /// Maximum distance in meters between activity and a mapped way [default: 35]
    #[arg(short = 'd', long)]
    distance: Option<f64>,

    /// Minimum size of a hotspot in pixels [default: 20]
    #[arg(short = 's', long)]
    size: Option<usize>,

    /// Heatmap zoom level [default: 15]
    #[arg(short = 'z', long, value_parser = clap::value_parser!(u8).range(0..=20))]
    zoom: Option<u8>,

    /// Heatmap activity (run, ride, all, ...) [default: run]
    #[arg(short = 'c', long)]
    activity: Option<String>,

    /// Tile partition (0-3) for running four processes side by side
    #[arg(short = 'o', long, value_parser = clap::value_parser!(u8).range(0..=3))]
    offset: Option<u8>,

    /// Tasks database of already triaged hotspots
    #[arg(short = 'b', long)]
    tasks_db: Option<PathBuf>,

    /// Output file (default: standard output)
    #[arg(short = 'g', long)]
    geojson: Option<PathBuf>,

    /// Display more information
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Only display errors, no progress
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Heatmap tile x coordinate
    #[arg(short = 'x', long = "x")]
    x: Option<u32>,

    /// Heatmap tile y coordinate
    #[arg(short = 'y', long = "y")]
    y: Option<u32>,

    /// Debug output
    #[arg(long)]
    debug: bool,

    /// Configuration file [default: <config dir>/trailgap/config.ini]
    #[arg(long)]
    config: Option<PathBuf>,

    /// Heatmap tile cache directory
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Keep downloaded tiles in memory only
    #[arg(long, conflicts_with = "cache_dir")]
    no_cache: bool,

    /// Heatmap tile server root URL
    #[arg(long)]
    heatmap_url: Option<String>,

    /// Overpass API endpoint
    #[arg(long)]
    overpass_url: Option<String>,

    /// Also write log events to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Write each tile's suppressed raster to this directory
    #[arg(long)]
    debug_dir: Option<PathBuf>,
}

/// What to scan, validated before any I/O.
#[derive(Debug, Clone, PartialEq)]
enum Target {
    Tile { x: u32, y: u32 },
    Area { path: PathBuf, offset: Option<u8> },
}

impl Args {
    fn target(&self) -> Result<Target, CliError> {
        match (self.x, self.y, &self.area) {
            (Some(x), Some(y), _) => Ok(Target::Tile { x, y }),
            (Some(_), None, _) | (None, Some(_), _) => Err(CliError::Usage(
                "you must provide both x and y tile coordinates".to_string(),
            )),
            (None, None, Some(path)) => Ok(Target::Area {
                path: path.clone(),
                offset: self.offset,
            }),
            (None, None, None) => Err(CliError::Usage(
                "you must provide either an area or tile coordinates".to_string(),
            )),
        }
    }

    fn log_level(&self) -> LogLevel {
        LogLevel::from_flags(self.quiet, self.verbose, self.debug)
    }

    /// Progress is only drawn when records do not go to the terminal and no
    /// log chatter would interleave with it.
    fn show_progress(&self) -> bool {
        self.geojson.is_some() && !self.verbose && !self.debug && !self.quiet
    }

    /// Command line over configuration file.
    fn scan_config(&self, file: &ScanConfig) -> ScanConfig {
        let mut config = file.clone();
        if let Some(threshold) = self.minlevel {
            config = config.with_threshold(threshold);
        }
        if let Some(distance) = self.distance {
            config = config.with_distance(distance);
        }
        if let Some(size) = self.size {
            config = config.with_min_size(size);
        }
        if let Some(zoom) = self.zoom {
            config = config.with_zoom(zoom);
        }
        if let Some(activity) = &self.activity {
            config = config.with_activity(activity.clone());
        }
        config
    }

    fn service_config(&self, file: &ServiceConfig) -> ServiceConfig {
        let mut config = file.clone();
        if let Some(dir) = &self.cache_dir {
            config = config.with_cache_dir(dir.clone());
        }
        if let Some(url) = &self.heatmap_url {
            config = config.with_heatmap_url(url.clone());
        }
        if let Some(url) = &self.overpass_url {
            config = config.with_overpass_url(url.clone());
        }
        config
    }
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let target = args.target()?;
    let file = match &args.config {
        Some(path) if !path.exists() => {
            return Err(CliError::Config(format!(
                "config file {} does not exist",
                path.display()
            )))
        }
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load()?,
    };
    let _guard = init_logging(args.log_level(), args.log_file.as_deref())?;

    let scan = args.scan_config(&file.scan);
    let service = args.service_config(&file.service);
    info!(
        threshold = scan.threshold,
        distance = scan.distance,
        min_size = scan.min_size,
        zoom = scan.zoom,
        activity = %scan.activity,
        "Scan parameters"
    );

    let plan = match target {
        Target::Tile { x, y } => TilePlan::single(TileCoord::new(x, y, scan.zoom)),
        Target::Area { path, offset } => {
            let area = AreaOfInterest::load(&path)?;
            info!(bounds = ?area.bounds(), "Area of interest");
            let partition = match offset {
                Some(offset) => Partition::from_offset(offset)?,
                None => Partition::full(),
            };
            TilePlan::area(area, scan.zoom, partition)
        }
    };

    if args.no_cache {
        scan_tiles(&args, scan, &service, MemoryTileCache::new(), &plan)
    } else {
        debug!(dir = %service.cache_dir.display(), "Tile cache");
        let cache = DiskTileCache::new(service.cache_dir.clone());
        scan_tiles(&args, scan, &service, cache, &plan)
    }
}

fn scan_tiles<K: TileCache>(
    args: &Args,
    scan: ScanConfig,
    service: &ServiceConfig,
    cache: K,
    plan: &TilePlan,
) -> Result<(), CliError> {
    let output: Box<dyn Write> = match &args.geojson {
        Some(path) => Box::new(BufWriter::new(File::create(path).map_err(|e| {
            CliError::Output(format!("cannot create {}: {}", path.display(), e))
        })?)),
        None => Box::new(std::io::stdout()),
    };

    let dedup = match &args.tasks_db {
        Some(path) => Deduplicator::new(SqliteLedger::open(path)?),
        None => Deduplicator::disabled(),
    };

    let client = ReqwestClient::new(service.http_timeout)?;
    let tiles = HeatmapSource::new(client.clone(), cache, service.heatmap_url.clone());
    let features = OverpassClient::new(client, service.overpass_url.clone())
        .with_max_attempts(service.overpass_attempts)
        .with_retry_delay(service.overpass_retry_delay);

    let mut scanner = TileScanner::new(tiles, features, dedup, GeoJsonSeqWriter::new(output), scan);
    if let Some(dir) = &args.debug_dir {
        std::fs::create_dir_all(dir).map_err(|e| {
            CliError::Output(format!("cannot create {}: {}", dir.display(), e))
        })?;
        scanner = scanner.with_debug_dir(dir.clone());
    }

    let progress = ColumnProgress::new(args.show_progress(), plan.columns().len());
    let stats = scanner.run(plan, |done, total| progress.update(done, total))?;
    progress.finish(format!("{} records", stats.records_emitted));

    Ok(())
}
