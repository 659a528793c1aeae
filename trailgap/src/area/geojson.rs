//! Area polygons loaded from GeoJSON.

use std::path::{Path, PathBuf};

use geo::{
    BooleanOps, BoundingRect, Coord, Intersects, LineString, MultiPolygon, Polygon, Rect,
};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::coord::{GeoBBox, TileCoord};

/// Errors loading an area of interest.
#[derive(Debug, Error)]
pub enum AreaError {
    #[error("failed to read area file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid GeoJSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid geometry: {0}")]
    Geometry(String),

    #[error("area contains no polygon")]
    Empty,

    #[error("tile offset must be between 0 and 3, got {0}")]
    InvalidOffset(u8),
}

/// Decides whether a tile footprint touches the area.
pub trait AreaFilter {
    /// `tile` is the tile's footprint in degrees (x = longitude, y = latitude).
    fn intersects_area(&self, tile: &Polygon<f64>) -> bool;

    /// Convenience over [`intersects_area`](Self::intersects_area) for a tile.
    fn contains_tile(&self, tile: &TileCoord) -> bool {
        self.intersects_area(&tile_footprint(tile))
    }
}

/// Footprint of a tile in degrees.
pub fn tile_footprint(tile: &TileCoord) -> Polygon<f64> {
    let GeoBBox {
        north,
        west,
        south,
        east,
    } = tile.geo_bbox();
    Rect::new(Coord { x: west, y: south }, Coord { x: east, y: north }).to_polygon()
}

/// A (multi)polygon area in degrees.
#[derive(Debug, Clone)]
pub struct AreaOfInterest {
    shape: MultiPolygon<f64>,
    bounds: GeoBBox,
}

impl AreaOfInterest {
    /// Builds an area from polygons, repairing each one with a self-union.
    pub fn from_polygons(polygons: Vec<Polygon<f64>>) -> Result<Self, AreaError> {
        let shape = polygons
            .into_iter()
            .map(|polygon| {
                let polygon = MultiPolygon::new(vec![polygon]);
                polygon.union(&polygon)
            })
            .reduce(|a, b| a.union(&b))
            .ok_or(AreaError::Empty)?;

        let rect = shape.bounding_rect().ok_or(AreaError::Empty)?;
        let bounds = GeoBBox {
            north: rect.max().y,
            west: rect.min().x,
            south: rect.min().y,
            east: rect.max().x,
        };
        debug!(polygons = shape.0.len(), ?bounds, "Area of interest");

        Ok(Self { shape, bounds })
    }

    /// Parses a GeoJSON FeatureCollection, Feature or bare geometry.
    ///
    /// Polygon and MultiPolygon geometries are kept; anything else is skipped
    /// with a warning.
    pub fn from_geojson(text: &str) -> Result<Self, AreaError> {
        let value: Value = serde_json::from_str(text)?;

        let geometries: Vec<&Value> = match value["type"].as_str() {
            Some("FeatureCollection") => value["features"]
                .as_array()
                .map(|features| features.iter().map(|f| &f["geometry"]).collect())
                .unwrap_or_default(),
            Some("Feature") => vec![&value["geometry"]],
            _ => vec![&value],
        };

        let mut polygons = Vec::new();
        for geometry in geometries {
            match geometry["type"].as_str() {
                Some("Polygon") => polygons.push(parse_polygon(&geometry["coordinates"])?),
                Some("MultiPolygon") => {
                    let parts = geometry["coordinates"]
                        .as_array()
                        .ok_or_else(|| AreaError::Geometry("MultiPolygon without coordinates".into()))?;
                    for part in parts {
                        polygons.push(parse_polygon(part)?);
                    }
                }
                other => warn!(geometry = ?other, "Ignoring non-polygon geometry in area"),
            }
        }

        Self::from_polygons(polygons)
    }

    /// Reads and parses a GeoJSON file.
    pub fn load(path: &Path) -> Result<Self, AreaError> {
        let text = std::fs::read_to_string(path).map_err(|source| AreaError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_geojson(&text)
    }

    pub fn shape(&self) -> &MultiPolygon<f64> {
        &self.shape
    }

    /// Bounding box of the whole area.
    pub fn bounds(&self) -> GeoBBox {
        self.bounds
    }
}

impl AreaFilter for AreaOfInterest {
    fn intersects_area(&self, tile: &Polygon<f64>) -> bool {
        self.shape.intersects(tile)
    }
}

fn parse_polygon(coords: &Value) -> Result<Polygon<f64>, AreaError> {
    let rings = coords
        .as_array()
        .ok_or_else(|| AreaError::Geometry("polygon coordinates must be an array".into()))?;
    let mut rings = rings.iter().map(parse_ring);

    let exterior = rings
        .next()
        .ok_or_else(|| AreaError::Geometry("polygon without exterior ring".into()))??;
    let interiors = rings.collect::<Result<Vec<_>, _>>()?;

    Ok(Polygon::new(exterior, interiors))
}

fn parse_ring(ring: &Value) -> Result<LineString<f64>, AreaError> {
    let positions = ring
        .as_array()
        .ok_or_else(|| AreaError::Geometry("ring must be an array".into()))?;

    positions
        .iter()
        .map(|position| match (position[0].as_f64(), position[1].as_f64()) {
            (Some(x), Some(y)) => Ok(Coord { x, y }),
            _ => Err(AreaError::Geometry(format!("invalid position {}", position))),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(LineString::new)
}
