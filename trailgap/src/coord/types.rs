//! Coordinate value types shared by the projection helpers.

use std::fmt;

use super::{easting_to_lon, lat_to_northing, lon_to_easting, northing_to_lat, tile_corner};

/// A slippy-map tile index at a zoom level.
///
/// `x` grows eastward and `y` grows southward, both in `0..2^zoom` for
/// sane inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    /// Column index (west to east)
    pub x: u32,
    /// Row index (north to south)
    pub y: u32,
    /// Zoom level
    pub zoom: u8,
}

impl TileCoord {
    /// Creates a tile coordinate.
    pub fn new(x: u32, y: u32, zoom: u8) -> Self {
        Self { x, y, zoom }
    }

    /// Geographic bounds of the tile, from its own north-west corner and the
    /// north-west corner of its `(x + 1, y + 1)` neighbour.
    pub fn geo_bbox(&self) -> GeoBBox {
        let (north, west) = tile_corner(self.x, self.y, self.zoom);
        let (south, east) = tile_corner(self.x + 1, self.y + 1, self.zoom);
        GeoBBox {
            north,
            west,
            south,
            east,
        }
    }

    /// Pseudo-Mercator bounds of the tile in meters.
    pub fn merc_bbox(&self) -> MercBBox {
        MercBBox::from(self.geo_bbox())
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

/// Bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBBox {
    pub north: f64,
    pub west: f64,
    pub south: f64,
    pub east: f64,
}

impl From<MercBBox> for GeoBBox {
    fn from(bbox: MercBBox) -> Self {
        Self {
            north: northing_to_lat(bbox.north),
            west: easting_to_lon(bbox.west),
            south: northing_to_lat(bbox.south),
            east: easting_to_lon(bbox.east),
        }
    }
}

/// Bounding box in pseudo-Mercator meters.
///
/// `north > south` and `east > west` for any box derived from a tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MercBBox {
    pub north: f64,
    pub west: f64,
    pub south: f64,
    pub east: f64,
}

impl MercBBox {
    /// Height of the box in meters.
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// Returns the box grown by `margin` meters on every side.
    pub fn expand(&self, margin: f64) -> Self {
        Self {
            north: self.north + margin,
            west: self.west - margin,
            south: self.south - margin,
            east: self.east + margin,
        }
    }
}

impl From<GeoBBox> for MercBBox {
    fn from(bbox: GeoBBox) -> Self {
        Self {
            north: lat_to_northing(bbox.north),
            west: lon_to_easting(bbox.west),
            south: lat_to_northing(bbox.south),
            east: lon_to_easting(bbox.east),
        }
    }
}

/// A projected point in pseudo-Mercator meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MercPoint {
    pub easting: f64,
    pub northing: f64,
}

impl MercPoint {
    /// Projects a geographic position.
    pub fn from_lat_lon(lat: f64, lon: f64) -> Self {
        Self {
            easting: lon_to_easting(lon),
            northing: lat_to_northing(lat),
        }
    }

    /// Returns `(lat, lon)` in degrees.
    pub fn to_lat_lon(&self) -> (f64, f64) {
        (northing_to_lat(self.northing), easting_to_lon(self.easting))
    }
}

/// An integer pixel position inside (or near) a tile raster.
///
/// Row 0 is the north edge. Values may fall outside the raster for
/// projected geometry that lies beyond the tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelPoint {
    pub row: i64,
    pub col: i64,
}

impl PixelPoint {
    pub fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }
}
