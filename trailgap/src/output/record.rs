//! Output record.

use serde::{Deserialize, Serialize};

use crate::config::ScanConfig;
use crate::coord::pixel_to_lat_lon;
use crate::hotspot::Hotspot;

/// A GeoJSON Point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointGeometry {
    #[serde(rename = "type")]
    pub kind: String,
    /// `[longitude, latitude]`
    pub coordinates: [f64; 2],
}

/// Properties carried by every record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordProperties {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Suppression distance in meters.
    pub distance: f64,
    pub threshold: u8,
    /// Peak intensity of the hotspot.
    pub maximum: u8,
    pub min_size: usize,
    /// Measured size in pixels.
    pub size: usize,
}

/// One candidate unmapped path, as a GeoJSON Feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    pub geometry: PointGeometry,
    pub properties: RecordProperties,
}

impl OutputRecord {
    /// Builds the record for `hotspot`, placed at the north-west corner of its
    /// peak pixel.
    ///
    /// # Arguments
    ///
    /// * `hotspot` - The reported hotspot
    /// * `pixel_size` - Meters per pixel of the tile it was found in
    /// * `config` - Run parameters recorded alongside the location
    pub fn from_hotspot(hotspot: &Hotspot, pixel_size: f64, config: &ScanConfig) -> Self {
        let bbox = hotspot.tile.merc_bbox();
        let (latitude, longitude) = pixel_to_lat_lon(hotspot.pixel, &bbox, pixel_size);
        let id = hotspot.id();

        Self {
            kind: "Feature".to_string(),
            id: id.clone(),
            geometry: PointGeometry {
                kind: "Point".to_string(),
                coordinates: [longitude, latitude],
            },
            properties: RecordProperties {
                id,
                latitude,
                longitude,
                distance: config.distance,
                threshold: config.threshold,
                maximum: hotspot.peak,
                min_size: config.min_size,
                size: hotspot.size,
            },
        }
    }

    pub fn latitude(&self) -> f64 {
        self.properties.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.properties.longitude
    }

    /// OpenStreetMap link centred on the record with the notes layer shown.
    pub fn osm_url(&self, zoom: u8) -> String {
        let (lat, lon) = (self.latitude(), self.longitude());
        format!(
            "https://www.openstreetmap.org/?mlat={lat}&mlon={lon}#map={zoom}/{lat}/{lon}&layers=N"
        )
    }
}
