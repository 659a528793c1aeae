//! OpenStreetMap path features from the Overpass API.
//!
//! The scanner needs every already-mapped path-like feature around a tile:
//! roads and paths (`highway=*`), railways, running tracks and pitches, and
//! ferry routes. [`OverpassClient`] fetches them with bounded retries;
//! [`Feature`] carries the vertices and the area classification used by the
//! overlay rasterizer.

mod client;
mod feature;
mod query;
mod response;

pub use client::{FeatureSource, OverpassClient, OverpassError, DEFAULT_OVERPASS_URL};
pub use feature::{is_area, Feature, FeatureKind, LatLon};
pub use query::build_query;
