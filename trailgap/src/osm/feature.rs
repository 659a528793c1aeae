//! Map features and their area classification.

use std::collections::HashMap;

use serde::Deserialize;

/// A geographic vertex.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

/// OSM element type a feature came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    Way,
    Relation,
}

/// A mapped linear or area feature.
///
/// Relations carry the concatenation of their member ways' geometries.
/// Features with fewer than two vertices only contribute vertex caps.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: u64,
    pub kind: FeatureKind,
    pub vertices: Vec<LatLon>,
    pub is_area: bool,
}

impl Feature {
    /// Builds a feature, classifying it from its tags.
    pub fn new(id: u64, kind: FeatureKind, vertices: Vec<LatLon>, tags: &HashMap<String, String>) -> Self {
        Self {
            id,
            kind,
            vertices,
            is_area: is_area(kind, tags),
        }
    }

    /// Whether the feature can be drawn as a line.
    pub fn is_linear(&self) -> bool {
        self.vertices.len() >= 2
    }
}

/// Decides whether a feature's tags describe an area.
///
/// `area=yes` or any `leisure` other than `track` marks an area, as does
/// `type=multipolygon` on relations. `area=no` always wins.
pub fn is_area(kind: FeatureKind, tags: &HashMap<String, String>) -> bool {
    let tag = |key: &str| tags.get(key).map(String::as_str);

    if tag("area") == Some("no") {
        return false;
    }

    let leisure_area = matches!(tag("leisure"), Some(v) if v != "track");
    let multipolygon = kind == FeatureKind::Relation && tag("type") == Some("multipolygon");

    tag("area") == Some("yes") || leisure_area || multipolygon
}
