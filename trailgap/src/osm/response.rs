//! Overpass JSON response model.

use std::collections::HashMap;

use serde::Deserialize;

use super::feature::{Feature, FeatureKind, LatLon};

/// Top-level Overpass JSON document.
///
/// `osm3s` is only present when the server actually ran the query; a
/// `remark` carrying "runtime error" signals a timeout or memory abort with
/// partial (unusable) results.
#[derive(Debug, Deserialize)]
pub(crate) struct OverpassResponse {
    osm3s: Option<serde_json::Value>,
    #[serde(default)]
    remark: Option<String>,
    #[serde(default)]
    elements: Vec<Element>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Element {
    Way {
        id: u64,
        #[serde(default)]
        tags: HashMap<String, String>,
        #[serde(default)]
        geometry: Vec<Option<LatLon>>,
    },
    Relation {
        id: u64,
        #[serde(default)]
        tags: HashMap<String, String>,
        #[serde(default)]
        members: Vec<Member>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct Member {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    geometry: Vec<Option<LatLon>>,
}

impl OverpassResponse {
    /// Parses a response body.
    pub(crate) fn parse(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// Returns why the response cannot be trusted, if it cannot.
    pub(crate) fn defect(&self) -> Option<String> {
        if self.osm3s.is_none() {
            return Some("missing osm3s metadata".to_string());
        }
        match &self.remark {
            Some(remark) if remark.contains("runtime error") => Some(remark.clone()),
            _ => None,
        }
    }

    /// Converts ways and relations into features. Nodes are ignored.
    pub(crate) fn into_features(self) -> Vec<Feature> {
        self.elements
            .into_iter()
            .filter_map(|element| match element {
                Element::Way { id, tags, geometry } => Some(Feature::new(
                    id,
                    FeatureKind::Way,
                    geometry.into_iter().flatten().collect(),
                    &tags,
                )),
                Element::Relation { id, tags, members } => {
                    let vertices = members
                        .into_iter()
                        .filter(|m| m.kind == "way")
                        .flat_map(|m| m.geometry.into_iter().flatten())
                        .collect();
                    Some(Feature::new(id, FeatureKind::Relation, vertices, &tags))
                }
                Element::Other => None,
            })
            .collect()
    }
}
