//! Overpass QL query construction.

use crate::coord::GeoBBox;

/// Server-side timeout requested for each query, in seconds.
const QUERY_TIMEOUT_SECS: u32 = 90;

/// Builds the Overpass QL query for all path-like features in `bbox`.
///
/// The global `[bbox:south,west,north,east]` setting restricts every
/// statement; `out geom` inlines vertex coordinates so no node lookup is
/// needed.
pub fn build_query(bbox: &GeoBBox) -> String {
    format!(
        "[out:json][timeout:{}][bbox:{},{},{},{}];\
         (nwr[highway];nwr[railway];nwr[leisure~\"track|pitch\"];nwr[route=ferry];);\
         out geom;",
        QUERY_TIMEOUT_SECS, bbox.south, bbox.west, bbox.north, bbox.east
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_order_is_south_west_north_east() {
        let bbox = GeoBBox {
            north: 48.2,
            west: 17.0,
            south: 48.1,
            east: 17.1,
        };
        let query = build_query(&bbox);
        assert!(query.contains("[bbox:48.1,17,48.2,17.1]"), "{}", query);
    }

    #[test]
    fn test_path_categories_present() {
        let bbox = GeoBBox {
            north: 1.0,
            west: 0.0,
            south: 0.0,
            east: 1.0,
        };
        let query = build_query(&bbox);
        assert!(query.starts_with("[out:json]"));
        for category in [
            "nwr[highway]",
            "nwr[railway]",
            "nwr[leisure~\"track|pitch\"]",
            "nwr[route=ferry]",
        ] {
            assert!(query.contains(category), "missing {}", category);
        }
        assert!(query.ends_with("out geom;"));
    }
}
