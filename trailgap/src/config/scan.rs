//! Detection parameters.

/// Detection parameters shared by every stage of a run.
///
/// The record identifier `zoom/x/y/row/col` is only stable across runs for a
/// fixed zoom, threshold and distance, so these must not change mid-run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    /// Minimum heatmap intensity of a hotspot (0-255).
    pub threshold: u8,

    /// Maximum distance in meters between activity and a mapped feature for
    /// the activity to count as mapped.
    pub distance: f64,

    /// A region must be larger than this many pixels to be reported.
    pub min_size: usize,

    /// Heatmap zoom level.
    pub zoom: u8,

    /// Heatmap activity layer (e.g. "run", "ride", "all").
    pub activity: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            threshold: 100,
            distance: 35.0,
            min_size: 20,
            zoom: 15,
            activity: "run".to_string(),
        }
    }
}

impl ScanConfig {
    /// Set the intensity threshold.
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the suppression distance in meters.
    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = distance;
        self
    }

    /// Set the minimum reportable region size.
    pub fn with_min_size(mut self, min_size: usize) -> Self {
        self.min_size = min_size;
        self
    }

    /// Set the zoom level.
    pub fn with_zoom(mut self, zoom: u8) -> Self {
        self.zoom = zoom;
        self
    }

    /// Set the activity layer.
    pub fn with_activity(mut self, activity: impl Into<String>) -> Self {
        self.activity = activity.into();
        self
    }
}
