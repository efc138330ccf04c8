//! Index configuration knobs.
//!
//! All fields are pass-through to the clustering engine; the only expectation
//! is that numeric values are positive. Defaults mirror the values the
//! component shipped with.

/// Default clustering radius as a fraction of screen width.
///
/// The pixel radius scales with the display so the on-screen merge distance
/// feels the same on any device: `radius = screen_width_px * 0.12`.
pub const DEFAULT_RADIUS_FRACTION: f64 = 0.12;

/// Default tile extent the radius is measured against, in pixels.
pub const DEFAULT_EXTENT: f64 = 512.0;

/// Default R-tree node size hint.
pub const DEFAULT_NODE_SIZE: usize = 64;

/// Default minimum zoom at which clustering is performed.
pub const DEFAULT_MIN_ZOOM: u8 = 0;

/// Default maximum zoom at which clustering is performed.
pub const DEFAULT_MAX_ZOOM: u8 = 19;

/// Default minimum number of points that form a cluster.
pub const DEFAULT_MIN_POINTS: usize = 2;

/// Screen width assumed by [`IndexConfig::default`]; callers with a real
/// display should use [`IndexConfig::for_screen_width`] instead.
pub const DEFAULT_SCREEN_WIDTH_PX: f64 = 360.0;

/// Configuration for building a spatial clustering index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexConfig {
    /// Cluster radius in pixels at the configured extent.
    pub radius: f64,
    /// Tile extent in pixels the radius is measured against.
    pub extent: f64,
    /// Tree node size hint. Advisory: engines with fixed tree parameters
    /// may ignore it.
    pub node_size: usize,
    /// Lowest zoom level clusters are generated for.
    pub min_zoom: u8,
    /// Highest zoom level clusters are generated for. Queries above this
    /// return individual leaves.
    pub max_zoom: u8,
    /// Minimum number of points required to form a cluster.
    pub min_points: usize,
}

impl IndexConfig {
    /// Config with defaults scaled to a concrete screen width.
    pub fn for_screen_width(screen_width_px: f64) -> Self {
        Self {
            radius: screen_width_px * DEFAULT_RADIUS_FRACTION,
            ..Self::default()
        }
    }

    /// Set the cluster radius in pixels.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Set the minimum points per cluster.
    pub fn with_min_points(mut self, min_points: usize) -> Self {
        self.min_points = min_points;
        self
    }

    /// Set the zoom range clusters are generated for.
    pub fn with_zoom_range(mut self, min_zoom: u8, max_zoom: u8) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_SCREEN_WIDTH_PX * DEFAULT_RADIUS_FRACTION,
            extent: DEFAULT_EXTENT,
            node_size: DEFAULT_NODE_SIZE,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            min_points: DEFAULT_MIN_POINTS,
        }
    }
}
