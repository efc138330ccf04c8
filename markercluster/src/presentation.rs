//! Cluster badge presentation.
//!
//! Maps a cluster's point count to a discrete visual size/font bucket. Pure
//! functions of the count and the sizing config; the actual drawing (colors,
//! fonts, layout) belongs to the host renderer.

use crate::index::ClusterAggregate;

/// Default minimum badge diameter in pixels.
pub const DEFAULT_MIN_CLUSTER_SIZE: f64 = 28.0;

/// Default maximum badge diameter in pixels.
pub const DEFAULT_MAX_CLUSTER_SIZE: f64 = 44.0;

/// Default badge label font size in pixels.
pub const DEFAULT_FONT_SIZE: f64 = 14.0;

/// Default badge fill color.
pub const DEFAULT_CLUSTER_COLOR: &str = "#F44336";

/// Default badge label color.
pub const DEFAULT_FONT_COLOR: &str = "#FFFFFF";

/// Extra width/height of the translucent halo ring around a badge, in pixels.
pub const HALO_SIZE_OFFSET: f64 = 10.0;

/// Extra corner radius of the halo ring, in pixels.
pub const HALO_RADIUS_OFFSET: f64 = 5.0;

/// Alpha applied to the cluster color when drawing the halo ring.
pub const HALO_ALPHA: f64 = 0.4;

/// Visual configuration for cluster badges.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterStyle {
    /// Badge diameter for the smallest tier, in pixels.
    pub min_cluster_size: f64,
    /// Badge diameter for the largest tier, in pixels.
    pub max_cluster_size: f64,
    /// Label font size for the base tier, in pixels.
    pub base_font_size: f64,
    /// Badge fill color as a hex string.
    pub cluster_color: String,
    /// Label color as a hex string.
    pub cluster_font_color: String,
    /// Optional label font family; `None` uses the host default.
    pub cluster_font_family: Option<String>,
}

impl Default for ClusterStyle {
    fn default() -> Self {
        Self {
            min_cluster_size: DEFAULT_MIN_CLUSTER_SIZE,
            max_cluster_size: DEFAULT_MAX_CLUSTER_SIZE,
            base_font_size: DEFAULT_FONT_SIZE,
            cluster_color: DEFAULT_CLUSTER_COLOR.to_string(),
            cluster_font_color: DEFAULT_FONT_COLOR.to_string(),
            cluster_font_family: None,
        }
    }
}

/// A discrete visual size tier for a cluster badge.
///
/// Derived purely from the point count and the sizing config; no hidden
/// state, safe to recompute for the same aggregate any number of times.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresentationBucket {
    /// Badge width in pixels.
    pub width: f64,
    /// Badge height in pixels.
    pub height: f64,
    /// Badge corner radius in pixels (`size / 2`, a circle).
    pub border_radius: f64,
    /// Label font size in pixels.
    pub font_size: f64,
}

impl PresentationBucket {
    fn circle(size: f64, font_size: f64) -> Self {
        Self {
            width: size,
            height: size,
            border_radius: size / 2.0,
            font_size,
        }
    }

    /// Width of the translucent halo ring drawn behind the badge.
    pub fn halo_width(&self) -> f64 {
        self.width + HALO_SIZE_OFFSET
    }

    /// Height of the translucent halo ring drawn behind the badge.
    pub fn halo_height(&self) -> f64 {
        self.height + HALO_SIZE_OFFSET
    }

    /// Corner radius of the translucent halo ring.
    pub fn halo_border_radius(&self) -> f64 {
        self.border_radius + HALO_RADIUS_OFFSET
    }
}

/// Select the size/font bucket for a cluster's point count.
///
/// Four fixed tiers:
///
/// | count    | size             | font                    |
/// |----------|------------------|-------------------------|
/// | > 999    | `max_size`       | `base_font_size`        |
/// | 16..=999 | `min_size * 1.3` | `base_font_size * 1.3`  |
/// | 11..=15  | `min_size * 1.15`| `base_font_size * 1.15` |
/// | 2..=10   | `min_size`       | `base_font_size`        |
///
/// Counts below 2 are never produced for badges (a single-point aggregate
/// renders as the original leaf marker) and fall into the base tier.
pub fn bucket_from_count(
    count: usize,
    min_size: f64,
    max_size: f64,
    base_font_size: f64,
) -> PresentationBucket {
    if count > 999 {
        PresentationBucket::circle(max_size, base_font_size)
    } else if count > 15 {
        PresentationBucket::circle(min_size * 1.3, base_font_size * 1.3)
    } else if count > 10 {
        PresentationBucket::circle(min_size * 1.15, base_font_size * 1.15)
    } else {
        PresentationBucket::circle(min_size, base_font_size)
    }
}

/// Map an aggregate to its presentation bucket under a style config.
pub fn bucket_for_aggregate(aggregate: &ClusterAggregate, style: &ClusterStyle) -> PresentationBucket {
    bucket_from_count(
        aggregate.point_count,
        style.min_cluster_size,
        style.max_cluster_size,
        style.base_font_size,
    )
}
