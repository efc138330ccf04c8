//! Camera intent resolution for cluster activation.
//!
//! When the user taps a cluster badge, the host should zoom in far enough
//! for the cluster to visibly split. The resolver computes that target zoom
//! from the index's expansion-zoom data and emits a one-shot
//! [`CameraIntent`] for the host map widget's `animate_camera` equivalent.

use crate::geo::GeoPoint;
use crate::index::{ClusterAggregate, SpatialIndex};

/// Default camera animation duration in milliseconds.
pub const DEFAULT_CAMERA_ANIMATION_DURATION_MS: u64 = 1000;

/// Default ceiling overshoot above the configured maximum zoom.
///
/// Clusters that never fully expand (e.g. coincident points) still get a
/// meaningful zoom-in, slightly past `max_zoom`.
pub const DEFAULT_CEILING_OVERSHOOT: f64 = 1.1;

/// Default overshoot past the expansion zoom.
///
/// Landing exactly on the split boundary can leave the cluster visually
/// intact; a half level past it guarantees the split is visible.
pub const DEFAULT_SPLIT_OVERSHOOT: f64 = 0.5;

/// Camera behavior configuration.
///
/// The two overshoot constants are empirically tuned values, held here as
/// configuration so they can be recalibrated without code changes.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    /// Whether activation emits a camera intent at all.
    pub zoom_enabled: bool,
    /// Animation duration handed to the host map widget, in milliseconds.
    pub animation_duration_ms: u64,
    /// Added to `max_zoom` to form the zoom ceiling.
    pub ceiling_overshoot: f64,
    /// Added to the expansion zoom so the cluster visibly splits.
    pub split_overshoot: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            zoom_enabled: false,
            animation_duration_ms: DEFAULT_CAMERA_ANIMATION_DURATION_MS,
            ceiling_overshoot: DEFAULT_CEILING_OVERSHOOT,
            split_overshoot: DEFAULT_SPLIT_OVERSHOOT,
        }
    }
}

/// A one-shot camera command for the host map widget. Not persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraIntent {
    /// Target camera center.
    pub center: GeoPoint,
    /// Target fractional zoom level.
    pub zoom: f64,
    /// Animation duration in milliseconds.
    pub duration_ms: u64,
}

/// Result of a cluster activation.
///
/// The tapped aggregate is always reported to the caller; the camera intent
/// is present only when zoom interaction is enabled.
#[derive(Debug, Clone, PartialEq)]
pub struct Activation {
    /// The aggregate that was tapped.
    pub aggregate: ClusterAggregate,
    /// Camera command, if zoom interaction is enabled.
    pub camera: Option<CameraIntent>,
}

/// Resolve a cluster tap into an activation.
///
/// Target zoom is `min(max_zoom + ceiling_overshoot, expansion_zoom +
/// split_overshoot)`. When the index has no expansion data for the id
/// (a leaf, or an id from a previous build), the ceiling alone applies.
pub fn resolve_activation<I: SpatialIndex>(
    index: &I,
    aggregate: &ClusterAggregate,
    max_zoom: u8,
    config: &CameraConfig,
) -> Activation {
    if !config.zoom_enabled {
        return Activation {
            aggregate: aggregate.clone(),
            camera: None,
        };
    }

    let ceiling = max_zoom as f64 + config.ceiling_overshoot;
    let zoom = match index.expansion_zoom(aggregate.id) {
        Some(expansion) => ceiling.min(expansion as f64 + config.split_overshoot),
        None => ceiling,
    };

    Activation {
        aggregate: aggregate.clone(),
        camera: Some(CameraIntent {
            center: aggregate.centroid,
            zoom,
            duration_ms: config.animation_duration_ms,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Envelope;
    use crate::index::{ClusterId, IndexConfig, PointIndex};
    use crate::marker::MarkerRecord;

    fn enabled() -> CameraConfig {
        CameraConfig {
            zoom_enabled: true,
            ..CameraConfig::default()
        }
    }

    fn build_pair_index() -> (PointIndex, ClusterAggregate) {
        let points = vec![
            MarkerRecord {
                coordinate: GeoPoint::new(52.0, 19.0).unwrap(),
                original_index: 0,
            },
            MarkerRecord {
                coordinate: GeoPoint::new(52.01, 19.01).unwrap(),
                original_index: 1,
            },
        ];
        let index = PointIndex::build(&points, &IndexConfig::default());
        let world = Envelope {
            xmin: -180.0,
            ymin: -90.0,
            xmax: 180.0,
            ymax: 90.0,
        };
        let cluster = index
            .query(&world, 3)
            .into_iter()
            .find(|a| a.is_cluster())
            .expect("pair should cluster at zoom 3");
        (index, cluster)
    }

    #[test]
    fn test_zoom_disabled_still_reports_aggregate() {
        let (index, cluster) = build_pair_index();
        let activation = resolve_activation(&index, &cluster, 19, &CameraConfig::default());

        assert_eq!(activation.aggregate, cluster);
        assert!(activation.camera.is_none());
    }

    #[test]
    fn test_target_zoom_overshoots_expansion() {
        let (index, cluster) = build_pair_index();
        let expansion = index.expansion_zoom(cluster.id).unwrap() as f64;

        let activation = resolve_activation(&index, &cluster, 19, &enabled());
        let camera = activation.camera.unwrap();

        assert_eq!(camera.zoom, (19.0_f64 + 1.1).min(expansion + 0.5));
        assert_eq!(camera.center, cluster.centroid);
        assert_eq!(camera.duration_ms, DEFAULT_CAMERA_ANIMATION_DURATION_MS);
    }

    #[test]
    fn test_ceiling_applies_without_expansion_data() {
        let (index, cluster) = build_pair_index();
        let mut fake = cluster.clone();
        fake.id = ClusterId(9999);

        let activation = resolve_activation(&index, &fake, 19, &enabled());
        assert_eq!(activation.camera.unwrap().zoom, 20.1);
    }

    #[test]
    fn test_overshoot_constants_are_configurable() {
        let (index, cluster) = build_pair_index();
        let expansion = index.expansion_zoom(cluster.id).unwrap() as f64;
        let config = CameraConfig {
            zoom_enabled: true,
            ceiling_overshoot: 0.0,
            split_overshoot: 2.0,
            animation_duration_ms: 250,
        };

        let camera = resolve_activation(&index, &cluster, 19, &config)
            .camera
            .unwrap();
        assert_eq!(camera.zoom, 19.0_f64.min(expansion + 2.0));
        assert_eq!(camera.duration_ms, 250);
    }
}
