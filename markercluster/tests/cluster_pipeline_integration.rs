//! Integration tests for the full clustering pipeline.
//!
//! These tests drive the complete data flow the host map widget exercises:
//! marker set → index rebuild → region change → viewport query →
//! presentation buckets → cluster tap → camera intent.
//!
//! Run with: `cargo test --test cluster_pipeline_integration`

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use markercluster::config::ClusterConfig;
use markercluster::controller::{ClusterOutput, ClusterState};
use markercluster::geo::{zoom_from_region, Region};
use markercluster::marker::RawMarker;
use markercluster::presentation::bucket_for_aggregate;

// ============================================================================
// Test Helpers
// ============================================================================

/// The demo viewport: central Poland on a 360 px wide screen.
const SCREEN_WIDTH_PX: f64 = 360.0;

fn demo_region() -> Region {
    Region::new(52.5, 19.2, 8.5, 8.5)
}

/// 100 markers uniformly distributed inside the demo viewport's envelope
/// (lat 48.25..56.75, lon 14.95..23.45), so every point is visible.
fn demo_markers(seed: u64) -> Vec<RawMarker> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..100)
        .map(|_| RawMarker::new(rng.random_range(49.0..56.0), rng.random_range(15.0..23.0)))
        .collect()
}

fn demo_config() -> ClusterConfig {
    ClusterConfig::for_screen_width(SCREEN_WIDTH_PX).with_zoom_enabled(true)
}

fn clustered(state: &ClusterState) -> &[markercluster::index::ClusterAggregate] {
    match state.output() {
        ClusterOutput::Clustered(aggregates) => aggregates,
        other => panic!("expected clustered output, got {:?}", other),
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn demo_region_queries_at_zoom_five() {
    let zoom = zoom_from_region(&demo_region(), SCREEN_WIDTH_PX);
    assert!(zoom > 5.0 && zoom < 6.0, "zoom was {}", zoom);
    assert_eq!(zoom.floor() as u8, 5);
}

#[test]
fn full_pipeline_preserves_every_point() {
    let config = demo_config();
    let state = ClusterState::new()
        .on_markers_changed(demo_markers(42), &config)
        .on_region_changed(demo_region(), &config);

    let aggregates = clustered(&state);
    assert!(aggregates.len() <= 100);

    let total: usize = aggregates.iter().map(|a| a.point_count).sum();
    assert_eq!(total, 100);

    // Every source index appears exactly once across the aggregates.
    let mut sources: Vec<usize> = aggregates
        .iter()
        .flat_map(|a| a.source_indices.iter().copied())
        .collect();
    sources.sort_unstable();
    assert_eq!(sources, (0..100).collect::<Vec<_>>());
}

#[test]
fn zooming_in_splits_clusters() {
    let config = demo_config();
    let base = ClusterState::new().on_markers_changed(demo_markers(42), &config);

    let wide = base
        .clone()
        .on_region_changed(demo_region(), &config);
    let narrow = base.on_region_changed(Region::new(52.5, 19.2, 1.0, 1.0), &config);

    let wide_count = clustered(&wide).len();
    // The narrow viewport covers an eighth of the span: fewer points are
    // visible, but each merges with fewer neighbors.
    let narrow_aggregates = clustered(&narrow);
    let visible: usize = narrow_aggregates.iter().map(|a| a.point_count).sum();
    assert!(visible <= 100);
    assert!(wide_count >= 1);
}

#[test]
fn buckets_render_for_every_badge() {
    let config = demo_config();
    let state = ClusterState::new()
        .on_markers_changed(demo_markers(7), &config)
        .on_region_changed(demo_region(), &config);

    for aggregate in clustered(&state) {
        if !aggregate.is_cluster() {
            continue;
        }
        let bucket = bucket_for_aggregate(aggregate, &config.style);
        assert!(bucket.width >= config.style.min_cluster_size);
        assert!(bucket.width <= config.style.max_cluster_size.max(config.style.min_cluster_size * 1.3));
        assert_eq!(bucket.border_radius, bucket.width / 2.0);
        assert_eq!(aggregate.label(), aggregate.point_count.to_string());
    }
}

#[test]
fn tapping_a_cluster_zooms_past_its_expansion() {
    let config = demo_config();
    let state = ClusterState::new()
        .on_markers_changed(demo_markers(42), &config)
        .on_region_changed(demo_region(), &config);

    let cluster = clustered(&state)
        .iter()
        .find(|a| a.is_cluster())
        .expect("100 points over 8.5 degrees must cluster at zoom 5")
        .clone();

    let activation = state.activate(&cluster, &config);
    assert_eq!(activation.aggregate, cluster);

    let camera = activation.camera.expect("zoom enabled");
    assert_eq!(camera.center, cluster.centroid);
    assert!(camera.zoom > 5.0, "tap must zoom in from the current level");
    assert!(camera.zoom <= config.index.max_zoom as f64 + config.camera.ceiling_overshoot);
    assert_eq!(camera.duration_ms, config.camera.animation_duration_ms);
}

#[test]
fn repeated_region_events_publish_identical_output() {
    let config = demo_config();
    let state: ClusterState = ClusterState::new().on_markers_changed(demo_markers(11), &config);

    let once = state.clone().on_region_changed(demo_region(), &config);
    let twice = once.clone().on_region_changed(demo_region(), &config);

    // Byte-identical regions must produce equal outputs: same ids, order,
    // and counts. The host's dirty check is exactly this comparison.
    assert_eq!(once.output(), twice.output());
}

#[test]
fn disabled_clustering_is_a_pure_passthrough() {
    let config = demo_config().with_cluster_enabled(false);
    let markers = demo_markers(3);

    let state: ClusterState = ClusterState::new()
        .on_markers_changed(markers.clone(), &config)
        .on_region_changed(demo_region(), &config);

    match state.output() {
        ClusterOutput::Passthrough(published) => assert_eq!(published, &markers),
        other => panic!("expected passthrough, got {:?}", other),
    }
}

#[test]
fn antimeridian_viewport_still_queries_a_bounded_envelope() {
    let config = demo_config();
    let markers = vec![
        RawMarker::new(0.0, 179.8),
        RawMarker::new(0.0, 179.85),
        RawMarker::new(0.1, 179.9),
    ];

    let state: ClusterState = ClusterState::new()
        .on_markers_changed(markers, &config)
        .on_region_changed(Region::new(0.0, 179.9, 1.0, 1.0), &config);

    // The reflected envelope is a known approximation; the contract here is
    // only that the query stays bounded and the pipeline does not error.
    assert!(matches!(state.output(), ClusterOutput::Clustered(_)));
}
