//! MarkerCluster - viewport-driven marker clustering for interactive maps
//!
//! This library groups nearby geographic point markers into numbered cluster
//! badges that split apart as the user zooms in. The host map widget feeds
//! viewport regions in; the library answers with the aggregates to render
//! and, on a cluster tap, the camera move that makes the cluster split.
//!
//! # High-Level API
//!
//! ```
//! use markercluster::config::ClusterConfig;
//! use markercluster::controller::{ClusterOutput, ClusterState};
//! use markercluster::geo::Region;
//! use markercluster::marker::RawMarker;
//!
//! let config = ClusterConfig::for_screen_width(360.0);
//! let markers = vec![
//!     RawMarker::new(52.23, 21.01),
//!     RawMarker::new(52.24, 21.02),
//!     RawMarker::new(50.06, 19.94),
//! ];
//!
//! let state: ClusterState = ClusterState::new()
//!     .on_markers_changed(markers, &config)
//!     .on_region_changed(Region::new(52.5, 19.2, 8.5, 8.5), &config);
//!
//! if let ClusterOutput::Clustered(aggregates) = state.output() {
//!     for aggregate in aggregates {
//!         println!("{} points at {}", aggregate.point_count, aggregate.centroid);
//!     }
//! }
//! ```

pub mod camera;
pub mod config;
pub mod controller;
pub mod geo;
pub mod index;
pub mod logging;
pub mod marker;
pub mod presentation;

/// Version of the MarkerCluster library and CLI.
///
/// This is synchronized across all components in the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
