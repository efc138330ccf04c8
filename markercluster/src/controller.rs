//! Viewport-driven clustering controller.
//!
//! [`ClusterState`] is an explicit, immutable snapshot of everything the
//! clustering pipeline knows: the marker set, the built index, the last
//! region, and the published output. The two triggers are pure transition
//! functions that consume the old state and return a new one:
//!
//! - [`ClusterState::on_markers_changed`] — converts the input markers and
//!   rebuilds the index. This is the only place a rebuild happens.
//! - [`ClusterState::on_region_changed`] — derives zoom and envelope from
//!   the region and queries the existing index. Never rebuilds.
//!
//! The host owns calling these on the matching events and deciding whether
//! to re-render afterwards; [`ClusterOutput`] implements `PartialEq` so the
//! dirty check is a plain equality comparison, separate from the state
//! computation itself.
//!
//! Everything runs synchronously on the caller's thread: a transition
//! completes before the event handler returns, and the index is replaced
//! wholesale rather than mutated, so there is no locking and no cancellation
//! model. Callers issuing rapid region changes should coalesce events
//! themselves (e.g. only act on the settled region).

use tracing::{debug, warn};

use crate::camera::Activation;
use crate::config::ClusterConfig;
use crate::geo::{envelope_from_region, zoom_from_region, Region};
use crate::index::{ClusterAggregate, PointIndex, SpatialIndex};
use crate::marker::{convert_markers, MarkerRecord, RawMarker};

/// What the host should render.
#[derive(Debug, Clone, PartialEq)]
pub enum ClusterOutput {
    /// Clustering is active: a mix of badges (`point_count > 1`) and leaves
    /// (`point_count == 1`, rendered as the original marker via
    /// `source_indices[0]`).
    Clustered(Vec<ClusterAggregate>),
    /// Clustering is off (by configuration or after a conversion failure):
    /// the raw marker list, input order, unchanged.
    Passthrough(Vec<RawMarker>),
    /// Nothing clustered to show: no markers yet, no region yet, or the
    /// viewport is below the minimum zoom ("zoom in to see markers").
    Empty,
}

/// Immutable snapshot of the clustering pipeline.
///
/// Generic over the index engine; [`PointIndex`] is the default.
#[derive(Debug, Clone)]
pub struct ClusterState<I: SpatialIndex = PointIndex> {
    markers: Vec<RawMarker>,
    records: Vec<MarkerRecord>,
    index: Option<I>,
    region: Option<Region>,
    /// Conversion failed for the current marker set; clustering stays off
    /// until the markers change again.
    degraded: bool,
    output: ClusterOutput,
}

impl<I: SpatialIndex> Default for ClusterState<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: SpatialIndex> ClusterState<I> {
    /// Initial state: no markers, no region, nothing published.
    pub fn new() -> Self {
        Self {
            markers: Vec::new(),
            records: Vec::new(),
            index: None,
            region: None,
            degraded: false,
            output: ClusterOutput::Empty,
        }
    }

    /// The currently published output.
    pub fn output(&self) -> &ClusterOutput {
        &self.output
    }

    /// The last region seen, if any.
    pub fn region(&self) -> Option<&Region> {
        self.region.as_ref()
    }

    /// The current raw marker list, input order.
    ///
    /// Hosts re-associate a leaf aggregate with its original marker via
    /// `markers()[aggregate.source_indices[0]]`.
    pub fn markers(&self) -> &[RawMarker] {
        &self.markers
    }

    /// The validated records behind the current index. Empty in
    /// pass-through and degraded modes.
    pub fn records(&self) -> &[MarkerRecord] {
        &self.records
    }

    /// Whether the current marker set failed conversion and the state is in
    /// degraded pass-through mode.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Marker-set trigger: convert the input and rebuild the index.
    ///
    /// Rebuild cost is paid inline here, once per marker-set change; region
    /// changes afterwards are cheap queries against the result. If any
    /// marker fails conversion the whole set degrades to pass-through with
    /// a warning, so the map shows unclustered markers instead of nothing.
    pub fn on_markers_changed(self, markers: Vec<RawMarker>, config: &ClusterConfig) -> Self {
        if !config.cluster_enabled {
            let output = ClusterOutput::Passthrough(markers.clone());
            return Self {
                markers,
                records: Vec::new(),
                index: None,
                region: self.region,
                degraded: false,
                output,
            };
        }

        let records = match convert_markers(&markers) {
            Ok(records) => records,
            Err(error) => {
                warn!(%error, "marker conversion failed; rendering markers unclustered");
                let output = ClusterOutput::Passthrough(markers.clone());
                return Self {
                    markers,
                    records: Vec::new(),
                    index: None,
                    region: self.region,
                    degraded: true,
                    output,
                };
            }
        };

        if records.is_empty() {
            return Self {
                markers,
                records,
                index: None,
                region: self.region,
                degraded: false,
                output: ClusterOutput::Empty,
            };
        }

        debug!(markers = records.len(), "rebuilding spatial index");
        let index = I::build(&records, &config.index);
        let next = Self {
            markers,
            records,
            index: Some(index),
            region: self.region,
            degraded: false,
            output: ClusterOutput::Empty,
        };

        // A region seen before the markers arrived still applies.
        match next.region {
            Some(region) => next.on_region_changed(region, config),
            None => next,
        }
    }

    /// Region trigger: derive zoom and envelope, query the existing index.
    ///
    /// Pure query, no index mutation: identical regions yield identical
    /// outputs. A zoom below `min_zoom` (including the non-finite case)
    /// publishes [`ClusterOutput::Empty`].
    pub fn on_region_changed(self, region: Region, config: &ClusterConfig) -> Self {
        let mut next = self;
        next.region = Some(region);

        // Pass-through modes ignore the viewport entirely.
        if !config.cluster_enabled || next.degraded {
            return next;
        }

        let index = match &next.index {
            Some(index) => index,
            None => {
                next.output = ClusterOutput::Empty;
                return next;
            }
        };

        // A span that would make the zoom non-finite is treated as below
        // minimum zoom rather than propagated as an error.
        if !region.longitude_delta.is_finite() || region.longitude_delta <= 0.0 {
            next.output = ClusterOutput::Empty;
            return next;
        }

        let zoom = zoom_from_region(&region, config.screen_width_px).floor();
        if zoom < config.index.min_zoom as f64 {
            next.output = ClusterOutput::Empty;
            return next;
        }
        let query_zoom = zoom.min(u8::MAX as f64) as u8;

        let envelope = envelope_from_region(&region);
        let aggregates = index.query(&envelope, query_zoom);
        debug!(
            zoom = query_zoom,
            %envelope,
            aggregates = aggregates.len(),
            "viewport query"
        );

        next.output = ClusterOutput::Clustered(aggregates);
        next
    }

    /// Cluster tap: always reports the aggregate, and resolves a camera
    /// intent when zoom interaction is enabled and an index exists.
    pub fn activate(&self, aggregate: &ClusterAggregate, config: &ClusterConfig) -> Activation {
        match &self.index {
            Some(index) => crate::camera::resolve_activation(
                index,
                aggregate,
                config.index.max_zoom,
                &config.camera,
            ),
            None => Activation {
                aggregate: aggregate.clone(),
                camera: None,
            },
        }
    }
}
