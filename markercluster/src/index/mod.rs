//! Spatial clustering index.
//!
//! The [`SpatialIndex`] trait is the contract the cluster controller
//! consumes: build an immutable index from a point set, query it with an
//! envelope and a zoom level, and look up the zoom at which a given cluster
//! starts splitting. The controller is generic over this trait, so an
//! application can plug in any clustering engine.
//!
//! [`PointIndex`] is the default engine: hierarchical greedy radius
//! clustering in projected Web Mercator space, one level per zoom, with
//! neighbor and envelope lookups served by an R-tree per level.
//!
//! An index is immutable after build. A changed point set always yields a
//! new index value, never an in-place mutation, so queries against the old
//! index stay valid until the replacement is fully constructed.

mod config;
mod point_index;

pub use config::{
    IndexConfig, DEFAULT_EXTENT, DEFAULT_MAX_ZOOM, DEFAULT_MIN_POINTS, DEFAULT_MIN_ZOOM,
    DEFAULT_NODE_SIZE, DEFAULT_RADIUS_FRACTION, DEFAULT_SCREEN_WIDTH_PX,
};
pub use point_index::PointIndex;

use crate::geo::{Envelope, GeoPoint};
use crate::marker::MarkerRecord;

/// Opaque identifier for an aggregate within one index build.
///
/// Ids are stable for the lifetime of the index that produced them and are
/// meaningless across rebuilds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClusterId(pub u64);

impl std::fmt::Display for ClusterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One query result: either a merged cluster or a single unmerged leaf.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterAggregate {
    /// Identifier usable with [`SpatialIndex::expansion_zoom`].
    pub id: ClusterId,
    /// Weighted center of the contained points.
    pub centroid: GeoPoint,
    /// Number of source points contained. `1` means a leaf.
    pub point_count: usize,
    /// `original_index` of every contained source marker.
    pub source_indices: Vec<usize>,
}

impl ClusterAggregate {
    /// Whether this aggregate represents a merged cluster (badge) rather
    /// than a single leaf marker.
    pub fn is_cluster(&self) -> bool {
        self.point_count > 1
    }

    /// The badge label: the point count as text.
    pub fn label(&self) -> String {
        self.point_count.to_string()
    }
}

/// Contract for a viewport-queryable clustering engine.
pub trait SpatialIndex: Sized {
    /// Build an index over a point set.
    ///
    /// Deterministic: the same points and config always produce the same
    /// index, and therefore identical query results.
    fn build(points: &[MarkerRecord], config: &IndexConfig) -> Self;

    /// Return the aggregates visible inside `envelope` at `zoom`.
    ///
    /// Leaves come back with `point_count == 1`. Implementations need not be
    /// bbox-exact; callers must tolerate aggregates slightly outside the
    /// envelope. Queries never mutate the index: repeated identical calls
    /// return identical lists, same ids, same order.
    fn query(&self, envelope: &Envelope, zoom: u8) -> Vec<ClusterAggregate>;

    /// The minimum zoom at which the given cluster starts splitting.
    ///
    /// `None` for an unknown id or a leaf.
    fn expansion_zoom(&self, id: ClusterId) -> Option<u8>;
}
