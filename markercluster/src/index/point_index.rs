//! Default clustering engine.
//!
//! Hierarchical greedy radius clustering in projected Web Mercator space.
//! Build walks zoom levels from `max_zoom` down to `min_zoom`; at each level
//! the aggregates of the level above are merged when they fall within the
//! pixel radius scaled to that zoom (`radius / (extent * 2^zoom)`). Each
//! level keeps its own R-tree so both the build-time neighbor lookups and
//! the query-time envelope lookups are logarithmic.
//!
//! All nodes live in one arena; an aggregate's [`ClusterId`] is its arena
//! slot, stable for the lifetime of this index value.

use std::collections::HashSet;
use std::f64::consts::PI;

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use tracing::debug;

use crate::geo::{Envelope, GeoPoint};
use crate::marker::MarkerRecord;

use super::{ClusterAggregate, ClusterId, IndexConfig, SpatialIndex};

/// Project longitude to Web Mercator x in [0, 1].
fn project_x(lon: f64) -> f64 {
    lon / 360.0 + 0.5
}

/// Project latitude to Web Mercator y in [0, 1] (0 = north pole).
fn project_y(lat: f64) -> f64 {
    let sin = lat.to_radians().sin();
    let y = 0.5 - 0.25 * ((1.0 + sin) / (1.0 - sin)).ln() / PI;
    y.clamp(0.0, 1.0)
}

/// Invert the projection back to a geographic point.
fn unproject(x: f64, y: f64) -> GeoPoint {
    let lon = (x - 0.5) * 360.0;
    let lat = 360.0 * (PI * (1.0 - 2.0 * y)).exp().atan() / PI - 90.0;
    GeoPoint::clamped(lat, lon)
}

/// One aggregate node. Leaves have no children and carry exactly one source.
#[derive(Debug, Clone)]
struct Node {
    /// Projected centroid x.
    x: f64,
    /// Projected centroid y.
    y: f64,
    /// Number of source points contained.
    point_count: usize,
    /// `original_index` of every contained source marker.
    sources: Vec<usize>,
    /// Arena ids merged into this cluster. Empty for leaves.
    children: Vec<usize>,
    /// Zoom level this cluster formed at; `max_zoom + 1` for leaves.
    formed_zoom: u8,
}

/// A projected node reference stored in the per-level R-trees.
#[derive(Debug, Clone, Copy)]
struct IndexedNode {
    x: f64,
    y: f64,
    arena_id: usize,
}

impl RTreeObject for IndexedNode {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.x, self.y])
    }
}

impl PointDistance for IndexedNode {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.x - point[0];
        let dy = self.y - point[1];
        dx * dx + dy * dy
    }
}

/// Hierarchical greedy clustering index over a fixed point set.
///
/// Immutable after [`build`](SpatialIndex::build); a changed point set means
/// a new `PointIndex`, never in-place mutation.
#[derive(Debug, Clone)]
pub struct PointIndex {
    config: IndexConfig,
    arena: Vec<Node>,
    /// Per-zoom trees; `trees[z - min_zoom]` serves queries at zoom `z`,
    /// with the last entry (`max_zoom + 1`) holding the raw leaves.
    trees: Vec<RTree<IndexedNode>>,
}

impl PointIndex {
    /// The zoom level above the clustered range, where only leaves exist.
    fn top_zoom(&self) -> u8 {
        self.config.max_zoom.saturating_add(1)
    }

    fn aggregate(&self, arena_id: usize) -> ClusterAggregate {
        let node = &self.arena[arena_id];
        ClusterAggregate {
            id: ClusterId(arena_id as u64),
            centroid: unproject(node.x, node.y),
            point_count: node.point_count,
            source_indices: node.sources.clone(),
        }
    }
}

fn build_tree(arena: &[Node], items: &[usize]) -> RTree<IndexedNode> {
    RTree::bulk_load(
        items
            .iter()
            .map(|&id| IndexedNode {
                x: arena[id].x,
                y: arena[id].y,
                arena_id: id,
            })
            .collect(),
    )
}

/// Merge the items of the level above into this zoom's aggregates.
///
/// Greedy pass in item order: each unassigned item gathers its unassigned
/// neighbors within radius; the group merges only when its combined count
/// reaches `min_points`, otherwise the item carries through unchanged and
/// its neighbors stay available to later groups.
fn cluster_level(
    arena: &mut Vec<Node>,
    items: &[usize],
    tree_above: &RTree<IndexedNode>,
    zoom: u8,
    config: &IndexConfig,
) -> Vec<usize> {
    let r = config.radius / (config.extent * f64::powi(2.0, zoom as i32));
    let r2 = r * r;

    let mut assigned: HashSet<usize> = HashSet::new();
    let mut level = Vec::with_capacity(items.len());

    for &id in items {
        if assigned.contains(&id) {
            continue;
        }
        let center = [arena[id].x, arena[id].y];
        let neighbor_ids: Vec<usize> = tree_above
            .locate_within_distance(center, r2)
            .map(|n| n.arena_id)
            .filter(|n| *n != id && !assigned.contains(n))
            .collect();

        let total: usize = arena[id].point_count
            + neighbor_ids
                .iter()
                .map(|&n| arena[n].point_count)
                .sum::<usize>();

        if neighbor_ids.is_empty() || total < config.min_points {
            assigned.insert(id);
            level.push(id);
            continue;
        }

        let mut members = Vec::with_capacity(neighbor_ids.len() + 1);
        members.push(id);
        members.extend(neighbor_ids);
        // Tree iteration order is an implementation detail; sorting keeps
        // the build bit-for-bit deterministic.
        members.sort_unstable();

        let mut x = 0.0;
        let mut y = 0.0;
        let mut sources = Vec::new();
        for &member in &members {
            let node = &arena[member];
            let weight = node.point_count as f64;
            x += node.x * weight;
            y += node.y * weight;
            sources.extend_from_slice(&node.sources);
            assigned.insert(member);
        }

        let new_id = arena.len();
        arena.push(Node {
            x: x / total as f64,
            y: y / total as f64,
            point_count: total,
            sources,
            children: members,
            formed_zoom: zoom,
        });
        level.push(new_id);
    }

    level
}

impl SpatialIndex for PointIndex {
    fn build(points: &[MarkerRecord], config: &IndexConfig) -> Self {
        let mut config = config.clone();
        // A max below min would make the zoom clamp in query() panic.
        config.max_zoom = config.max_zoom.max(config.min_zoom);

        let top_zoom = config.max_zoom.saturating_add(1);
        let mut arena: Vec<Node> = points
            .iter()
            .map(|point| {
                let x = project_x(point.coordinate.longitude());
                let y = project_y(point.coordinate.latitude());
                Node {
                    x,
                    y,
                    point_count: 1,
                    sources: vec![point.original_index],
                    children: Vec::new(),
                    formed_zoom: top_zoom,
                }
            })
            .collect();

        let mut current: Vec<usize> = (0..arena.len()).collect();
        let mut level_tree = build_tree(&arena, &current);
        let mut trees_desc = Vec::with_capacity((top_zoom - config.min_zoom) as usize + 1);

        for zoom in (config.min_zoom..=config.max_zoom).rev() {
            let next = cluster_level(&mut arena, &current, &level_tree, zoom, &config);
            let next_tree = build_tree(&arena, &next);
            trees_desc.push(std::mem::replace(&mut level_tree, next_tree));
            current = next;
        }
        trees_desc.push(level_tree);
        trees_desc.reverse();

        debug!(
            points = points.len(),
            nodes = arena.len(),
            levels = trees_desc.len(),
            "built point index"
        );

        Self {
            config,
            arena,
            trees: trees_desc,
        }
    }

    fn query(&self, envelope: &Envelope, zoom: u8) -> Vec<ClusterAggregate> {
        let zoom = zoom.clamp(self.config.min_zoom, self.top_zoom());
        let tree = &self.trees[(zoom - self.config.min_zoom) as usize];

        let corner_a = [project_x(envelope.xmin), project_y(envelope.ymax)];
        let corner_b = [project_x(envelope.xmax), project_y(envelope.ymin)];
        let bbox = AABB::from_corners(corner_a, corner_b);

        let mut ids: Vec<usize> = tree
            .locate_in_envelope(&bbox)
            .map(|n| n.arena_id)
            .collect();
        // Deterministic output order: queries must be repeatable.
        ids.sort_unstable();

        ids.into_iter().map(|id| self.aggregate(id)).collect()
    }

    fn expansion_zoom(&self, id: ClusterId) -> Option<u8> {
        let node = self.arena.get(id.0 as usize)?;
        if node.children.is_empty() {
            return None;
        }
        Some(node.formed_zoom.saturating_add(1))
    }
}
