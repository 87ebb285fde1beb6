//! In-memory road graph with per-node street and degree queries.

use geo::{BoundingRect, Centroid};
use geo_types::{Coord, MultiPoint, Point, Rect};
use hashbrown::{HashMap, HashSet};

use crate::models::road::{RoadEdge, RoadNode, POI_EDGE_NAME};

/// Undirected multigraph over the road snapshot.
///
/// Adjacency is an explicit edge-index table: parallel edges stay distinct
/// and a node's degree is its incident-edge count, self-loops counting twice.
pub struct RoadGraph {
    nodes: HashMap<i64, RoadNode>,
    edges: Vec<RoadEdge>,
    incident: HashMap<i64, Vec<usize>>,
}

impl RoadGraph {
    pub fn new(nodes: Vec<RoadNode>, edges: Vec<RoadEdge>) -> Self {
        let nodes: HashMap<i64, RoadNode> = nodes.into_iter().map(|n| (n.osmid, n)).collect();
        let mut incident: HashMap<i64, Vec<usize>> = HashMap::new();
        for (idx, edge) in edges.iter().enumerate() {
            incident.entry(edge.u).or_default().push(idx);
            incident.entry(edge.v).or_default().push(idx);
        }
        Self {
            nodes,
            edges,
            incident,
        }
    }

    pub fn edges(&self) -> &[RoadEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Incident-edge count of the node; zero for unknown nodes.
    pub fn degree(&self, osmid: i64) -> usize {
        self.incident.get(&osmid).map_or(0, Vec::len)
    }

    /// Names of the streets meeting at the node, deduplicated in first-seen
    /// edge order. List-valued rows are flattened; the POI connector
    /// pseudo-name is dropped.
    pub fn street_names_at(&self, osmid: i64) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut names = Vec::new();
        if let Some(edge_ids) = self.incident.get(&osmid) {
            for &idx in edge_ids {
                for name in self.edges[idx].name.as_slice() {
                    if name != POI_EDGE_NAME && seen.insert(name) {
                        names.push(name.clone());
                    }
                }
            }
        }
        names
    }

    /// Bounding box of every single-named edge row carrying `name`.
    pub fn street_bounds(&self, name: &str) -> Option<Rect<f64>> {
        let mut bounds: Option<Rect<f64>> = None;
        for edge in &self.edges {
            if edge.name.single() != Some(name) {
                continue;
            }
            let Some(rect) = edge.geometry.bounding_rect() else {
                continue;
            };
            bounds = Some(match bounds {
                None => rect,
                Some(acc) => merge_rects(acc, rect),
            });
        }
        bounds
    }

    /// Centroid of all node positions. `None` for an empty graph.
    ///
    /// Nodes are summed in osmid order so the result is identical from run
    /// to run.
    pub fn city_center(&self) -> Option<Point<f64>> {
        let mut ids: Vec<i64> = self.nodes.keys().copied().collect();
        ids.sort_unstable();
        let points: Vec<Point<f64>> = ids.iter().map(|id| self.nodes[id].point).collect();
        MultiPoint::from(points).centroid()
    }
}

fn merge_rects(a: Rect<f64>, b: Rect<f64>) -> Rect<f64> {
    Rect::new(
        Coord {
            x: a.min().x.min(b.min().x),
            y: a.min().y.min(b.min().y),
        },
        Coord {
            x: a.max().x.max(b.max().x),
            y: a.max().y.max(b.max().y),
        },
    )
}
