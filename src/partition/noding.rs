//! Noding: splits street polylines at their mutual intersections, producing
//! a planar node/edge arrangement with shared vertices.

use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo_types::{Coord, Line, LineString};
use hashbrown::{HashMap, HashSet};
use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{RTree, AABB};

/// Snap grid of roughly a centimeter in degrees. Intersection points
/// computed from different segment pairs must land on the same node.
const SNAP_SCALE: f64 = 1e7;

type SegmentItem = GeomWithData<Rectangle<[f64; 2]>, usize>;

/// Planar arrangement produced by noding: unique snapped vertices and
/// deduplicated undirected edges between them.
#[derive(Debug, Default)]
pub struct Arrangement {
    pub nodes: Vec<Coord<f64>>,
    pub edges: Vec<(usize, usize)>,
}

/// Breaks the input polylines into segments, splits every segment at each
/// crossing or collinear overlap, and snaps the result onto a shared grid.
pub fn node_lines<'a>(lines: impl IntoIterator<Item = &'a LineString<f64>>) -> Arrangement {
    let segments: Vec<Line<f64>> = lines
        .into_iter()
        .flat_map(|line| line.lines())
        .filter(|segment| segment.start != segment.end)
        .collect();

    let tree = RTree::bulk_load(
        segments
            .iter()
            .enumerate()
            .map(|(idx, segment)| GeomWithData::new(segment_rectangle(segment), idx))
            .collect::<Vec<SegmentItem>>(),
    );

    // collect split points per segment from every intersecting pair
    let mut splits: Vec<Vec<Coord<f64>>> = vec![Vec::new(); segments.len()];
    for (i, segment) in segments.iter().enumerate() {
        let envelope = segment_envelope(segment);
        for item in tree.locate_in_envelope_intersecting(&envelope) {
            let j = item.data;
            if j <= i {
                continue;
            }
            match line_intersection(*segment, segments[j]) {
                Some(LineIntersection::SinglePoint { intersection, .. }) => {
                    splits[i].push(intersection);
                    splits[j].push(intersection);
                }
                Some(LineIntersection::Collinear { intersection }) => {
                    splits[i].push(intersection.start);
                    splits[i].push(intersection.end);
                    splits[j].push(intersection.start);
                    splits[j].push(intersection.end);
                }
                None => {}
            }
        }
    }

    let mut node_ids: HashMap<(i64, i64), usize> = HashMap::new();
    let mut nodes: Vec<Coord<f64>> = Vec::new();
    let mut intern = |c: Coord<f64>| -> usize {
        let key = (
            (c.x * SNAP_SCALE).round() as i64,
            (c.y * SNAP_SCALE).round() as i64,
        );
        *node_ids.entry(key).or_insert_with(|| {
            nodes.push(Coord {
                x: key.0 as f64 / SNAP_SCALE,
                y: key.1 as f64 / SNAP_SCALE,
            });
            nodes.len() - 1
        })
    };

    let mut edge_set: HashSet<(usize, usize)> = HashSet::new();
    let mut edges: Vec<(usize, usize)> = Vec::new();
    for (segment, mut cuts) in segments.iter().zip(splits) {
        cuts.push(segment.start);
        cuts.push(segment.end);
        // order cut points along the segment
        let origin = segment.start;
        let dx = segment.end.x - origin.x;
        let dy = segment.end.y - origin.y;
        cuts.sort_by(|a, b| {
            let ta = (a.x - origin.x) * dx + (a.y - origin.y) * dy;
            let tb = (b.x - origin.x) * dx + (b.y - origin.y) * dy;
            ta.total_cmp(&tb)
        });

        let mut prev: Option<usize> = None;
        for cut in cuts {
            let id = intern(cut);
            if let Some(p) = prev {
                if p != id {
                    let key = (p.min(id), p.max(id));
                    if edge_set.insert(key) {
                        edges.push(key);
                    }
                }
            }
            prev = Some(id);
        }
    }

    Arrangement { nodes, edges }
}

fn segment_rectangle(segment: &Line<f64>) -> Rectangle<[f64; 2]> {
    Rectangle::from_corners(
        [
            segment.start.x.min(segment.end.x),
            segment.start.y.min(segment.end.y),
        ],
        [
            segment.start.x.max(segment.end.x),
            segment.start.y.max(segment.end.y),
        ],
    )
}

fn segment_envelope(segment: &Line<f64>) -> AABB<[f64; 2]> {
    AABB::from_corners(
        [
            segment.start.x.min(segment.end.x),
            segment.start.y.min(segment.end.y),
        ],
        [
            segment.start.x.max(segment.end.x),
            segment.start.y.max(segment.end.y),
        ],
    )
}
