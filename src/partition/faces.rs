//! Face extraction: prunes bridge edges from the arrangement, then walks
//! angular-ordered half-edges to trace every bounded face.

use geo_types::{Coord, LineString, Polygon};

use super::noding::Arrangement;

/// Rings below this signed area (squared degrees) are snap-degenerate
/// slivers, not faces.
const MIN_FACE_AREA: f64 = 1e-14;

/// Bounded faces of the arrangement, as counterclockwise exterior rings.
pub fn extract_faces(arrangement: &Arrangement) -> Vec<Polygon<f64>> {
    let keep = non_bridge_edges(arrangement);
    trace_faces(arrangement, &keep)
}

/// Marks edges that lie on a cycle. Bridge edges (including every dangling
/// chain) cannot border a bounded face and would break the face walk.
fn non_bridge_edges(arrangement: &Arrangement) -> Vec<bool> {
    let node_count = arrangement.nodes.len();
    let mut adjacency: Vec<Vec<(usize, usize)>> = vec![Vec::new(); node_count];
    for (idx, &(u, v)) in arrangement.edges.iter().enumerate() {
        adjacency[u].push((idx, v));
        adjacency[v].push((idx, u));
    }

    const UNSEEN: usize = usize::MAX;
    const NO_EDGE: usize = usize::MAX;
    let mut keep = vec![true; arrangement.edges.len()];
    let mut disc = vec![UNSEEN; node_count];
    let mut low = vec![UNSEEN; node_count];
    let mut timer = 0usize;
    // iterative lowlink DFS; street chains can be thousands of nodes deep
    let mut stack: Vec<(usize, usize, usize)> = Vec::new();

    for root in 0..node_count {
        if disc[root] != UNSEEN || adjacency[root].is_empty() {
            continue;
        }
        disc[root] = timer;
        low[root] = timer;
        timer += 1;
        stack.push((root, NO_EDGE, 0));
        while let Some(frame) = stack.last_mut() {
            let node = frame.0;
            let via_edge = frame.1;
            if frame.2 < adjacency[node].len() {
                let (edge_idx, next) = adjacency[node][frame.2];
                frame.2 += 1;
                if edge_idx == via_edge {
                    continue;
                }
                if disc[next] == UNSEEN {
                    disc[next] = timer;
                    low[next] = timer;
                    timer += 1;
                    stack.push((next, edge_idx, 0));
                } else if disc[next] < low[node] {
                    low[node] = disc[next];
                }
            } else {
                stack.pop();
                if let Some(parent) = stack.last() {
                    let parent_node = parent.0;
                    if low[node] < low[parent_node] {
                        low[parent_node] = low[node];
                    }
                    if low[node] > disc[parent_node] {
                        keep[via_edge] = false;
                    }
                }
            }
        }
    }
    keep
}

/// Walks half-edges, always taking the next edge clockwise from the reversed
/// entry edge. Each orbit traces one face; counterclockwise (positive-area)
/// orbits are the bounded ones.
fn trace_faces(arrangement: &Arrangement, keep: &[bool]) -> Vec<Polygon<f64>> {
    // half-edge 2k runs u->v of edge k, 2k+1 runs v->u
    let edge_count = arrangement.edges.len();
    let tail = |he: usize| {
        let (u, v) = arrangement.edges[he / 2];
        if he % 2 == 0 {
            u
        } else {
            v
        }
    };
    let head = |he: usize| {
        let (u, v) = arrangement.edges[he / 2];
        if he % 2 == 0 {
            v
        } else {
            u
        }
    };

    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); arrangement.nodes.len()];
    for (idx, &(u, v)) in arrangement.edges.iter().enumerate() {
        if !keep[idx] {
            continue;
        }
        outgoing[u].push(2 * idx);
        outgoing[v].push(2 * idx + 1);
    }
    for (node, list) in outgoing.iter_mut().enumerate() {
        let from = arrangement.nodes[node];
        list.sort_by(|&a, &b| {
            let angle = |he: usize| {
                let to = arrangement.nodes[head(he)];
                (to.y - from.y).atan2(to.x - from.x)
            };
            angle(a).total_cmp(&angle(b))
        });
    }
    let mut slot = vec![usize::MAX; 2 * edge_count];
    for list in &outgoing {
        for (i, &he) in list.iter().enumerate() {
            slot[he] = i;
        }
    }

    let mut visited = vec![false; 2 * edge_count];
    let mut faces = Vec::new();
    for start in 0..2 * edge_count {
        if visited[start] || !keep[start / 2] {
            continue;
        }
        let mut ring: Vec<Coord<f64>> = Vec::new();
        let mut he = start;
        loop {
            visited[he] = true;
            ring.push(arrangement.nodes[tail(he)]);
            let list = &outgoing[head(he)];
            let i = slot[he ^ 1];
            he = list[(i + list.len() - 1) % list.len()];
            if he == start {
                break;
            }
        }
        if signed_area(&ring) > MIN_FACE_AREA {
            let first = ring[0];
            ring.push(first);
            faces.push(Polygon::new(LineString::from(ring), vec![]));
        }
    }
    faces
}

fn signed_area(ring: &[Coord<f64>]) -> f64 {
    let mut sum = 0.0;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}
