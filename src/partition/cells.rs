//! Street cells: faces of the named-street arrangement tagged with the
//! streets that cover their boundary, indexed for point lookup.

use std::collections::BTreeSet;
use std::sync::Arc;

use geo::{Area, BoundingRect, Contains, Relate};
use geo_types::{LineString, Point, Polygon};
use hashbrown::HashSet;
use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{RTree, RTreeObject, AABB};
use tracing::info;

use crate::models::road::{RoadEdge, POI_EDGE_NAME};

use super::{faces, noding};

/// One bounded face of the street arrangement. `names` holds every street
/// whose row geometry is covered by the face; it is empty when the covering
/// test matched nothing.
#[derive(Debug, Clone)]
pub struct StreetCell {
    pub polygon: Polygon<f64>,
    pub names: BTreeSet<String>,
}

/// Cell wrapper stored in the R-tree, with a precomputed envelope.
struct IndexedCell {
    cell: Arc<StreetCell>,
    /// Position in the area-ascending cell order.
    rank: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedCell {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Spatial index over street cells, smallest cell first on ties.
pub struct StreetPartition {
    cells: Vec<Arc<StreetCell>>,
    tree: RTree<IndexedCell>,
}

impl StreetPartition {
    /// Builds the partition from edge rows. Rows with no name, list-valued
    /// names or the POI connector pseudo-name are left out; `highway_filter`,
    /// when set, additionally keeps only rows of those highway classes.
    pub fn build(edges: &[RoadEdge], highway_filter: Option<&HashSet<String>>) -> Self {
        let rows: Vec<(&str, &LineString<f64>)> = edges
            .iter()
            .filter_map(|edge| {
                let name = edge.name.single()?;
                if name == POI_EDGE_NAME {
                    return None;
                }
                if let Some(filter) = highway_filter {
                    match edge.highway.as_deref() {
                        Some(class) if filter.contains(class) => {}
                        _ => return None,
                    }
                }
                Some((name, &edge.geometry))
            })
            .collect();

        let arrangement = noding::node_lines(rows.iter().map(|(_, line)| *line));
        let polygons = faces::extract_faces(&arrangement);

        // assign each street to the faces that cover its row geometry
        let mut names: Vec<BTreeSet<String>> = vec![BTreeSet::new(); polygons.len()];
        let face_tree = RTree::bulk_load(
            polygons
                .iter()
                .enumerate()
                .filter_map(|(idx, polygon)| {
                    let rect = polygon.bounding_rect()?;
                    Some(GeomWithData::new(
                        Rectangle::from_corners(
                            [rect.min().x, rect.min().y],
                            [rect.max().x, rect.max().y],
                        ),
                        idx,
                    ))
                })
                .collect::<Vec<_>>(),
        );
        for (name, line) in &rows {
            let Some(rect) = line.bounding_rect() else {
                continue;
            };
            let envelope =
                AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]);
            for item in face_tree.locate_in_envelope_intersecting(&envelope) {
                let idx = item.data;
                if names[idx].contains(*name) {
                    continue;
                }
                if polygons[idx].relate(*line).is_covers() {
                    names[idx].insert((*name).to_owned());
                }
            }
        }

        let mut tagged: Vec<(f64, Polygon<f64>, BTreeSet<String>)> = polygons
            .into_iter()
            .zip(names)
            .map(|(polygon, names)| (polygon.unsigned_area(), polygon, names))
            .collect();
        tagged.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut cells = Vec::with_capacity(tagged.len());
        let mut items = Vec::with_capacity(tagged.len());
        for (rank, (_, polygon, names)) in tagged.into_iter().enumerate() {
            let envelope = polygon.bounding_rect().map(|rect| {
                AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y])
            });
            let cell = Arc::new(StreetCell { polygon, names });
            if let Some(envelope) = envelope {
                items.push(IndexedCell {
                    cell: Arc::clone(&cell),
                    rank,
                    envelope,
                });
            }
            cells.push(cell);
        }
        info!(
            "street partition: {} cells from {} named rows",
            cells.len(),
            rows.len()
        );
        Self {
            cells,
            tree: RTree::bulk_load(items),
        }
    }

    /// Smallest cell containing the point, if any. For nested faces this
    /// picks the most specific one.
    pub fn locate(&self, point: Point<f64>) -> Option<&StreetCell> {
        let envelope = AABB::from_point([point.x(), point.y()]);
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .filter(|item| item.cell.polygon.contains(&point))
            .min_by_key(|item| item.rank)
            .map(|item| item.cell.as_ref())
    }

    /// Cells in area-ascending order.
    pub fn cells(&self) -> impl Iterator<Item = &StreetCell> {
        self.cells.iter().map(|cell| cell.as_ref())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::road::StreetName;

    fn street(name: &str, highway: &str, coords: &[(f64, f64)]) -> RoadEdge {
        RoadEdge {
            u: 0,
            v: 0,
            key: 0,
            name: StreetName::Single(name.to_owned()),
            highway: Some(highway.to_owned()),
            geometry: LineString::from(coords.to_vec()),
        }
    }

    /// Elm runs along the south and east of the unit block, Oak along the
    /// west and north, both continuing past the block like real streets.
    fn quadrant_rows() -> Vec<RoadEdge> {
        vec![
            street("Elm", "residential", &[(-1.0, 0.0), (0.0, 0.0)]),
            street("Elm", "residential", &[(0.0, 0.0), (1.0, 0.0)]),
            street("Elm", "residential", &[(1.0, 0.0), (1.0, 1.0)]),
            street("Elm", "residential", &[(1.0, 1.0), (1.0, 2.0)]),
            street("Oak", "residential", &[(0.0, -1.0), (0.0, 0.0)]),
            street("Oak", "residential", &[(0.0, 0.0), (0.0, 1.0)]),
            street("Oak", "residential", &[(0.0, 1.0), (1.0, 1.0)]),
            street("Oak", "residential", &[(1.0, 1.0), (2.0, 1.0)]),
        ]
    }

    #[test]
    fn enclosed_quadrant_carries_both_street_names() {
        let partition = StreetPartition::build(&quadrant_rows(), None);
        assert_eq!(partition.len(), 1);
        let cell = partition.locate(Point::new(0.5, 0.5)).unwrap();
        let names: Vec<&str> = cell.names.iter().map(String::as_str).collect();
        assert_eq!(names, ["Elm", "Oak"]);
    }

    #[test]
    fn point_outside_every_cell_finds_nothing() {
        let partition = StreetPartition::build(&quadrant_rows(), None);
        assert!(partition.locate(Point::new(5.0, 5.0)).is_none());
        assert!(partition.locate(Point::new(-0.5, -0.5)).is_none());
    }

    #[test]
    fn uncovered_face_keeps_empty_names() {
        // both rows overshoot the block as single rows, so neither is
        // covered by the face they enclose
        let rows = vec![
            street("Elm", "residential", &[(-1.0, 0.0), (1.0, 0.0), (1.0, 1.0)]),
            street("Oak", "residential", &[(0.0, -1.0), (0.0, 1.0), (1.0, 1.0)]),
        ];
        let partition = StreetPartition::build(&rows, None);
        assert_eq!(partition.len(), 1);
        let cell = partition.locate(Point::new(0.5, 0.5)).unwrap();
        assert!(cell.names.is_empty());
    }

    #[test]
    fn unnamed_rows_never_bound_cells() {
        let mut rows = quadrant_rows();
        for row in &mut rows {
            if row.name.single() == Some("Oak") {
                row.name = StreetName::None;
            }
        }
        let partition = StreetPartition::build(&rows, None);
        assert_eq!(partition.len(), 0);
    }

    #[test]
    fn multi_named_rows_are_excluded() {
        let mut rows = quadrant_rows();
        // renaming one wall to a list breaks the enclosure
        rows[1].name = StreetName::Multiple(vec!["Elm".into(), "Elm South".into()]);
        let partition = StreetPartition::build(&rows, None);
        assert_eq!(partition.len(), 0);
    }

    #[test]
    fn poi_connector_rows_are_excluded() {
        let mut rows = quadrant_rows();
        rows.push(street("poi", "footway", &[(0.5, 0.5), (0.5, 0.0)]));
        let partition = StreetPartition::build(&rows, None);
        assert_eq!(partition.len(), 1);
        let cell = partition.locate(Point::new(0.25, 0.25)).unwrap();
        assert!(!cell.names.contains("poi"));
    }

    #[test]
    fn highway_filter_drops_other_classes() {
        let mut rows = quadrant_rows();
        for row in &mut rows {
            if row.name.single() == Some("Elm") {
                row.highway = Some("primary".to_owned());
            }
        }
        let primary: HashSet<String> = ["primary".to_string()].into_iter().collect();
        // Oak is residential, so the primary partition loses the enclosure
        let partition = StreetPartition::build(&rows, Some(&primary));
        assert_eq!(partition.len(), 0);
        let full = StreetPartition::build(&rows, None);
        assert_eq!(full.len(), 1);
    }

    #[test]
    fn rebuilding_yields_identical_cells() {
        let a = StreetPartition::build(&quadrant_rows(), None);
        let b = StreetPartition::build(&quadrant_rows(), None);
        assert_eq!(a.len(), b.len());
        for (left, right) in a.cells().zip(b.cells()) {
            assert_eq!(left.names, right.names);
            assert_eq!(left.polygon.exterior().0, right.polygon.exterior().0);
        }
    }

    #[test]
    fn city_block_grid_forms_four_cells() {
        let rows = vec![
            street("First", "residential", &[(0.0, 0.0), (2.0, 0.0)]),
            street("Second", "residential", &[(0.0, 1.0), (2.0, 1.0)]),
            street("Third", "residential", &[(0.0, 2.0), (2.0, 2.0)]),
            street("A", "residential", &[(0.0, 0.0), (0.0, 2.0)]),
            street("B", "residential", &[(1.0, 0.0), (1.0, 2.0)]),
            street("C", "residential", &[(2.0, 0.0), (2.0, 2.0)]),
        ];
        let partition = StreetPartition::build(&rows, None);
        assert_eq!(partition.len(), 4);
        // every row spans two blocks, so no single block covers a full row
        let cell = partition.locate(Point::new(0.5, 0.5)).unwrap();
        assert!(cell.names.is_empty());
    }
}
