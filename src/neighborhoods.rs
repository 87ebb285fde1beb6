//! Neighborhood polygons and point-in-neighborhood lookup.

use std::convert::TryFrom;
use std::path::Path;

use geo::{BoundingRect, Contains};
use geo_types::{MultiPolygon, Point};
use geojson::{FeatureCollection, GeoJson};
use rstar::{RTree, RTreeObject, AABB};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::Result;

/// A named (or occasionally nameless) neighborhood polygon.
#[derive(Debug, Clone)]
pub struct Neighborhood {
    pub name: Option<String>,
    pub geometry: MultiPolygon<f64>,
}

struct IndexedNeighborhood {
    neighborhood: Neighborhood,
    /// Input order; lookups return the earliest named match.
    order: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedNeighborhood {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// R-tree over neighborhood envelopes with exact containment checks.
pub struct NeighborhoodIndex {
    tree: RTree<IndexedNeighborhood>,
}

impl NeighborhoodIndex {
    pub fn build(neighborhoods: Vec<Neighborhood>) -> Self {
        let items: Vec<IndexedNeighborhood> = neighborhoods
            .into_iter()
            .enumerate()
            .filter_map(|(order, neighborhood)| {
                let rect = neighborhood.geometry.bounding_rect()?;
                Some(IndexedNeighborhood {
                    neighborhood,
                    order,
                    envelope: AABB::from_corners(
                        [rect.min().x, rect.min().y],
                        [rect.max().x, rect.max().y],
                    ),
                })
            })
            .collect();
        info!("neighborhood index: {} polygons", items.len());
        Self {
            tree: RTree::bulk_load(items),
        }
    }

    /// Name of the first named neighborhood containing the point.
    pub fn locate(&self, point: Point<f64>) -> Option<&str> {
        let envelope = AABB::from_point([point.x(), point.y()]);
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .filter(|item| {
                item.neighborhood.name.is_some() && item.neighborhood.geometry.contains(&point)
            })
            .min_by_key(|item| item.order)
            .and_then(|item| item.neighborhood.name.as_deref())
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

/// Loads neighborhood polygons from a GeoJSON feature collection. Features
/// with non-polygonal geometry are skipped with a warning.
pub fn load_neighborhoods(path: &Path) -> Result<Vec<Neighborhood>> {
    let raw = std::fs::read_to_string(path)?;
    let neighborhoods = parse_neighborhoods(&raw)?;
    info!(
        "loaded {} neighborhoods from {}",
        neighborhoods.len(),
        path.display()
    );
    Ok(neighborhoods)
}

pub fn parse_neighborhoods(raw: &str) -> Result<Vec<Neighborhood>> {
    let collection = FeatureCollection::try_from(raw.parse::<GeoJson>()?)?;
    let mut neighborhoods = Vec::with_capacity(collection.features.len());
    for feature in collection.features {
        let name = feature
            .properties
            .as_ref()
            .and_then(|p| p.get("name"))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_owned);
        let Some(geometry) = feature.geometry else {
            continue;
        };
        let geometry = match geo_types::Geometry::<f64>::try_from(geometry)? {
            geo_types::Geometry::Polygon(polygon) => MultiPolygon(vec![polygon]),
            geo_types::Geometry::MultiPolygon(multi) => multi,
            _ => {
                warn!(
                    "skipping neighborhood {:?} with non-polygonal geometry",
                    name.as_deref().unwrap_or("<unnamed>")
                );
                continue;
            }
        };
        neighborhoods.push(Neighborhood { name, geometry });
    }
    Ok(neighborhoods)
}
