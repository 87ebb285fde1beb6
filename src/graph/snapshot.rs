//! Loads road graph snapshots exported as GeoJSON feature collections.
//!
//! Nodes are point features carrying an `osmid`; edges are linestring
//! features carrying `u`, `v`, an optional `key`, `name` and `highway`.

use std::convert::TryFrom;
use std::path::Path;

use geojson::{FeatureCollection, GeoJson};
use serde_json::Value;
use tracing::info;

use crate::error::{Error, Result};
use crate::models::road::{RoadEdge, RoadNode, StreetName};

use super::RoadGraph;

/// Reads node and edge collections from disk and assembles the graph.
pub fn load_road_graph(nodes_path: &Path, edges_path: &Path) -> Result<RoadGraph> {
    let raw = std::fs::read_to_string(nodes_path)?;
    let nodes = parse_nodes(&raw)?;
    let raw = std::fs::read_to_string(edges_path)?;
    let edges = parse_edges(&raw)?;
    info!(
        "loaded road snapshot: {} nodes, {} edges",
        nodes.len(),
        edges.len()
    );
    Ok(RoadGraph::new(nodes, edges))
}

pub fn parse_nodes(raw: &str) -> Result<Vec<RoadNode>> {
    let collection = FeatureCollection::try_from(raw.parse::<GeoJson>()?)?;
    let mut nodes = Vec::with_capacity(collection.features.len());
    for feature in collection.features {
        let osmid = require_i64(feature.properties.as_ref(), "osmid", "node")?;
        let Some(geometry) = feature.geometry else {
            return Err(Error::InvalidSnapshot(format!("node {osmid} has no geometry")));
        };
        match geo_types::Geometry::<f64>::try_from(geometry)? {
            geo_types::Geometry::Point(point) => nodes.push(RoadNode { osmid, point }),
            _ => {
                return Err(Error::InvalidSnapshot(format!(
                    "node {osmid} has non-point geometry"
                )))
            }
        }
    }
    Ok(nodes)
}

pub fn parse_edges(raw: &str) -> Result<Vec<RoadEdge>> {
    let collection = FeatureCollection::try_from(raw.parse::<GeoJson>()?)?;
    let mut edges = Vec::with_capacity(collection.features.len());
    for feature in collection.features {
        let props = feature.properties.as_ref();
        let u = require_i64(props, "u", "edge")?;
        let v = require_i64(props, "v", "edge")?;
        let key = props
            .and_then(|p| p.get("key"))
            .and_then(Value::as_u64)
            .unwrap_or(0) as u32;
        let name = StreetName::from_property(props.and_then(|p| p.get("name")));
        let highway = highway_class(props.and_then(|p| p.get("highway")));
        let Some(geometry) = feature.geometry else {
            return Err(Error::InvalidSnapshot(format!("edge {u}-{v} has no geometry")));
        };
        match geo_types::Geometry::<f64>::try_from(geometry)? {
            geo_types::Geometry::LineString(geometry) => edges.push(RoadEdge {
                u,
                v,
                key,
                name,
                highway,
                geometry,
            }),
            _ => {
                return Err(Error::InvalidSnapshot(format!(
                    "edge {u}-{v} has non-linestring geometry"
                )))
            }
        }
    }
    Ok(edges)
}

fn require_i64(
    props: Option<&geojson::JsonObject>,
    field: &str,
    kind: &str,
) -> Result<i64> {
    props
        .and_then(|p| p.get(field))
        .and_then(Value::as_i64)
        .ok_or_else(|| Error::InvalidSnapshot(format!("{kind} feature missing integer '{field}'")))
}

/// Highway class of an edge row. List-valued tags keep their first entry.
fn highway_class(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .find(|s| !s.is_empty())
            .map(str::to_owned),
        _ => None,
    }
}
