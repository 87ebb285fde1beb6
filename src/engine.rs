//! The feature engine: builds every spatial index once, then answers
//! per-POI descriptor queries.

use chrono::Utc;
use geo_types::Point;
use hashbrown::HashSet;
use rand::Rng;
use tracing::info;

use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::geometry::{diagonal_ratio, haversine_m, initial_bearing, round_point};
use crate::graph::RoadGraph;
use crate::landmarks::LandmarkIndex;
use crate::models::{
    CardinalDirection, FeatureRecord, GeoPoint, NearbyLandmark, PoiRecord, StreetPosition,
};
use crate::neighborhoods::{Neighborhood, NeighborhoodIndex};
use crate::partition::StreetPartition;

pub struct FeatureEngine {
    graph: RoadGraph,
    streets: StreetPartition,
    primary_streets: StreetPartition,
    neighborhoods: NeighborhoodIndex,
    landmarks: LandmarkIndex,
    city_center: Point<f64>,
    config: EngineConfig,
}

impl FeatureEngine {
    /// Builds both street partitions, the neighborhood index and the
    /// landmark table. Fails on a graph with no nodes, which has no center.
    pub fn new(
        graph: RoadGraph,
        neighborhoods: Vec<Neighborhood>,
        pois: &[PoiRecord],
        config: EngineConfig,
    ) -> Result<Self> {
        let city_center = graph.city_center().ok_or(Error::EmptyRoadGraph)?;
        let primary: HashSet<String> = config.primary_highways.iter().cloned().collect();
        let streets = StreetPartition::build(graph.edges(), None);
        let primary_streets = StreetPartition::build(graph.edges(), Some(&primary));
        let neighborhoods = NeighborhoodIndex::build(neighborhoods);
        let landmarks = LandmarkIndex::build(pois, config.landmark_radius_m);
        info!(
            "engine ready: {} nodes, {} edges, {} cells ({} primary), {} neighborhoods",
            graph.node_count(),
            graph.edge_count(),
            streets.len(),
            primary_streets.len(),
            neighborhoods.len(),
        );
        Ok(Self {
            graph,
            streets,
            primary_streets,
            neighborhoods,
            landmarks,
            city_center,
            config,
        })
    }

    /// Streets bounding the cell that contains `point`. `None` when no cell
    /// contains it or the cell carries no names. Query coordinates are
    /// rounded first so nearby lookups hit the same cell.
    pub fn nearby_streets(&self, point: Point<f64>, primary_only: bool) -> Option<Vec<String>> {
        let point = round_point(point, self.config.round_decimals);
        let partition = if primary_only {
            &self.primary_streets
        } else {
            &self.streets
        };
        let cell = partition.locate(point)?;
        if cell.names.is_empty() {
            None
        } else {
            Some(cell.names.iter().cloned().collect())
        }
    }

    /// Name of the neighborhood containing the point, if any.
    pub fn neighborhood(&self, point: Point<f64>) -> Option<&str> {
        self.neighborhoods.locate(point)
    }

    /// Streets meeting at the POI's graph node.
    pub fn streets_for(&self, osmid: i64) -> Vec<String> {
        self.graph.street_names_at(osmid)
    }

    pub fn is_junction(&self, osmid: i64) -> bool {
        self.graph.degree(osmid) >= self.config.junction_degree
    }

    /// Coarse position of the POI along its street, from the ratio of
    /// corner distances on the street's bounding-box diagonal. `None` when
    /// the node resolves to no street or the street has no extent.
    pub fn position_in_street(&self, osmid: i64, point: Point<f64>) -> Option<StreetPosition> {
        let names = self.graph.street_names_at(osmid);
        let street = names.first()?;
        let bounds = self.graph.street_bounds(street)?;
        Some(StreetPosition::from_ratio(diagonal_ratio(point, &bounds)))
    }

    /// Distance in meters to the city center, and the compass quadrant in
    /// which `point` lies relative to it, from the center-to-point bearing.
    pub fn orientation(&self, point: Point<f64>) -> (f64, CardinalDirection) {
        let distance = haversine_m(point, self.city_center);
        let direction = CardinalDirection::from_bearing(initial_bearing(self.city_center, point));
        (distance, direction)
    }

    /// Samples the configured number of landmarks around the point.
    pub fn nearest_landmarks(&self, point: Point<f64>) -> Result<Vec<NearbyLandmark>> {
        self.landmarks
            .sample_near(point, self.config.landmark_sample, &mut rand::rng())
    }

    /// Landmark sampling with a caller-provided count and RNG.
    pub fn nearest_landmarks_with<R: Rng + ?Sized>(
        &self,
        point: Point<f64>,
        k: usize,
        rng: &mut R,
    ) -> Result<Vec<NearbyLandmark>> {
        self.landmarks.sample_near(point, k, rng)
    }

    pub fn city_center(&self) -> Point<f64> {
        self.city_center
    }

    /// Assembles the full feature document for one POI. Fails when too few
    /// landmark candidates surround it.
    pub fn describe(&self, poi: &PoiRecord) -> Result<FeatureRecord> {
        let point = poi.point();
        let (distance_to_center_m, direction_to_center) = self.orientation(point);
        let landmarks = self.nearest_landmarks(point)?;
        Ok(FeatureRecord {
            osmid: poi.osmid,
            name: poi.display_name().map(str::to_owned),
            category: poi.category().map(str::to_owned),
            point: GeoPoint::from(point),
            street_names: self.streets_for(poi.osmid),
            is_junction: self.is_junction(poi.osmid),
            nearby_streets: self.nearby_streets(point, false),
            nearby_primary_streets: self.nearby_streets(point, true),
            position_in_street: self.position_in_street(poi.osmid, point),
            neighborhood: self.neighborhood(point).map(str::to_owned),
            distance_to_center_m,
            direction_to_center,
            landmarks,
            extracted_at: Utc::now(),
        })
    }
}
