//! Road network graph: topology queries and snapshot loading.

pub mod network;
pub mod snapshot;

pub use network::RoadGraph;
pub use snapshot::load_road_graph;
