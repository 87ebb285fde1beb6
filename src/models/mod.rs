//! Data models: road snapshot rows, POI rows, and output documents.

pub mod feature;
pub mod poi;
pub mod road;

pub use feature::{CardinalDirection, FeatureRecord, GeoPoint, NearbyLandmark, StreetPosition};
pub use poi::PoiRecord;
pub use road::{RoadEdge, RoadNode, StreetName};
