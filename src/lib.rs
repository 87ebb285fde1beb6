//! Linden - spatial descriptors for points of interest in a street network
//!
//! This library derives human-readable location features (bordering streets,
//! junctions, neighborhood, city-center orientation, nearby landmarks) from
//! road-network snapshots, for the extract binary and for embedding.

pub mod batch;
pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod landmarks;
pub mod models;
pub mod neighborhoods;
pub mod partition;
pub mod sink;

pub use engine::FeatureEngine;
pub use error::{Error, Result};
pub use models::{CardinalDirection, FeatureRecord, NearbyLandmark, PoiRecord, StreetPosition};
