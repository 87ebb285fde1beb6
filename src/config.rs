//! TOML configuration: engine tunables plus the per-region snapshot registry.
//!
//! ```toml
//! [engine]
//! junction_degree = 4
//!
//! [[regions]]
//! name = "tel_aviv"
//! road_nodes = "data/tel_aviv/nodes.geojson"
//! road_edges = "data/tel_aviv/edges.geojson"
//! neighborhoods = "data/tel_aviv/neighborhoods.geojson"
//! pois = "data/tel_aviv/pois.csv"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Highway classes included in the primary-street partition by default.
pub const PRIMARY_HIGHWAYS: &[&str] = &[
    "trunk",
    "primary",
    "motorway",
    "tertiary",
    "secondary",
    "footway",
    "service",
];

/// Engine tunables, all optional in the file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Highway classes for the primary-street partition.
    pub primary_highways: Vec<String>,
    /// Landmark search radius in meters.
    pub landmark_radius_m: f64,
    /// Landmarks sampled per POI.
    pub landmark_sample: usize,
    /// Minimum node degree for a junction.
    pub junction_degree: usize,
    /// Decimal places kept on cell-lookup query coordinates.
    pub round_decimals: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            primary_highways: PRIMARY_HIGHWAYS.iter().map(|s| s.to_string()).collect(),
            landmark_radius_m: 500.0,
            landmark_sample: 5,
            junction_degree: 4,
            round_decimals: 4,
        }
    }
}

/// Snapshot file locations for one region.
#[derive(Debug, Clone, Deserialize)]
pub struct Region {
    pub name: String,
    pub road_nodes: PathBuf,
    pub road_edges: PathBuf,
    #[serde(default)]
    pub neighborhoods: Option<PathBuf>,
    pub pois: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub regions: Vec<Region>,
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Region by name. Unknown names fail spelling out what is configured.
    pub fn region(&self, name: &str) -> Result<&Region> {
        self.regions
            .iter()
            .find(|region| region.name == name)
            .ok_or_else(|| Error::UnknownRegion {
                name: name.to_owned(),
                supported: self
                    .regions
                    .iter()
                    .map(|region| region.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}
