//! POI table rows and their naming and category fallbacks.

use std::io::Read;
use std::path::Path;

use geo_types::Point;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;

/// One row of the exported POI table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoiRecord {
    pub osmid: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub amenity: Option<String>,
    #[serde(default)]
    pub tourism: Option<String>,
    #[serde(default)]
    pub building: Option<String>,
    #[serde(default)]
    pub wikipedia: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub lon: f64,
    pub lat: f64,
}

impl PoiRecord {
    pub fn point(&self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }

    /// Display name: the `name` tag, else the title part of the `wikipedia`
    /// tag (after its language prefix).
    pub fn display_name(&self) -> Option<&str> {
        if let Some(name) = self.name.as_deref() {
            if !name.is_empty() {
                return Some(name);
            }
        }
        match self.wikipedia.as_deref() {
            Some(w) if !w.is_empty() => Some(w.split_once(':').map_or(w, |(_, title)| title)),
            _ => None,
        }
    }

    /// Category fallback chain: `amenity`, else `tourism`, else `building`,
    /// else `description`.
    pub fn category(&self) -> Option<&str> {
        [&self.amenity, &self.tourism, &self.building, &self.description]
            .into_iter()
            .filter_map(|tag| tag.as_deref())
            .find(|s| !s.is_empty())
    }
}

/// Loads a POI table from CSV. Empty cells become `None`.
pub fn load_poi_table(path: &Path) -> Result<Vec<PoiRecord>> {
    let reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
    let rows = collect_rows(reader)?;
    info!("loaded {} POI rows from {}", rows.len(), path.display());
    Ok(rows)
}

fn collect_rows<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<PoiRecord>> {
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}
