//! Output document model for extracted POI features.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Geographic point (lat/lon)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl From<geo_types::Point<f64>> for GeoPoint {
    fn from(p: geo_types::Point<f64>) -> Self {
        GeoPoint {
            lat: p.y(),
            lon: p.x(),
        }
    }
}

/// Compass quadrant of a bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardinalDirection {
    Northeast,
    Southeast,
    Southwest,
    Northwest,
}

impl CardinalDirection {
    /// Discretizes a bearing in `[0, 360)`. Quadrant upper bounds are
    /// inclusive: 90 is still northeast, 270 still southwest.
    pub fn from_bearing(bearing: f64) -> Self {
        if (0.0..=90.0).contains(&bearing) {
            CardinalDirection::Northeast
        } else if bearing <= 180.0 {
            CardinalDirection::Southeast
        } else if bearing <= 270.0 {
            CardinalDirection::Southwest
        } else {
            CardinalDirection::Northwest
        }
    }
}

impl std::fmt::Display for CardinalDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CardinalDirection::Northeast => write!(f, "northeast"),
            CardinalDirection::Southeast => write!(f, "southeast"),
            CardinalDirection::Southwest => write!(f, "southwest"),
            CardinalDirection::Northwest => write!(f, "northwest"),
        }
    }
}

/// Coarse position of a point along its street's bounding-box diagonal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreetPosition {
    Start,
    Middle,
    End,
}

impl StreetPosition {
    /// Labels a diagonal ratio: below 0.4 is start, below 0.6 middle,
    /// anything else end.
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio < 0.4 {
            StreetPosition::Start
        } else if ratio < 0.6 {
            StreetPosition::Middle
        } else {
            StreetPosition::End
        }
    }
}

impl std::fmt::Display for StreetPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreetPosition::Start => write!(f, "start"),
            StreetPosition::Middle => write!(f, "middle"),
            StreetPosition::End => write!(f, "end"),
        }
    }
}

/// A sampled landmark near a POI, with its direction from the POI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NearbyLandmark {
    pub name: String,
    pub category: String,
    pub direction: CardinalDirection,
}

/// The full per-POI feature document emitted by the extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub osmid: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    pub point: GeoPoint,

    /// Streets meeting at the POI's graph node.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub street_names: Vec<String>,

    pub is_junction: bool,

    /// Streets bounding the enclosing cell, all highway classes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nearby_streets: Option<Vec<String>>,

    /// Streets bounding the enclosing cell of the primary-street partition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nearby_primary_streets: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_in_street: Option<StreetPosition>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,

    pub distance_to_center_m: f64,

    /// Quadrant of the POI relative to the city center.
    pub direction_to_center: CardinalDirection,

    pub landmarks: Vec<NearbyLandmark>,

    /// Extraction timestamp for refresh tracking.
    pub extracted_at: DateTime<Utc>,
}
