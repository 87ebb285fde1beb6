//! Road snapshot rows: graph nodes, edges and street-name tagging.

use geo_types::{LineString, Point};
use serde_json::Value;

/// Pseudo street name given to synthetic edges that stitch a POI into the
/// walk network. Never reported as a real street.
pub const POI_EDGE_NAME: &str = "poi";

/// A graph node from the road snapshot.
#[derive(Debug, Clone)]
pub struct RoadNode {
    pub osmid: i64,
    pub point: Point<f64>,
}

/// Street-name tagging of an edge row.
///
/// OSM exports carry either no name, a single name, or a list of names for
/// ways merged across renamings. The variant is resolved once at load time so
/// downstream code never re-inspects raw property values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreetName {
    None,
    Single(String),
    Multiple(Vec<String>),
}

impl StreetName {
    /// Resolves the `name` property of an edge feature. Empty strings and
    /// empty lists count as unnamed.
    pub fn from_property(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(s)) if !s.is_empty() => StreetName::Single(s.clone()),
            Some(Value::Array(items)) => {
                let names: Vec<String> = items
                    .iter()
                    .filter_map(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .map(str::to_owned)
                    .collect();
                if names.is_empty() {
                    StreetName::None
                } else {
                    StreetName::Multiple(names)
                }
            }
            _ => StreetName::None,
        }
    }

    /// The name when the row carries exactly one.
    pub fn single(&self) -> Option<&str> {
        match self {
            StreetName::Single(s) => Some(s),
            _ => None,
        }
    }

    /// Every name on the row, in stored order.
    pub fn as_slice(&self) -> &[String] {
        match self {
            StreetName::None => &[],
            StreetName::Single(s) => std::slice::from_ref(s),
            StreetName::Multiple(v) => v.as_slice(),
        }
    }

    pub fn is_multiple(&self) -> bool {
        matches!(self, StreetName::Multiple(_))
    }
}

/// An edge row from the road snapshot. `u` and `v` are endpoint node ids;
/// `key` disambiguates parallel edges between the same pair.
#[derive(Debug, Clone)]
pub struct RoadEdge {
    pub u: i64,
    pub v: i64,
    pub key: u32,
    pub name: StreetName,
    pub highway: Option<String>,
    pub geometry: LineString<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn name_from_string_property() {
        let value = json!("Allenby");
        assert_eq!(
            StreetName::from_property(Some(&value)),
            StreetName::Single("Allenby".to_string())
        );
    }

    #[test]
    fn name_from_list_property() {
        let value = json!(["Allenby", "HaKovshim"]);
        assert_eq!(
            StreetName::from_property(Some(&value)),
            StreetName::Multiple(vec!["Allenby".to_string(), "HaKovshim".to_string()])
        );
    }

    #[test]
    fn empty_values_are_unnamed() {
        assert_eq!(StreetName::from_property(None), StreetName::None);
        let null = json!(null);
        assert_eq!(StreetName::from_property(Some(&null)), StreetName::None);
        let empty = json!("");
        assert_eq!(StreetName::from_property(Some(&empty)), StreetName::None);
        let empty_list = json!([]);
        assert_eq!(StreetName::from_property(Some(&empty_list)), StreetName::None);
        let blank_list = json!(["", ""]);
        assert_eq!(StreetName::from_property(Some(&blank_list)), StreetName::None);
    }

    #[test]
    fn as_slice_flattens_variants() {
        assert!(StreetName::None.as_slice().is_empty());
        assert_eq!(
            StreetName::Single("Dizengoff".to_string()).as_slice(),
            ["Dizengoff".to_string()]
        );
        let multi = StreetName::Multiple(vec!["A".to_string(), "B".to_string()]);
        assert_eq!(multi.as_slice().len(), 2);
        assert!(multi.is_multiple());
    }
}
