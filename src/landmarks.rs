//! Landmark candidates and radius-bounded random sampling.

use geo_types::Point;
use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::info;

use crate::error::{Error, Result};
use crate::geometry::{haversine_m, initial_bearing};
use crate::models::{CardinalDirection, NearbyLandmark, PoiRecord};

/// A POI usable as a landmark: it resolved to both a name and a category.
#[derive(Debug, Clone)]
pub struct Landmark {
    pub osmid: i64,
    pub name: String,
    pub category: String,
    pub point: Point<f64>,
}

/// Flat candidate table scanned per query. Sampling is uniform over the
/// in-radius candidates rather than nearest-first, so repeated queries
/// surface different reference points.
pub struct LandmarkIndex {
    landmarks: Vec<Landmark>,
    radius_m: f64,
}

impl LandmarkIndex {
    /// Keeps every POI whose name and category fallbacks both resolve.
    pub fn build(pois: &[PoiRecord], radius_m: f64) -> Self {
        let landmarks: Vec<Landmark> = pois
            .iter()
            .filter_map(|poi| {
                let name = poi.display_name()?.to_owned();
                let category = poi.category()?.to_owned();
                Some(Landmark {
                    osmid: poi.osmid,
                    name,
                    category,
                    point: poi.point(),
                })
            })
            .collect();
        info!(
            "landmark index: {} of {} POIs usable",
            landmarks.len(),
            pois.len()
        );
        Self {
            landmarks,
            radius_m,
        }
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    /// Samples `k` distinct landmarks closer than the radius, tagging each
    /// with its compass direction from `point`. Fails when fewer than `k`
    /// candidates are in range; it never pads with a short list.
    pub fn sample_near<R: Rng + ?Sized>(
        &self,
        point: Point<f64>,
        k: usize,
        rng: &mut R,
    ) -> Result<Vec<NearbyLandmark>> {
        let in_radius: Vec<&Landmark> = self
            .landmarks
            .iter()
            .filter(|landmark| haversine_m(point, landmark.point) < self.radius_m)
            .collect();
        if in_radius.len() < k {
            return Err(Error::InsufficientLandmarks {
                wanted: k,
                found: in_radius.len(),
                radius_m: self.radius_m,
            });
        }
        Ok(in_radius
            .choose_multiple(rng, k)
            .map(|landmark| NearbyLandmark {
                name: landmark.name.clone(),
                category: landmark.category.clone(),
                direction: CardinalDirection::from_bearing(initial_bearing(
                    point,
                    landmark.point,
                )),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn poi(osmid: i64, name: &str, lon: f64, lat: f64) -> PoiRecord {
        PoiRecord {
            osmid,
            name: Some(name.to_owned()),
            amenity: Some("cafe".to_owned()),
            tourism: None,
            building: None,
            wikipedia: None,
            description: None,
            lon,
            lat,
        }
    }

    fn cluster() -> Vec<PoiRecord> {
        // ~100 m apart near the equator
        vec![
            poi(1, "Luna", 0.0000, 0.0),
            poi(2, "Mercado", 0.0010, 0.0),
            poi(3, "Basilica", 0.0020, 0.0),
            poi(4, "Archway", 0.0000, 0.001),
            poi(5, "Fountain", 0.0010, 0.001),
            poi(6, "Old Gate", 0.0020, 0.001),
        ]
    }

    #[test]
    fn untagged_pois_are_not_candidates() {
        let mut pois = cluster();
        pois[0].amenity = None; // no category left
        pois[1].name = None;
        pois[1].wikipedia = None; // no name left
        let index = LandmarkIndex::build(&pois, 500.0);
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn sampling_returns_exactly_k_in_radius() {
        let index = LandmarkIndex::build(&cluster(), 500.0);
        let mut rng = StdRng::seed_from_u64(7);
        let picks = index
            .sample_near(Point::new(0.001, 0.0005), 5, &mut rng)
            .unwrap();
        assert_eq!(picks.len(), 5);
        let mut names: Vec<&str> = picks.iter().map(|p| p.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 5, "samples must be distinct");
    }

    #[test]
    fn far_candidates_are_outside_the_radius() {
        let mut pois = cluster();
        pois.push(poi(7, "Lighthouse", 1.0, 1.0)); // ~150 km away
        let index = LandmarkIndex::build(&pois, 500.0);
        let mut rng = StdRng::seed_from_u64(7);
        let picks = index
            .sample_near(Point::new(0.001, 0.0005), 6, &mut rng)
            .unwrap();
        assert!(picks.iter().all(|p| p.name != "Lighthouse"));
    }

    #[test]
    fn too_few_candidates_is_an_error() {
        let index = LandmarkIndex::build(&cluster()[..3], 500.0);
        let mut rng = StdRng::seed_from_u64(7);
        let err = index
            .sample_near(Point::new(0.001, 0.0005), 5, &mut rng)
            .unwrap_err();
        match err {
            Error::InsufficientLandmarks { wanted, found, .. } => {
                assert_eq!(wanted, 5);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn directions_follow_the_bearing_quadrants() {
        let pois = vec![poi(1, "NE", 0.001, 0.001), poi(2, "SW", -0.001, -0.001)];
        let index = LandmarkIndex::build(&pois, 500.0);
        let mut rng = StdRng::seed_from_u64(7);
        let picks = index.sample_near(Point::new(0.0, 0.0), 2, &mut rng).unwrap();
        for pick in picks {
            match pick.name.as_str() {
                "NE" => assert_eq!(pick.direction, CardinalDirection::Northeast),
                "SW" => assert_eq!(pick.direction, CardinalDirection::Southwest),
                other => panic!("unexpected landmark {other}"),
            }
        }
    }
}
