//! Parallel batch extraction over a POI table.

use rayon::prelude::*;
use tracing::warn;

use crate::engine::FeatureEngine;
use crate::error::Result;
use crate::models::PoiRecord;
use crate::sink::FeatureSink;

/// Worker-pool shape for a batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Worker threads in the dedicated pool.
    pub workers: usize,
    /// POIs handed to a worker at a time.
    pub batch_size: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            batch_size: 50,
        }
    }
}

/// All cores but one, at least one.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(2)
        .saturating_sub(1)
        .max(1)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BatchSummary {
    pub processed: usize,
    pub failed: usize,
}

/// Runs the engine over every POI and writes the documents to `sink`. A POI
/// that fails is logged and skipped without aborting the batch; `on_done`
/// fires after each POI either way.
pub fn run_batch<F>(
    engine: &FeatureEngine,
    pois: &[PoiRecord],
    sink: &dyn FeatureSink,
    options: &BatchOptions,
    on_done: F,
) -> Result<BatchSummary>
where
    F: Fn() + Sync,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.workers)
        .build()?;
    let batch_size = options.batch_size.max(1);
    let (processed, failed) = pool.install(|| {
        pois.par_chunks(batch_size)
            .map(|chunk| {
                let mut ok = 0usize;
                let mut bad = 0usize;
                for poi in chunk {
                    match engine.describe(poi).and_then(|record| sink.insert(&record)) {
                        Ok(()) => ok += 1,
                        Err(err) => {
                            warn!("skipping POI {}: {}", poi.osmid, err);
                            bad += 1;
                        }
                    }
                    on_done();
                }
                (ok, bad)
            })
            .reduce(|| (0, 0), |a, b| (a.0 + b.0, a.1 + b.1))
    });
    Ok(BatchSummary { processed, failed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::graph::RoadGraph;
    use crate::models::road::{RoadEdge, RoadNode, StreetName};
    use crate::sink::MemorySink;
    use geo_types::{LineString, Point};
    use std::sync::atomic::{AtomicUsize, Ordering};

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

    fn test_engine(pois: &[PoiRecord]) -> FeatureEngine {
        let nodes = vec![
            RoadNode {
                osmid: 1,
                point: Point::new(0.0, 0.0),
            },
            RoadNode {
                osmid: 2,
                point: Point::new(0.001, 0.0),
            },
        ];
        let edges = vec![RoadEdge {
            u: 1,
            v: 2,
            key: 0,
            name: StreetName::Single("Elm".to_owned()),
            highway: Some("residential".to_owned()),
            geometry: LineString::from(vec![(0.0, 0.0), (0.001, 0.0)]),
        }];
        FeatureEngine::new(
            RoadGraph::new(nodes, edges),
            Vec::new(),
            pois,
            EngineConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn batch_isolates_per_poi_failures() {
        let mut pois: Vec<PoiRecord> = (0..6)
            .map(|i| poi(10 + i, &format!("poi-{i}"), 0.0001 * i as f64, 0.0))
            .collect();
        // far away from every landmark candidate
        pois.push(poi(99, "Hermitage", 3.0, 3.0));

        let engine = test_engine(&pois);
        let sink = MemorySink::new();
        let ticks = AtomicUsize::new(0);
        let summary = run_batch(
            &engine,
            &pois,
            &sink,
            &BatchOptions {
                workers: 2,
                batch_size: 2,
            },
            || {
                ticks.fetch_add(1, Ordering::Relaxed);
            },
        )
        .unwrap();

        assert_eq!(summary.processed, 6);
        assert_eq!(summary.failed, 1);
        assert_eq!(sink.len(), 6);
        assert_eq!(ticks.load(Ordering::Relaxed), pois.len());
        assert!(sink.records().iter().all(|r| r.osmid != 99));
    }

    #[test]
    fn empty_table_is_a_clean_run() {
        let engine = test_engine(&[poi(1, "solo", 0.0, 0.0)]);
        let sink = MemorySink::new();
        let summary = run_batch(&engine, &[], &sink, &BatchOptions::default(), || {}).unwrap();
        assert_eq!(summary.processed, 0);
        assert_eq!(summary.failed, 0);
        assert!(sink.is_empty());
    }
}
