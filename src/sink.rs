//! Output sinks for feature documents.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::error::Result;
use crate::models::FeatureRecord;

/// Receives extracted documents. Implementations must tolerate concurrent
/// inserts from worker threads.
pub trait FeatureSink: Sync {
    fn insert(&self, record: &FeatureRecord) -> Result<()>;
}

/// Writes one JSON document per line.
pub struct JsonLinesSink {
    writer: Mutex<BufWriter<File>>,
}

impl JsonLinesSink {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    /// Flushes buffered output. Call once after the batch completes.
    pub fn finish(&self) -> Result<()> {
        self.lock().flush()?;
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, BufWriter<File>> {
        match self.writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl FeatureSink for JsonLinesSink {
    fn insert(&self, record: &FeatureRecord) -> Result<()> {
        let line = serde_json::to_string(record)?;
        let mut writer = self.lock();
        writeln!(writer, "{line}")?;
        Ok(())
    }
}

/// Buffers documents in memory; the test stand-in for a real store.
#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<FeatureRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<FeatureRecord> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<FeatureRecord>> {
        match self.records.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl FeatureSink for MemorySink {
    fn insert(&self, record: &FeatureRecord) -> Result<()> {
        self.lock().push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CardinalDirection, GeoPoint};
    use chrono::Utc;

    fn record(osmid: i64) -> FeatureRecord {
        FeatureRecord {
            osmid,
            name: Some(format!("poi-{osmid}")),
            category: None,
            point: GeoPoint {
                lat: 32.08,
                lon: 34.78,
            },
            street_names: vec!["Elm".to_string()],
            is_junction: false,
            nearby_streets: None,
            nearby_primary_streets: None,
            position_in_street: None,
            neighborhood: None,
            distance_to_center_m: 10.0,
            direction_to_center: CardinalDirection::Northeast,
            landmarks: Vec::new(),
            extracted_at: Utc::now(),
        }
    }

    #[test]
    fn memory_sink_keeps_insertion_order() {
        let sink = MemorySink::new();
        sink.insert(&record(1)).unwrap();
        sink.insert(&record(2)).unwrap();
        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].osmid, 1);
        assert_eq!(records[1].osmid, 2);
    }

    #[test]
    fn json_lines_sink_writes_one_document_per_line() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let sink = JsonLinesSink::create(file.path()).unwrap();
        sink.insert(&record(7)).unwrap();
        sink.insert(&record(8)).unwrap();
        sink.finish().unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: FeatureRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed.osmid, 7);
        assert_eq!(parsed.name.as_deref(), Some("poi-7"));
    }
}
