//! Append-only measurement log.
//!
//! Contract
//! - `append` is atomic per record: readers never observe a partial write.
//! - `recent(n)` is a consistent snapshot of at most `n` records, newest
//!   `timestamp` first; equal timestamps put the later insertion first.
//! - Stores serialize internally (`&self` API) and are shared across threads.
//!
//! Implementations
//! - `MemoryStore`: process-local, lost on exit.
//! - `JsonlStore`: one JSON record per line in a file, explicit open/close.

mod jsonl;
mod memory;

use std::sync::Arc;

use thiserror::Error;

use crate::record::MeasurementRecord;

pub use jsonl::JsonlStore;
pub use memory::MemoryStore;

/// Failures at the store boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store io: {0}")]
    Io(#[from] std::io::Error),

    #[error("encoding record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("corrupt record at line {line}: {source}")]
    Corrupt {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("store lock poisoned")]
    Poisoned,

    #[error("store is closed")]
    Closed,

    /// Backend-specific failure (connectivity, write conflict, ...).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Record log consumed by `MeasurementService`.
pub trait MeasurementStore: Send + Sync {
    /// Append one record; on error nothing is visible to readers.
    fn append(&self, record: MeasurementRecord) -> Result<(), StoreError>;

    /// At most `limit` records, newest first.
    fn recent(&self, limit: usize) -> Result<Vec<MeasurementRecord>, StoreError>;
}

impl<S: MeasurementStore + ?Sized> MeasurementStore for Arc<S> {
    fn append(&self, record: MeasurementRecord) -> Result<(), StoreError> {
        (**self).append(record)
    }

    fn recent(&self, limit: usize) -> Result<Vec<MeasurementRecord>, StoreError> {
        (**self).recent(limit)
    }
}

impl<S: MeasurementStore + ?Sized> MeasurementStore for Box<S> {
    fn append(&self, record: MeasurementRecord) -> Result<(), StoreError> {
        (**self).append(record)
    }

    fn recent(&self, limit: usize) -> Result<Vec<MeasurementRecord>, StoreError> {
        (**self).recent(limit)
    }
}

/// Order a log given in insertion order newest-first and keep `limit` entries.
///
/// Reversing before the stable sort makes later insertions win timestamp ties.
pub(crate) fn newest_first(
    mut log: Vec<MeasurementRecord>,
    limit: usize,
) -> Vec<MeasurementRecord> {
    log.reverse();
    log.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
    log.truncate(limit);
    log
}

#[cfg(test)]
pub(crate) mod testutil {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use crate::record::{Measurement, MeasurementRecord};
    use crate::sphere::{Coordinate, CoordinateRing};

    pub fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    /// Record whose area encodes `tag`, stamped `secs` after `t0`.
    pub fn record(tag: f64, secs: i64) -> MeasurementRecord {
        let ring = CoordinateRing::close_from_vertices(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 1.0),
            Coordinate::new(1.0, 0.0),
        ])
        .unwrap();
        let m = Measurement {
            area_hectares: tag,
            perimeter_meters: 1.0,
        };
        MeasurementRecord::new(ring, m, t0() + Duration::seconds(secs))
    }

    pub fn tags(records: &[MeasurementRecord]) -> Vec<f64> {
        records.iter().map(|r| r.area_hectares()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::testutil::{record, tags};
    use super::*;

    #[test]
    fn newest_first_orders_and_truncates() {
        let log = vec![record(1.0, 10), record(2.0, 30), record(3.0, 20)];
        assert_eq!(tags(&newest_first(log, 2)), vec![2.0, 3.0]);
    }

    #[test]
    fn timestamp_ties_prefer_later_insertion() {
        let log = vec![record(1.0, 5), record(2.0, 5), record(3.0, 1), record(4.0, 5)];
        assert_eq!(tags(&newest_first(log, 10)), vec![4.0, 2.0, 1.0, 3.0]);
    }

    #[test]
    fn shared_handles_forward() {
        let store: Arc<dyn MeasurementStore> = Arc::new(MemoryStore::default());
        store.append(record(1.0, 0)).unwrap();
        let boxed: Box<dyn MeasurementStore> = Box::new(Arc::clone(&store));
        assert_eq!(boxed.recent(10).unwrap().len(), 1);
    }
}
