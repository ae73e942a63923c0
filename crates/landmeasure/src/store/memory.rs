use std::sync::Mutex;

use super::{newest_first, MeasurementStore, StoreError};
use crate::record::MeasurementRecord;

/// In-process store; the whole log lives behind one mutex.
#[derive(Debug, Default)]
pub struct MemoryStore {
    log: Mutex<Vec<MeasurementRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records appended so far.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.log.lock().map_err(|_| StoreError::Poisoned)?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl MeasurementStore for MemoryStore {
    fn append(&self, record: MeasurementRecord) -> Result<(), StoreError> {
        self.log
            .lock()
            .map_err(|_| StoreError::Poisoned)?
            .push(record);
        Ok(())
    }

    fn recent(&self, limit: usize) -> Result<Vec<MeasurementRecord>, StoreError> {
        let snapshot = self.log.lock().map_err(|_| StoreError::Poisoned)?.clone();
        Ok(newest_first(snapshot, limit))
    }
}
