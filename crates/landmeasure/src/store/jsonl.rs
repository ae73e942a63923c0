//! JSON-lines file store.
//!
//! One serialized `MeasurementRecord` per line, appended in insertion order.
//! The file handle is held behind a mutex: appends write a full line in one
//! `write_all` and reads happen under the same lock, so a reader never sees a
//! half-written record from this process.
//!
//! A line without its trailing newline is a torn write. `open` cuts it off
//! before the first append, and `recent` skips it if another writer left one.
//! A failed append truncates the file back to its previous length.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{newest_first, MeasurementStore, StoreError};
use crate::record::MeasurementRecord;

#[derive(Debug)]
pub struct JsonlStore {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl JsonlStore {
    /// Open (or create) the log at `path`, creating parent directories.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        drop_torn_tail(&path, &file)?;
        tracing::debug!(path = %path.display(), "store_open");
        Ok(Self {
            path,
            file: Mutex::new(Some(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush to disk and release the handle. Later calls fail with `Closed`.
    /// Dropping the store does the same.
    pub fn close(&self) -> Result<(), StoreError> {
        let mut guard = self.file.lock().map_err(|_| StoreError::Poisoned)?;
        if let Some(file) = guard.take() {
            file.sync_all()?;
            tracing::debug!(path = %self.path.display(), "store_close");
        }
        Ok(())
    }

    fn read_log(&self) -> Result<Vec<MeasurementRecord>, StoreError> {
        let raw = fs::read_to_string(&self.path)?;
        let complete = match raw.rfind('\n') {
            Some(end) => &raw[..=end],
            None => "",
        };
        if complete.len() < raw.len() {
            tracing::warn!(
                path = %self.path.display(),
                bytes = raw.len() - complete.len(),
                "store_torn_tail_skipped"
            );
        }
        complete
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                serde_json::from_str(line).map_err(|source| StoreError::Corrupt {
                    line: i + 1,
                    source,
                })
            })
            .collect()
    }
}

/// Truncate `file` back to its last newline if the final line is incomplete.
fn drop_torn_tail(path: &Path, file: &File) -> Result<(), StoreError> {
    let raw = fs::read(path)?;
    if raw.last().map_or(true, |&b| b == b'\n') {
        return Ok(());
    }
    let keep = raw.iter().rposition(|&b| b == b'\n').map_or(0, |end| end + 1);
    file.set_len(keep as u64)?;
    tracing::warn!(
        path = %path.display(),
        bytes = raw.len() - keep,
        "store_torn_tail_dropped"
    );
    Ok(())
}

impl Drop for JsonlStore {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            tracing::warn!(path = %self.path.display(), error = %err, "store_close_failed");
        }
    }
}

impl MeasurementStore for JsonlStore {
    fn append(&self, record: MeasurementRecord) -> Result<(), StoreError> {
        let mut line = serde_json::to_vec(&record)?;
        line.push(b'\n');
        let mut guard = self.file.lock().map_err(|_| StoreError::Poisoned)?;
        let file = guard.as_mut().ok_or(StoreError::Closed)?;
        let before = file.metadata()?.len();
        if let Err(err) = file.write_all(&line).and_then(|()| file.flush()) {
            // Leave no partial line for the next append to merge into.
            if let Err(undo) = file.set_len(before) {
                tracing::warn!(path = %self.path.display(), error = %undo, "store_truncate_failed");
            }
            return Err(err.into());
        }
        Ok(())
    }

    fn recent(&self, limit: usize) -> Result<Vec<MeasurementRecord>, StoreError> {
        let guard = self.file.lock().map_err(|_| StoreError::Poisoned)?;
        if guard.is_none() {
            return Err(StoreError::Closed);
        }
        let log = self.read_log()?;
        drop(guard);
        Ok(newest_first(log, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::{record, tags};
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use tempfile::tempdir;

    const TORN: &[u8] = br#"{"coordinates":[[[0"#;

    fn append_raw(path: &Path, bytes: &[u8]) {
        OpenOptions::new()
            .append(true)
            .open(path)
            .unwrap()
            .write_all(bytes)
            .unwrap();
    }

    #[test]
    fn open_creates_nested_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a/b/log.jsonl");
        let store = JsonlStore::open(&path).unwrap();
        assert!(path.exists());
        assert!(store.recent(10).unwrap().is_empty());
    }

    #[test]
    fn records_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.jsonl");
        {
            let store = JsonlStore::open(&path).unwrap();
            for i in 0..12 {
                store.append(record(f64::from(i), i64::from(i))).unwrap();
            }
            store.close().unwrap();
        }
        let store = JsonlStore::open(&path).unwrap();
        let recent = store.recent(10).unwrap();
        assert_eq!(tags(&recent), (2..12).rev().map(f64::from).collect::<Vec<_>>());
        assert_eq!(recent[0].ring().len(), 4);
    }

    #[test]
    fn closed_store_rejects_io() {
        let dir = tempdir().unwrap();
        let store = JsonlStore::open(dir.path().join("log.jsonl")).unwrap();
        store.close().unwrap();
        assert!(matches!(
            store.append(record(1.0, 0)),
            Err(StoreError::Closed)
        ));
        assert!(matches!(store.recent(10), Err(StoreError::Closed)));
        // closing twice is fine
        store.close().unwrap();
    }

    #[test]
    fn corrupt_line_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.jsonl");
        let store = JsonlStore::open(&path).unwrap();
        store.append(record(1.0, 0)).unwrap();
        append_raw(&path, b"{not json\n");
        store.append(record(2.0, 1)).unwrap();
        match store.recent(10) {
            Err(StoreError::Corrupt { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected corrupt line, got {other:?}"),
        }
    }

    #[test]
    fn torn_tail_is_dropped_on_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.jsonl");
        let store = JsonlStore::open(&path).unwrap();
        store.append(record(1.0, 0)).unwrap();
        store.close().unwrap();
        append_raw(&path, TORN);

        let store = JsonlStore::open(&path).unwrap();
        store.append(record(2.0, 1)).unwrap();
        assert_eq!(tags(&store.recent(10).unwrap()), vec![2.0, 1.0]);
        let raw = fs::read_to_string(&path).unwrap();
        assert_eq!(raw.lines().count(), 2);
        assert!(raw.ends_with('\n'));
    }

    #[test]
    fn torn_tail_alone_leaves_empty_log() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.jsonl");
        fs::write(&path, TORN).unwrap();
        let store = JsonlStore::open(&path).unwrap();
        assert!(store.recent(10).unwrap().is_empty());
        assert_eq!(fs::metadata(&path).unwrap().len(), 0);
    }

    #[test]
    fn recent_skips_torn_tail_from_another_writer() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.jsonl");
        let store = JsonlStore::open(&path).unwrap();
        store.append(record(1.0, 0)).unwrap();
        append_raw(&path, TORN);
        assert_eq!(tags(&store.recent(10).unwrap()), vec![1.0]);
    }

    #[test]
    fn drop_closes_and_keeps_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.jsonl");
        {
            let store = JsonlStore::open(&path).unwrap();
            store.append(record(1.0, 0)).unwrap();
            store.append(record(2.0, 1)).unwrap();
        }
        let store = JsonlStore::open(&path).unwrap();
        assert_eq!(tags(&store.recent(10).unwrap()), vec![2.0, 1.0]);
        store.close().unwrap();
        // dropping an already closed store is a no-op
        drop(store);
    }

    #[test]
    fn concurrent_appends_all_land() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.jsonl");
        let store = Arc::new(JsonlStore::open(&path).unwrap());
        let handles: Vec<_> = (0..8u32)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for j in 0..25u32 {
                        store.append(record(f64::from(i * 100 + j), i64::from(j))).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        store.close().unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let parsed = raw
            .lines()
            .map(serde_json::from_str::<MeasurementRecord>)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(parsed.len(), 200);
        let mut seen = tags(&parsed);
        seen.sort_by(f64::total_cmp);
        let mut want: Vec<f64> = (0..8u32)
            .flat_map(|i| (0..25u32).map(move |j| f64::from(i * 100 + j)))
            .collect();
        want.sort_by(f64::total_cmp);
        assert_eq!(seen, want);
        // per-thread order is preserved in the log
        for i in 0..8u32 {
            let mine: Vec<f64> = tags(&parsed)
                .into_iter()
                .filter(|t| (*t as u32) / 100 == i)
                .collect();
            assert_eq!(mine, (0..25u32).map(|j| f64::from(i * 100 + j)).collect::<Vec<_>>());
        }
    }
}
