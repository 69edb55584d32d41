//! File-backed state store.
//!
//! Keeps the whole keyspace in memory and persists it as one JSON object.
//! Every write rewrites a sibling temp file and renames it over the original,
//! so a crash mid-write leaves the previous snapshot intact.

use std::collections::BTreeMap;
use std::fs::{self, create_dir_all, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde_json::Value;

use crate::core::{PollError, StateStore};

/// Durable store persisting counters to a JSON file.
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, Value>>,
}

impl FileStore {
    /// Open `<dir>/<name>.json`, loading any existing snapshot.
    pub fn open(dir: impl AsRef<Path>, name: &str) -> Result<Self, PollError> {
        let dir = dir.as_ref();
        create_dir_all(dir).map_err(|e| PollError::Store(e.to_string()))?;
        let path = dir.join(format!("{name}.json"));
        let entries = if path.exists() {
            let file = File::open(&path).map_err(|e| PollError::Store(e.to_string()))?;
            serde_json::from_reader(BufReader::new(file))
                .map_err(|e| PollError::Store(format!("{}: {e}", path.display())))?
        } else {
            BTreeMap::new()
        };
        tracing::debug!(path = %path.display(), "opened file store");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Location of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, Value>) -> Result<(), PollError> {
        let tmp = self.path.with_extension("json.tmp");
        let file = File::create(&tmp).map_err(|e| PollError::Store(e.to_string()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, entries).map_err(|e| PollError::Store(e.to_string()))?;
        writer.flush().map_err(|e| PollError::Store(e.to_string()))?;
        drop(writer);
        fs::rename(&tmp, &self.path).map_err(|e| PollError::Store(e.to_string()))
    }
}

impl StateStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, PollError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn put(&self, key: &str, value: Value) -> Result<(), PollError> {
        let mut entries = self.entries.lock();
        entries.insert(key.to_string(), value);
        self.persist(&entries)
    }

    fn has(&self, key: &str) -> Result<bool, PollError> {
        Ok(self.entries.lock().contains_key(key))
    }

    fn put_if_absent(&self, key: &str, value: Value) -> Result<Value, PollError> {
        let mut entries = self.entries.lock();
        if let Some(existing) = entries.get(key) {
            return Ok(existing.clone());
        }
        entries.insert(key.to_string(), value.clone());
        self.persist(&entries)?;
        Ok(value)
    }
}
