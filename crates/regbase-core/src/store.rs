//! Access to the live configuration store
//!
//! The engine only needs to read a subtree and to write or delete single
//! values. [`SnapshotStore`] serves an exported snapshot file (same tuple
//! format as baselines) so audits can run away from the machine;
//! [`MemoryStore`] backs tests.

use regbase_fs::{DocumentStore, NormalizedPath};

use crate::entry::{Entry, EntryData, Identity, ValueType};
use crate::{Error, Result};

/// Live registry access
pub trait RegistryStore {
    /// Every value under `root` (case-insensitive prefix; empty means all).
    fn read_all(&self, root: &str) -> Result<Vec<Entry>>;

    /// Create or overwrite one value.
    fn write(&mut self, path: &str, name: &str, value_type: &ValueType, data: &EntryData) -> Result<()>;

    /// Remove one value.
    fn delete(&mut self, path: &str, name: &str) -> Result<()>;
}

fn under_root(entry: &Entry, root: &str) -> bool {
    let root = root.trim_end_matches('\\').to_lowercase();
    if root.is_empty() {
        return true;
    }
    let path = entry.path.to_lowercase();
    path == root || path.starts_with(&format!("{}\\", root))
}

fn upsert(entries: &mut Vec<Entry>, path: &str, name: &str, value_type: &ValueType, data: &EntryData) {
    let identity = Identity::new(path, name);
    match entries.iter_mut().find(|e| e.identity() == identity) {
        Some(existing) => {
            existing.value_type = value_type.clone();
            existing.data = data.clone();
        }
        None => entries.push(Entry::new(path, name, value_type.clone(), data.clone())),
    }
}

fn remove(entries: &mut Vec<Entry>, path: &str, name: &str) -> Result<()> {
    let identity = Identity::new(path, name);
    let before = entries.len();
    entries.retain(|e| e.identity() != identity);
    if entries.len() == before {
        return Err(Error::store(format!("no value {}\\{} to delete", path, name)));
    }
    Ok(())
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Vec<Entry>,
}

impl MemoryStore {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }
}

impl RegistryStore for MemoryStore {
    fn read_all(&self, root: &str) -> Result<Vec<Entry>> {
        Ok(self.entries.iter().filter(|e| under_root(e, root)).cloned().collect())
    }

    fn write(&mut self, path: &str, name: &str, value_type: &ValueType, data: &EntryData) -> Result<()> {
        upsert(&mut self.entries, path, name, value_type, data);
        Ok(())
    }

    fn delete(&mut self, path: &str, name: &str) -> Result<()> {
        remove(&mut self.entries, path, name)
    }
}

/// Store backed by an exported snapshot file
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: NormalizedPath,
}

impl SnapshotStore {
    pub fn new(path: NormalizedPath) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    fn load(&self) -> Result<Vec<Entry>> {
        DocumentStore::new().load(&self.path).map_err(|e| {
            if e.is_not_found() {
                Error::store(format!("snapshot {} does not exist", self.path))
            } else {
                Error::malformed(&self.path, e)
            }
        })
    }

    fn save(&self, entries: &[Entry]) -> Result<()> {
        DocumentStore::new().save(&self.path, &entries)?;
        Ok(())
    }
}

impl RegistryStore for SnapshotStore {
    fn read_all(&self, root: &str) -> Result<Vec<Entry>> {
        let entries = self.load()?;
        tracing::debug!(snapshot = %self.path, entries = entries.len(), root, "read snapshot");
        Ok(entries.into_iter().filter(|e| under_root(e, root)).collect())
    }

    fn write(&mut self, path: &str, name: &str, value_type: &ValueType, data: &EntryData) -> Result<()> {
        let mut entries = self.load()?;
        upsert(&mut entries, path, name, value_type, data);
        self.save(&entries)
    }

    fn delete(&mut self, path: &str, name: &str) -> Result<()> {
        let mut entries = self.load()?;
        remove(&mut entries, path, name)?;
        self.save(&entries)
    }
}
