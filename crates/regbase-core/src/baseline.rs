//! Golden baseline documents

use std::collections::HashMap;

use regbase_fs::{DocumentStore, NormalizedPath};

use crate::entry::{Entry, Identity};
use crate::{Error, Result};

/// A named, ordered collection of expected entries for one machine class.
///
/// Order is preserved across load/commit/save so that files diff cleanly,
/// but carries no meaning for reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Baseline {
    /// Machine type identifying this baseline (e.g. "MicroAOI")
    pub id: String,
    pub entries: Vec<Entry>,
}

impl Baseline {
    pub fn new(id: impl Into<String>, entries: Vec<Entry>) -> Self {
        Self {
            id: id.into(),
            entries,
        }
    }

    /// Load a baseline file.
    ///
    /// # Errors
    ///
    /// `BaselineNotFound` if the file does not exist, `MalformedData` if it
    /// is not an array of `[path, name, data, type]` tuples.
    pub fn load(id: &str, path: &NormalizedPath) -> Result<Self> {
        let entries: Vec<Entry> = DocumentStore::new().load(path).map_err(|e| {
            if e.is_not_found() {
                Error::BaselineNotFound {
                    id: id.to_string(),
                    path: path.to_native(),
                }
            } else {
                Error::malformed(path, e)
            }
        })?;

        tracing::debug!(baseline = id, entries = entries.len(), "loaded baseline");
        Ok(Self::new(id, entries))
    }

    /// Write the baseline atomically to `path`.
    pub fn save(&self, path: &NormalizedPath) -> Result<()> {
        DocumentStore::new().save(path, &self.entries)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry with the given identity.
    pub fn find(&self, identity: &Identity) -> Option<&Entry> {
        self.entries.iter().find(|e| &e.identity() == identity)
    }

    /// Identities that occur more than once, in first-seen order.
    pub fn duplicate_identities(&self) -> Vec<Identity> {
        duplicate_identities(&self.entries)
    }
}

pub(crate) fn duplicate_identities(entries: &[Entry]) -> Vec<Identity> {
    let mut counts: HashMap<Identity, usize> = HashMap::new();
    let mut order = Vec::new();
    for entry in entries {
        let identity = entry.identity();
        let count = counts.entry(identity.clone()).or_insert(0);
        *count += 1;
        if *count == 2 {
            order.push(identity);
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn load_missing_baseline_is_not_found() {
        let dir = TempDir::new().unwrap();
        let path = NormalizedPath::new(dir.path()).join("MicroAOI.json");

        let err = Baseline::load("MicroAOI", &path).unwrap_err();
        assert!(matches!(err, Error::BaselineNotFound { .. }), "got {err:?}");
    }

    #[test]
    fn load_wrong_shape_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = NormalizedPath::new(dir.path()).join("MicroAOI.json");
        std::fs::write(path.to_native(), r#"[["P","N"]]"#).unwrap();

        let err = Baseline::load("MicroAOI", &path).unwrap_err();
        assert!(matches!(err, Error::MalformedData { .. }), "got {err:?}");
    }

    #[test]
    fn save_preserves_order() {
        let dir = TempDir::new().unwrap();
        let path = NormalizedPath::new(dir.path()).join("MicroAOI.json");
        let baseline = Baseline::new(
            "MicroAOI",
            vec![
                Entry::new("Z", "b", "REG_SZ", "1"),
                Entry::new("A", "a", "REG_SZ", "2"),
            ],
        );

        baseline.save(&path).unwrap();
        let loaded = Baseline::load("MicroAOI", &path).unwrap();
        assert_eq!(loaded, baseline);
    }

    #[test]
    fn duplicate_identities_are_case_insensitive() {
        let baseline = Baseline::new(
            "MicroAOI",
            vec![
                Entry::new("K", "V", "REG_SZ", "1"),
                Entry::new("k", "v", "REG_SZ", "2"),
                Entry::new("K", "W", "REG_SZ", "3"),
                Entry::new("K", "V", "REG_SZ", "4"),
            ],
        );
        assert_eq!(baseline.duplicate_identities(), vec![Identity::new("K", "V")]);
    }
}
