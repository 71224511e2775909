//! Numbered backup revisions of baselines
//!
//! Before each commit the on-disk baseline is copied to
//! `{backups_root}/{id}/{id}_rev{N}_{YYYY-MM-DD}.json`. `N` starts at 1 and
//! is one more than the highest number already present; gaps left by manual
//! cleanup are never reused.

use chrono::NaiveDate;
use regex::Regex;
use regbase_fs::{NormalizedPath, io, validate_identifier};
use serde::Serialize;
use std::fs;
use std::sync::LazyLock;

use crate::baseline::Baseline;
use crate::entry::Entry;
use crate::{Error, Result};

/// `{id}_rev{N}_{YYYY-MM-DD}.json`
static REVISION_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+)_rev(\d+)_(\d{4}-\d{2}-\d{2})\.json$").unwrap());

/// A stored backup of a baseline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Revision {
    pub baseline_id: String,
    /// Revision number, >= 1
    pub number: u32,
    /// Day the revision was taken
    pub date: NaiveDate,
    pub path: NormalizedPath,
}

/// Lists and creates revisions under a backups root
#[derive(Debug, Clone)]
pub struct RevisionStore {
    root: NormalizedPath,
}

impl RevisionStore {
    pub fn new(root: NormalizedPath) -> Self {
        Self { root }
    }

    /// Folder holding the revisions of one baseline
    pub fn revision_dir(&self, baseline_id: &str) -> NormalizedPath {
        self.root.join(baseline_id)
    }

    /// File name for revision `number` taken on `date`
    pub fn file_name(baseline_id: &str, number: u32, date: NaiveDate) -> String {
        format!("{}_rev{}_{}.json", baseline_id, number, date.format("%Y-%m-%d"))
    }

    /// All revisions of a baseline, sorted by number.
    ///
    /// Files that do not follow the naming pattern are ignored. A missing
    /// folder means no revisions.
    pub fn list(&self, baseline_id: &str) -> Result<Vec<Revision>> {
        validate_identifier(baseline_id, "Baseline id")?;
        let dir = self.revision_dir(baseline_id);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut revisions = Vec::new();

        for entry in fs::read_dir(dir.to_native())? {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            let Some(captures) = REVISION_FILE.captures(file_name) else {
                continue;
            };
            if &captures[1] != baseline_id {
                continue;
            }
            let (Ok(number), Ok(date)) = (
                captures[2].parse::<u32>(),
                NaiveDate::parse_from_str(&captures[3], "%Y-%m-%d"),
            ) else {
                tracing::debug!(file = file_name, "skipping unparseable revision file name");
                continue;
            };

            revisions.push(Revision {
                baseline_id: baseline_id.to_string(),
                number,
                date,
                path: dir.join(file_name),
            });
        }

        revisions.sort_by_key(|r| r.number);
        Ok(revisions)
    }

    /// Next revision number: highest existing + 1, or 1.
    ///
    /// # Errors
    ///
    /// `BackupFailed` when the highest number is already `u32::MAX`.
    pub fn next_number(&self, baseline_id: &str) -> Result<u32> {
        match self.list(baseline_id)?.iter().map(|r| r.number).max() {
            None => Ok(1),
            Some(highest) => highest.checked_add(1).ok_or_else(|| Error::BackupFailed {
                id: baseline_id.to_string(),
                reason: format!("revision number {} cannot be incremented", highest),
            }),
        }
    }

    /// Copy `baseline_path` into the next revision slot.
    ///
    /// # Errors
    ///
    /// `BackupFailed` if the copy cannot be made.
    pub fn create(
        &self,
        baseline_id: &str,
        baseline_path: &NormalizedPath,
        date: NaiveDate,
    ) -> Result<Revision> {
        let number = self.next_number(baseline_id)?;
        let path = self
            .revision_dir(baseline_id)
            .join(&Self::file_name(baseline_id, number, date));

        io::copy_file(baseline_path, &path).map_err(|e| Error::BackupFailed {
            id: baseline_id.to_string(),
            reason: e.to_string(),
        })?;

        tracing::info!(baseline = baseline_id, number, path = %path, "created baseline revision");
        Ok(Revision {
            baseline_id: baseline_id.to_string(),
            number,
            date,
            path,
        })
    }

    /// Read the entries stored in a revision.
    pub fn load_entries(&self, revision: &Revision) -> Result<Vec<Entry>> {
        Ok(Baseline::load(&revision.baseline_id, &revision.path)?.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    #[test]
    fn file_name_format() {
        assert_eq!(
            RevisionStore::file_name("MicroAOI", 3, date()),
            "MicroAOI_rev3_2026-10-16.json"
        );
    }

    #[test]
    fn next_number_defaults_to_one() {
        let dir = TempDir::new().unwrap();
        let store = RevisionStore::new(NormalizedPath::new(dir.path()));
        assert_eq!(store.next_number("MicroAOI").unwrap(), 1);
    }

    #[test]
    fn ids_with_regex_characters_are_matched_literally() {
        let dir = TempDir::new().unwrap();
        let store = RevisionStore::new(NormalizedPath::new(dir.path()));
        let folder = dir.path().join("AOI+2");
        fs::create_dir_all(&folder).unwrap();
        fs::write(folder.join("AOI+2_rev7_2026-01-01.json"), "[]").unwrap();
        fs::write(folder.join("AOII2_rev9_2026-01-01.json"), "[]").unwrap();

        assert_eq!(store.next_number("AOI+2").unwrap(), 8);
    }

    #[test]
    fn exhausted_revision_numbers_fail_backup() {
        let dir = TempDir::new().unwrap();
        let store = RevisionStore::new(NormalizedPath::new(dir.path()));
        let folder = dir.path().join("MicroAOI");
        fs::create_dir_all(&folder).unwrap();
        fs::write(folder.join(format!("MicroAOI_rev{}_2026-01-01.json", u32::MAX)), "[]").unwrap();

        let err = store.next_number("MicroAOI").unwrap_err();
        assert!(matches!(err, Error::BackupFailed { .. }), "got {err:?}");
    }

    #[test]
    fn invalid_id_is_rejected() {
        let dir = TempDir::new().unwrap();
        let store = RevisionStore::new(NormalizedPath::new(dir.path()));
        assert!(store.list("../escape").is_err());
    }
}
