//! A directory of baselines with its ledgers, revisions and configuration

use std::fs;

use regbase_fs::{NormalizedPath, validate_identifier};

use crate::audit::{AuditSink, FileAuditLog};
use crate::baseline::Baseline;
use crate::config::{ConfigResolver, ResolvedConfig};
use crate::entry::Entry;
use crate::reconcile::{ReconcileReport, Reconciler};
use crate::revision::RevisionStore;
use crate::session::{EditSession, SessionPaths};
use crate::Result;

/// Resolved layout of a regbase workspace.
///
/// ```text
/// <root>/
///   .regbase/config.toml
///   golden/MicroAOI.json            baseline
///   golden/MicroAOI_edit.temp       pending ledger
///   golden/MicroAOI.lock            session lock
///   golden/backup/MicroAOI/MicroAOI_rev1_2024-05-01.json
/// ```
#[derive(Debug, Clone)]
pub struct Workspace {
    root: NormalizedPath,
    config: ResolvedConfig,
}

impl Workspace {
    /// Open a workspace, resolving its configuration layers.
    pub fn open(root: impl Into<NormalizedPath>) -> Result<Self> {
        let root = root.into();
        let config = ConfigResolver::new(root.clone()).resolve()?;
        tracing::debug!(root = %root, ?config, "opened workspace");
        Ok(Self { root, config })
    }

    /// Use an already resolved configuration.
    pub fn with_config(root: impl Into<NormalizedPath>, config: ResolvedConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn baselines_dir(&self) -> NormalizedPath {
        self.root.join(&self.config.baselines_dir)
    }

    pub fn baseline_path(&self, id: &str) -> Result<NormalizedPath> {
        validate_identifier(id, "Baseline id")?;
        Ok(self.baselines_dir().join(&format!("{}.json", id)))
    }

    pub fn ledger_path(&self, id: &str) -> Result<NormalizedPath> {
        validate_identifier(id, "Baseline id")?;
        Ok(self
            .root
            .join(&self.config.ledger_dir)
            .join(&format!("{}_edit.temp", id)))
    }

    pub fn lock_path(&self, id: &str) -> Result<NormalizedPath> {
        validate_identifier(id, "Baseline id")?;
        Ok(self
            .root
            .join(&self.config.ledger_dir)
            .join(&format!("{}.lock", id)))
    }

    pub fn revisions(&self) -> RevisionStore {
        RevisionStore::new(self.root.join(&self.config.backups_dir))
    }

    pub fn audit_log(&self) -> FileAuditLog {
        FileAuditLog::new(self.root.join(&self.config.audit_log))
    }

    pub fn reconciler(&self) -> Reconciler {
        Reconciler::new(self.config.classifier())
    }

    /// Ids of every `*.json` baseline in the baselines directory, sorted.
    pub fn list_baselines(&self) -> Result<Vec<String>> {
        let dir = self.baselines_dir();
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in fs::read_dir(dir.to_native())? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            if let Some(id) = file_name.to_str().and_then(|n| n.strip_suffix(".json"))
                && validate_identifier(id, "Baseline id").is_ok()
            {
                ids.push(id.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }

    pub fn load_baseline(&self, id: &str) -> Result<Baseline> {
        Baseline::load(id, &self.baseline_path(id)?)
    }

    /// Reconcile a baseline against a snapshot of live entries.
    pub fn reconcile(&self, id: &str, actual: &[Entry]) -> Result<ReconcileReport> {
        let baseline = self.load_baseline(id)?;
        Ok(self.reconciler().reconcile(&baseline.entries, actual))
    }

    /// Start editing a baseline.
    ///
    /// # Errors
    ///
    /// `SessionLocked` while another session holds the baseline,
    /// `BaselineNotFound` if the baseline file does not exist.
    pub fn open_session<A: AuditSink>(&self, id: &str, audit: A) -> Result<EditSession<A>> {
        let paths = SessionPaths {
            baseline: self.baseline_path(id)?,
            ledger: self.ledger_path(id)?,
            lock: self.lock_path(id)?,
        };
        EditSession::open(id, paths, self.revisions(), audit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn workspace(temp: &TempDir) -> Workspace {
        Workspace::with_config(temp.path(), ResolvedConfig::default())
    }

    #[test]
    fn layout_follows_config() {
        let temp = TempDir::new().unwrap();
        let ws = workspace(&temp);

        assert!(ws.baseline_path("MicroAOI").unwrap().as_str().ends_with("golden/MicroAOI.json"));
        assert!(ws.ledger_path("MicroAOI").unwrap().as_str().ends_with("golden/MicroAOI_edit.temp"));
        assert!(ws.lock_path("MicroAOI").unwrap().as_str().ends_with("golden/MicroAOI.lock"));
    }

    #[test]
    fn rejects_ids_that_escape_the_directory() {
        let temp = TempDir::new().unwrap();
        let ws = workspace(&temp);

        assert!(ws.baseline_path("../etc").is_err());
        assert!(ws.ledger_path("a/b").is_err());
    }

    #[test]
    fn lists_json_baselines_only() {
        let temp = TempDir::new().unwrap();
        let golden = temp.path().join("golden");
        std::fs::create_dir_all(golden.join("backup")).unwrap();
        std::fs::write(golden.join("MicroAOI.json"), "[]").unwrap();
        std::fs::write(golden.join("Apex.json"), "[]").unwrap();
        std::fs::write(golden.join("Apex_edit.temp"), "[]").unwrap();

        assert_eq!(workspace(&temp).list_baselines().unwrap(), vec!["Apex", "MicroAOI"]);
    }
}
