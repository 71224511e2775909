//! Editing sessions over one baseline
//!
//! An [`EditSession`] owns the baseline's lock file for as long as it lives.
//! Staged changes go to the ledger file immediately, so a session that is
//! closed without committing leaves its ledger for the next session to adopt.
//!
//! Lifecycle: open (baseline and ledger loaded) -> stage* -> commit |
//! discard | close.

mod replay;

pub use replay::{FailedAction, Replay, replay};

use chrono::{Local, NaiveDate};
use regbase_fs::NormalizedPath;
use regbase_fs::io::LockFile;
use serde::Serialize;

use crate::audit::AuditSink;
use crate::baseline::Baseline;
use crate::entry::Entry;
use crate::ledger::{ActionKind, Change, Ledger, PendingAction};
use crate::revision::{Revision, RevisionStore};
use crate::{Error, Result};

/// Files a session works on
#[derive(Debug, Clone)]
pub(crate) struct SessionPaths {
    pub baseline: NormalizedPath,
    pub ledger: NormalizedPath,
    pub lock: NormalizedPath,
}

/// Result of a commit
#[derive(Debug, Clone, Serialize)]
pub struct CommitOutcome {
    /// Backup taken before the baseline was rewritten
    pub revision: Revision,
    pub applied: Vec<PendingAction>,
    pub failed: Vec<FailedAction>,
}

impl CommitOutcome {
    /// True when some actions could not be replayed.
    pub fn is_partial(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Turn a partial commit into [`Error::PartialApply`].
    ///
    /// The baseline has already been written either way.
    pub fn into_result(self) -> Result<Self> {
        if self.is_partial() {
            return Err(Error::PartialApply {
                id: self.revision.baseline_id.clone(),
                applied: self.applied.len(),
                failed: self.failed.iter().map(|f| f.action.describe()).collect(),
            });
        }
        Ok(self)
    }
}

/// Exclusive editing access to one baseline
pub struct EditSession<A: AuditSink> {
    baseline: Baseline,
    ledger: Ledger,
    paths: SessionPaths,
    revisions: RevisionStore,
    audit: A,
    _lock: LockFile,
}

impl<A: AuditSink> EditSession<A> {
    pub(crate) fn open(
        id: &str,
        paths: SessionPaths,
        revisions: RevisionStore,
        audit: A,
    ) -> Result<Self> {
        let lock = LockFile::try_acquire(&paths.lock)?.ok_or_else(|| Error::SessionLocked {
            id: id.to_string(),
            lock: paths.lock.to_native(),
        })?;

        let baseline = Baseline::load(id, &paths.baseline)?;
        let ledger = Ledger::load(&paths.ledger)?;
        if !ledger.is_empty() {
            tracing::info!(
                baseline = id,
                pending = ledger.len(),
                "resuming uncommitted ledger"
            );
        }

        Ok(Self {
            baseline,
            ledger,
            paths,
            revisions,
            audit,
            _lock: lock,
        })
    }

    pub fn id(&self) -> &str {
        &self.baseline.id
    }

    /// Baseline as it is on disk
    pub fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    pub fn pending(&self) -> &[PendingAction] {
        self.ledger.actions()
    }

    pub fn ledger_path(&self) -> &NormalizedPath {
        &self.paths.ledger
    }

    /// Stage changes and persist the ledger.
    ///
    /// `Edit` changes without a previous value pick it up from the preview,
    /// so an edit staged on top of another shows the staged value.
    pub fn stage(&mut self, kind: ActionKind, changes: impl IntoIterator<Item = Change>) -> Result<()> {
        let current_entries = match kind {
            ActionKind::Edit => self.preview_entries(),
            _ => Vec::new(),
        };
        let changes: Vec<Change> = changes
            .into_iter()
            .map(|change| match kind {
                ActionKind::Edit if change.previous_data.is_none() => {
                    let identity = change.identity();
                    match current_entries.iter().find(|e| e.identity() == identity) {
                        Some(current) => {
                            let (value_type, data) = (current.value_type.clone(), current.data.display());
                            change.with_previous(value_type, data)
                        }
                        None => change,
                    }
                }
                _ => change,
            })
            .collect();

        tracing::debug!(baseline = self.id(), %kind, count = changes.len(), "staging changes");
        self.ledger.append(changes, kind);
        self.ledger.save(&self.paths.ledger)
    }

    pub fn stage_add(&mut self, changes: impl IntoIterator<Item = Change>) -> Result<()> {
        self.stage(ActionKind::Add, changes)
    }

    pub fn stage_edit(&mut self, changes: impl IntoIterator<Item = Change>) -> Result<()> {
        self.stage(ActionKind::Edit, changes)
    }

    pub fn stage_delete(&mut self, changes: impl IntoIterator<Item = Change>) -> Result<()> {
        self.stage(ActionKind::Delete, changes)
    }

    /// Baseline with the pending actions applied, without writing anything.
    pub fn preview(&self) -> Replay {
        replay(&self.baseline.entries, self.ledger.actions())
    }

    /// Merged view for display: baseline entries after replay.
    pub fn preview_entries(&self) -> Vec<Entry> {
        self.preview().entries
    }

    /// Commit with today's local date on the revision.
    pub fn commit(self) -> Result<CommitOutcome> {
        self.commit_on(Local::now().date_naive())
    }

    /// Commit the ledger into the baseline.
    ///
    /// The on-disk baseline is first copied into the next revision slot; if
    /// that fails nothing else happens. Actions that cannot be replayed are
    /// skipped and listed in the outcome. The ledger is removed afterwards.
    pub fn commit_on(self, date: NaiveDate) -> Result<CommitOutcome> {
        let id = self.baseline.id.clone();
        let revision = self.revisions.create(&id, &self.paths.baseline, date)?;

        let result = replay(&self.baseline.entries, self.ledger.actions());
        Baseline::new(&id, result.entries).save(&self.paths.baseline)?;
        Ledger::remove(&self.paths.ledger)?;

        for action in &result.applied {
            self.audit.record(&format!("Commit {}: {}", id, action.describe()));
        }
        for failed in &result.failed {
            self.audit.record(&format!(
                "Commit {}: skipped {} ({})",
                id,
                failed.action.describe(),
                failed.reason
            ));
        }

        tracing::info!(
            baseline = %id,
            revision = revision.number,
            applied = result.applied.len(),
            failed = result.failed.len(),
            "committed ledger"
        );

        Ok(CommitOutcome {
            revision,
            applied: result.applied,
            failed: result.failed,
        })
    }

    /// Drop the ledger, leaving the baseline untouched.
    ///
    /// Returns the discarded actions.
    pub fn discard(self) -> Result<Vec<PendingAction>> {
        let id = self.baseline.id.clone();
        Ledger::remove(&self.paths.ledger)?;

        let actions = self.ledger.into_actions();
        for action in &actions {
            self.audit.record(&format!("Discard {}: {}", id, action.describe()));
        }
        tracing::info!(baseline = %id, discarded = actions.len(), "discarded ledger");
        Ok(actions)
    }

    /// End the session, keeping the ledger on disk.
    pub fn close(self) {
        tracing::debug!(baseline = self.id(), pending = self.ledger.len(), "closing session");
    }
}
