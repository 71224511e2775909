//! Edit ledger: pending changes to one baseline
//!
//! The ledger is an ordered list of [`PendingAction`]s persisted as a JSON
//! array next to the baselines (`{id}_edit.temp`). It survives between
//! sessions until it is committed or discarded.
//!
//! # Collapsing rules
//!
//! When a change arrives for an identity that already has an action, the
//! first action with that identity is inspected:
//!
//! - existing `Add`, incoming `Delete`: the `Add` becomes a `Delete`
//! - existing `Add`, incoming `Edit`: the `Add` takes the new type and data
//! - anything else: the change is appended as a new action
//!
//! So an `Edit` following an `Edit` is recorded twice; replay applies both
//! in order.

mod action;

pub use action::{ActionKind, Change, PendingAction, StagedEdit, StagedEntry};

use regbase_fs::{DocumentStore, NormalizedPath, io};
use serde::{Deserialize, Serialize};

use crate::entry::PLACEHOLDER;
use crate::{Error, Result};

/// Ordered pending actions for one baseline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    actions: Vec<PendingAction>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a ledger file; a missing file is an empty ledger.
    ///
    /// # Errors
    ///
    /// `MalformedData` if the file is not a JSON array of actions.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let ledger: Option<Ledger> = DocumentStore::new()
            .load_optional(path)
            .map_err(|e| Error::malformed(path, e))?;
        Ok(ledger.unwrap_or_default())
    }

    /// Save the ledger atomically.
    pub fn save(&self, path: &NormalizedPath) -> Result<()> {
        DocumentStore::new().save(path, self)?;
        Ok(())
    }

    /// Delete the ledger file. Returns true if a file was removed.
    pub fn remove(path: &NormalizedPath) -> Result<bool> {
        Ok(io::remove_if_exists(path)?)
    }

    pub fn actions(&self) -> &[PendingAction] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn into_actions(self) -> Vec<PendingAction> {
        self.actions
    }

    /// Stage changes of one kind, applying the collapsing rules.
    ///
    /// Blank data is stored as `"-"`.
    pub fn append(&mut self, changes: impl IntoIterator<Item = Change>, kind: ActionKind) {
        for mut change in changes {
            if change.data.trim().is_empty() {
                change.data = PLACEHOLDER.to_string();
            }

            let identity = change.identity();
            let existing = self.actions.iter().position(|a| a.identity() == identity);

            match (existing, kind) {
                (Some(pos), ActionKind::Delete) if self.actions[pos].kind() == ActionKind::Add => {
                    tracing::debug!(identity = %identity, "collapsing Add + Delete into Delete");
                    let add = self.actions.remove(pos);
                    self.actions.insert(pos, add.into_delete());
                }
                (Some(pos), ActionKind::Edit) if self.actions[pos].kind() == ActionKind::Add => {
                    tracing::debug!(identity = %identity, "folding Edit into pending Add");
                    self.actions[pos].set_value(change.value_type, change.data);
                }
                _ => {
                    tracing::debug!(identity = %identity, %kind, "staging action");
                    self.actions.push(PendingAction::from_change(change, kind));
                }
            }
        }
    }
}
