//! Folding pending actions into a list of entries

use serde::Serialize;

use crate::entry::{Entry, EntryData};
use crate::ledger::PendingAction;

/// An action that could not be replayed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedAction {
    pub action: PendingAction,
    pub reason: String,
}

impl FailedAction {
    fn new(action: &PendingAction, reason: impl Into<String>) -> Self {
        Self {
            action: action.clone(),
            reason: reason.into(),
        }
    }
}

/// Result of replaying a ledger against baseline entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Replay {
    /// Entries after every applicable action
    pub entries: Vec<Entry>,
    pub applied: Vec<PendingAction>,
    pub failed: Vec<FailedAction>,
}

impl Replay {
    pub fn is_partial(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Apply `actions` in order to a copy of `entries`.
///
/// - `Add` appends the staged entry. An identity that already exists is
///   appended anyway and logged.
/// - `Delete` removes every entry with the action's identity. Deleting an
///   identity that is not there leaves the entries as they are and still
///   counts as applied; a staged Add followed by a Delete collapses to one.
/// - `Edit` overwrites type and data of every entry with the identity.
///
/// An `Edit` that matches nothing is skipped and reported in
/// [`Replay::failed`]; later actions still run.
pub fn replay(entries: &[Entry], actions: &[PendingAction]) -> Replay {
    let mut result = Replay {
        entries: entries.to_vec(),
        ..Replay::default()
    };

    for action in actions {
        let identity = action.identity();
        match action {
            PendingAction::Add(_) => {
                if result.entries.iter().any(|e| e.identity() == identity) {
                    tracing::warn!(identity = %identity, "Add of an identity already in the baseline");
                }
                result.entries.push(action.to_entry());
            }
            PendingAction::Delete(_) => {
                let before = result.entries.len();
                result.entries.retain(|e| e.identity() != identity);
                if result.entries.len() == before {
                    tracing::warn!(identity = %identity, "Delete matched no entry, nothing removed");
                }
            }
            PendingAction::Edit(edit) => {
                let mut matched = false;
                for entry in result.entries.iter_mut().filter(|e| e.identity() == identity) {
                    entry.value_type = edit.value_type.clone();
                    entry.data = EntryData::from(edit.data.as_str());
                    matched = true;
                }
                if !matched {
                    tracing::warn!(identity = %identity, "Edit matched no entry, skipped");
                    result
                        .failed
                        .push(FailedAction::new(action, format!("no entry {} to edit", identity)));
                    continue;
                }
            }
        }
        result.applied.push(action.clone());
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{ActionKind, Change, Ledger};
    use pretty_assertions::assert_eq;

    fn ledger(changes: Vec<(ActionKind, Change)>) -> Vec<PendingAction> {
        let mut ledger = Ledger::new();
        for (kind, change) in changes {
            ledger.append([change], kind);
        }
        ledger.into_actions()
    }

    #[test]
    fn edit_mutates_in_place() {
        let entries = vec![
            Entry::new("P", "A", "REG_SZ", "x"),
            Entry::new("P", "N", "REG_SZ", "1"),
            Entry::new("P", "B", "REG_SZ", "y"),
        ];
        let actions = ledger(vec![(ActionKind::Edit, Change::new("p", "n", "REG_SZ", "2"))]);

        let result = replay(&entries, &actions);

        assert_eq!(result.entries[1], Entry::new("P", "N", "REG_SZ", "2"));
        assert_eq!(result.entries.len(), 3);
        assert_eq!(result.applied.len(), 1);
        assert!(!result.is_partial());
    }

    #[test]
    fn add_then_delete_round_trips() {
        let entries = vec![Entry::new("P", "N", "REG_SZ", "1")];
        let actions = ledger(vec![
            (ActionKind::Add, Change::new("P", "New", "REG_DWORD", "1")),
            (ActionKind::Delete, Change::new("P", "N", "REG_SZ", "1")),
        ]);

        let result = replay(&entries, &actions);
        assert_eq!(result.entries, vec![Entry::new("P", "New", "REG_DWORD", "1")]);
    }

    #[test]
    fn unmatched_edit_is_skipped_not_fatal() {
        let entries = vec![Entry::new("P", "N", "REG_SZ", "1")];
        let actions = ledger(vec![
            (ActionKind::Edit, Change::new("P", "Gone", "REG_SZ", "1")),
            (ActionKind::Edit, Change::new("P", "N", "REG_SZ", "2")),
        ]);

        let result = replay(&entries, &actions);

        assert!(result.is_partial());
        assert_eq!(result.failed.len(), 1);
        assert_eq!(result.failed[0].action.name(), "Gone");
        assert_eq!(result.applied.len(), 1);
        assert_eq!(result.entries, vec![Entry::new("P", "N", "REG_SZ", "2")]);
    }

    #[test]
    fn collapsed_add_then_delete_is_a_no_op() {
        let entries = vec![Entry::new("P", "N", "REG_SZ", "1")];
        let actions = ledger(vec![
            (ActionKind::Add, Change::new("P", "New", "REG_SZ", "x")),
            (ActionKind::Delete, Change::new("P", "New", "REG_SZ", "x")),
        ]);
        assert_eq!(actions.len(), 1);

        let result = replay(&entries, &actions);

        assert!(!result.is_partial());
        assert_eq!(result.applied.len(), 1);
        assert_eq!(result.entries, entries);
    }

    #[test]
    fn duplicate_add_is_appended() {
        let entries = vec![Entry::new("P", "N", "REG_SZ", "1")];
        let actions = ledger(vec![(ActionKind::Add, Change::new("P", "N", "REG_SZ", "2"))]);

        let result = replay(&entries, &actions);
        assert_eq!(result.entries.len(), 2);
        assert!(result.failed.is_empty());
    }

    #[test]
    fn edit_after_edit_applies_last_value() {
        let entries = vec![Entry::new("P", "N", "REG_SZ", "1")];
        let actions = ledger(vec![
            (ActionKind::Edit, Change::new("P", "N", "REG_SZ", "2")),
            (ActionKind::Edit, Change::new("P", "N", "REG_SZ", "3")),
        ]);
        assert_eq!(actions.len(), 2);

        let result = replay(&entries, &actions);
        assert_eq!(result.entries, vec![Entry::new("P", "N", "REG_SZ", "3")]);
    }
}
