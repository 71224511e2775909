//! Pending actions recorded in an edit ledger
//!
//! Field names follow the ledger file format: each action is a JSON object
//! with `"Registry Key/Subkey Path"`, `"Registry Name"`, `"Data"`, `"Type"`
//! and an `"Action"` tag. Edits also carry `"Previous Data"` and
//! `"Previous Type"` for audit display.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entry::{Entry, Identity, PLACEHOLDER, ValueType};

/// Kind of staged change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Add,
    Edit,
    Delete,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Add => "Add",
            Self::Edit => "Edit",
            Self::Delete => "Delete",
        };
        f.write_str(label)
    }
}

/// The key/value an action targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedEntry {
    #[serde(rename = "Registry Key/Subkey Path", alias = "Path")]
    pub path: String,
    #[serde(rename = "Registry Name", alias = "Name")]
    pub name: String,
    #[serde(rename = "Data", alias = "Current Data")]
    pub data: String,
    #[serde(rename = "Type", alias = "Current Type")]
    pub value_type: ValueType,
}

/// An edit, with the value it replaces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedEdit {
    #[serde(rename = "Registry Key/Subkey Path", alias = "Path")]
    pub path: String,
    #[serde(rename = "Registry Name", alias = "Name")]
    pub name: String,
    #[serde(rename = "Data", alias = "Current Data")]
    pub data: String,
    #[serde(rename = "Type", alias = "Current Type")]
    pub value_type: ValueType,
    #[serde(rename = "Previous Data", default, skip_serializing_if = "Option::is_none")]
    pub previous_data: Option<String>,
    #[serde(rename = "Previous Type", default, skip_serializing_if = "Option::is_none")]
    pub previous_type: Option<ValueType>,
}

/// One uncommitted change to a baseline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "Action")]
pub enum PendingAction {
    Add(StagedEntry),
    Edit(StagedEdit),
    Delete(StagedEntry),
}

impl PendingAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Add(_) => ActionKind::Add,
            Self::Edit(_) => ActionKind::Edit,
            Self::Delete(_) => ActionKind::Delete,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Self::Add(e) | Self::Delete(e) => &e.path,
            Self::Edit(e) => &e.path,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Add(e) | Self::Delete(e) => &e.name,
            Self::Edit(e) => &e.name,
        }
    }

    pub fn data(&self) -> &str {
        match self {
            Self::Add(e) | Self::Delete(e) => &e.data,
            Self::Edit(e) => &e.data,
        }
    }

    pub fn value_type(&self) -> &ValueType {
        match self {
            Self::Add(e) | Self::Delete(e) => &e.value_type,
            Self::Edit(e) => &e.value_type,
        }
    }

    pub fn identity(&self) -> Identity {
        Identity::new(self.path(), self.name())
    }

    /// The entry this action would write (for `Delete`, the entry it names).
    pub fn to_entry(&self) -> Entry {
        Entry::new(self.path(), self.name(), self.value_type().clone(), self.data())
    }

    /// One-line description for audit logs.
    pub fn describe(&self) -> String {
        match self {
            Self::Edit(edit) => format!(
                "Edit {}\\{}: {} [{}] -> {} [{}]",
                edit.path,
                edit.name,
                edit.previous_data.as_deref().unwrap_or(PLACEHOLDER),
                edit.previous_type
                    .as_ref()
                    .map(ValueType::as_str)
                    .unwrap_or(PLACEHOLDER),
                edit.data,
                edit.value_type
            ),
            other => format!(
                "{} {}\\{}: {} [{}]",
                other.kind(),
                other.path(),
                other.name(),
                other.data(),
                other.value_type()
            ),
        }
    }

    pub(crate) fn from_change(change: Change, kind: ActionKind) -> Self {
        let staged = StagedEntry {
            path: change.path,
            name: change.name,
            data: change.data,
            value_type: change.value_type,
        };
        match kind {
            ActionKind::Add => Self::Add(staged),
            ActionKind::Delete => Self::Delete(staged),
            ActionKind::Edit => Self::Edit(StagedEdit {
                path: staged.path,
                name: staged.name,
                data: staged.data,
                value_type: staged.value_type,
                previous_data: change.previous_data,
                previous_type: change.previous_type,
            }),
        }
    }

    /// Overwrite the staged type and data in place, keeping the kind.
    pub(crate) fn set_value(&mut self, value_type: ValueType, data: String) {
        match self {
            Self::Add(e) | Self::Delete(e) => {
                e.value_type = value_type;
                e.data = data;
            }
            Self::Edit(e) => {
                e.value_type = value_type;
                e.data = data;
            }
        }
    }

    /// Turn this action into a `Delete` of the same key and value.
    pub(crate) fn into_delete(self) -> Self {
        let entry = self.to_entry();
        Self::Delete(StagedEntry {
            path: entry.path,
            name: entry.name,
            data: entry.data.display(),
            value_type: entry.value_type,
        })
    }
}

/// A change requested by an operator, before it is staged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub path: String,
    pub name: String,
    pub value_type: ValueType,
    pub data: String,
    pub previous_type: Option<ValueType>,
    pub previous_data: Option<String>,
}

impl Change {
    pub fn new(
        path: impl Into<String>,
        name: impl Into<String>,
        value_type: impl Into<ValueType>,
        data: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            value_type: value_type.into(),
            data: data.into(),
            previous_type: None,
            previous_data: None,
        }
    }

    /// Record the value being replaced (shown for `Edit` actions).
    pub fn with_previous(mut self, value_type: impl Into<ValueType>, data: impl Into<String>) -> Self {
        self.previous_type = Some(value_type.into());
        self.previous_data = Some(data.into());
        self
    }

    pub fn identity(&self) -> Identity {
        Identity::new(&self.path, &self.name)
    }
}

impl From<&Entry> for Change {
    fn from(entry: &Entry) -> Self {
        Self::new(
            entry.path.clone(),
            entry.name.clone(),
            entry.value_type.clone(),
            entry.data.display(),
        )
    }
}
