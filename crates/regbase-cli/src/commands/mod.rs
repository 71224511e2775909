//! Command implementations for regbase-cli

pub mod check;
pub mod edit;
pub mod revisions;

pub use check::{run_check, run_fix, run_redundant};
pub use edit::{run_commit, run_discard, run_pending, run_stage};
pub use revisions::{run_list, run_revisions};

use std::path::Path;

use colored::{ColoredString, Colorize};
use regbase_core::{DriftStatus, Entry, RegistryStore, SnapshotStore, Workspace};
use regbase_fs::NormalizedPath;

use crate::error::Result;

/// Open the workspace rooted at `root`, resolving its configuration.
pub fn open_workspace(root: &Path) -> Result<Workspace> {
    Ok(Workspace::open(NormalizedPath::new(root))?)
}

/// Read live entries from a snapshot file, optionally limited to a subtree.
pub fn load_snapshot(snapshot: &Path, under: Option<&str>) -> Result<Vec<Entry>> {
    let store = SnapshotStore::new(NormalizedPath::new(snapshot));
    Ok(store.read_all(under.unwrap_or(""))?)
}

pub(crate) fn status_label(status: DriftStatus) -> ColoredString {
    let label = format!("{:<8}", status.to_string());
    match status {
        DriftStatus::Pass => label.green(),
        DriftStatus::Fail => label.red().bold(),
        DriftStatus::Missing => label.yellow().bold(),
        DriftStatus::Exist | DriftStatus::NotExist => label.cyan(),
    }
}
