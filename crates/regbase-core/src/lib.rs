//! Golden baseline auditing for registry-style configuration stores
//!
//! This crate implements:
//!
//! - **Classification**: drift status of one expected/actual entry pair
//! - **Reconciliation**: full, filtered and redundant reports over whole sets
//! - **Edit ledger**: pending Add/Edit/Delete actions with collapsing rules
//! - **Edit sessions**: locked commit/discard of a ledger into a baseline,
//!   with a numbered backup revision per commit
//! - **Remediation**: writing baseline values back into a drifted store
//!
//! # Architecture
//!
//! ```text
//!   live snapshot ----+
//!                     +--> Reconciler --> ReconcileReport --> Remediator
//!   Baseline ---------+
//!      |
//!      +--> EditSession --(stage)--> Ledger ({id}_edit.temp)
//!                |
//!                +--(commit)--> RevisionStore backup + rewritten Baseline
//! ```
//!
//! # Example
//!
//! ```
//! use regbase_core::{Classifier, DriftStatus, Entry, Reconciler};
//!
//! let expected = vec![Entry::new("HKLM\\Software\\Vendor", "Mode", "REG_SZ", "auto")];
//! let actual = vec![Entry::new("hklm\\software\\vendor", "mode", "REG_SZ", "manual")];
//!
//! let report = Reconciler::new(Classifier::default()).full_report(&expected, &actual);
//! assert_eq!(
//!     report.status_of("HKLM\\Software\\Vendor\\Mode"),
//!     Some(DriftStatus::Fail)
//! );
//! ```

pub mod audit;
pub mod baseline;
pub mod classify;
pub mod config;
pub mod entry;
pub mod error;
pub mod ledger;
pub mod reconcile;
pub mod remediate;
pub mod revision;
pub mod session;
pub mod store;
pub mod workspace;

pub use audit::{AuditSink, FileAuditLog, MemoryAuditLog};
pub use baseline::Baseline;
pub use classify::{Classification, Classifier, DriftStatus};
pub use config::{ConfigResolver, Manifest, ResolvedConfig};
pub use entry::{DataError, Entry, EntryData, Identity, NOT_APPLICABLE, PLACEHOLDER, ValueType};
pub use error::{Error, Result};
pub use ledger::{ActionKind, Change, Ledger, PendingAction};
pub use reconcile::{ComplianceStatus, ReconcileReport, Reconciler, Report, ReportRow, Summary};
pub use remediate::{RemediateOptions, RemediationReport, Remediator};
pub use revision::{Revision, RevisionStore};
pub use session::{CommitOutcome, EditSession, FailedAction, Replay, replay};
pub use store::{MemoryStore, RegistryStore, SnapshotStore};
pub use workspace::Workspace;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn error_session_locked_displays_lock_path() {
        let error = Error::SessionLocked {
            id: "MicroAOI".to_string(),
            lock: PathBuf::from("/golden/MicroAOI.lock"),
        };

        let display = format!("{}", error);
        assert!(
            display.contains("/golden/MicroAOI.lock"),
            "Error display should contain the lock path, got: {}",
            display
        );
        assert!(display.contains("MicroAOI"));
    }

    #[test]
    fn error_partial_apply_counts_failures() {
        let error = Error::PartialApply {
            id: "MicroAOI".to_string(),
            applied: 2,
            failed: vec!["Delete K\\V: - [REG_SZ]".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "Commit of 'MicroAOI' applied 2 action(s); 1 failed"
        );
    }
}
