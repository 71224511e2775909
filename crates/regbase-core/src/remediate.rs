//! Writing baseline values back into a drifted store

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::audit::AuditSink;
use crate::classify::DriftStatus;
use crate::entry::{Entry, Identity};
use crate::reconcile::Report;
use crate::store::RegistryStore;

/// Options for a remediation run
#[derive(Debug, Clone, Default)]
pub struct RemediateOptions {
    /// If true, report what would be written without touching the store.
    /// Actions will be prefixed with "[dry-run] Would ..."
    pub dry_run: bool,
}

/// Outcome of a remediation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemediationReport {
    /// False if any write failed
    pub success: bool,
    pub actions: Vec<String>,
    pub errors: Vec<String>,
}

impl RemediationReport {
    pub fn success() -> Self {
        Self {
            success: true,
            actions: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn with_action(mut self, action: String) -> Self {
        self.actions.push(action);
        self
    }
}

/// Restores `Fail` and `Missing` entries to their baseline values
pub struct Remediator<'a, S: RegistryStore, A: AuditSink> {
    store: &'a mut S,
    audit: A,
    options: RemediateOptions,
}

impl<'a, S: RegistryStore, A: AuditSink> Remediator<'a, S, A> {
    pub fn new(store: &'a mut S, audit: A, options: RemediateOptions) -> Self {
        Self {
            store,
            audit,
            options,
        }
    }

    /// Write the expected value for every `Fail` or `Missing` row of a full
    /// or filtered report.
    ///
    /// Protected rows are never written; rows whose baseline type is "N/A"
    /// are reported as skipped.
    pub fn remediate(&mut self, expected: &[Entry], report: &Report) -> RemediationReport {
        let index: HashMap<Identity, &Entry> = expected.iter().map(|e| (e.identity(), e)).collect();
        let mut result = RemediationReport::success();

        for row in report.rows() {
            if !matches!(row.status, DriftStatus::Fail | DriftStatus::Missing) {
                continue;
            }
            let key = row.key();
            let Some(entry) = index.get(&Identity::new(&row.path, &row.name)) else {
                result.errors.push(format!("{}: not in baseline", key));
                continue;
            };
            if entry.value_type.is_not_applicable() {
                result = result.with_action(format!("Skipped {}: baseline type is N/A", key));
                continue;
            }

            let verb = match row.status {
                DriftStatus::Missing => "create",
                _ => "set",
            };
            let target = format!("{} = {} [{}]", key, entry.data.display(), entry.value_type);

            if self.options.dry_run {
                result = result.with_action(format!("[dry-run] Would {} {}", verb, target));
                continue;
            }

            let description = format!("{} {}", capitalize(verb), target);

            match self
                .store
                .write(&entry.path, &entry.name, &entry.value_type, &entry.data)
            {
                Ok(()) => {
                    self.audit.record(&format!("Remediate: {}", description));
                    result = result.with_action(description);
                }
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "remediation write failed");
                    result.errors.push(format!("{}: {}", key, e));
                }
            }
        }

        result.success = result.errors.is_empty();
        tracing::info!(
            actions = result.actions.len(),
            errors = result.errors.len(),
            dry_run = self.options.dry_run,
            "remediation finished"
        );
        result
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
