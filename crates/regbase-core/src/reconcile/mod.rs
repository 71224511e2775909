//! Reconciliation engine
//!
//! Runs the [`Classifier`] across a whole baseline and a whole live snapshot
//! and produces three reports keyed by `{path}\{name}`:
//!
//! - **full**: every baseline entry exactly once
//! - **filtered**: baseline entries that do not pass, found through an O(1)
//!   identity lookup; protected rows appear with `-` in place of values
//! - **redundant**: every live entry, classified against the baseline
//!
//! # Tie-break
//!
//! When several entries on the other side share an identity, candidates are
//! considered in input order. A protected result (`Exist`/`NotExist`) takes
//! precedence, then the first `Pass`, then the first `Fail`. The filtered
//! report's lookup table keeps the last entry per identity instead.
//!
//! # Duplicate identities
//!
//! Reports are maps keyed by the entry's path and name as written, so a
//! second source entry with the same key replaces the first. Keys keep their
//! case: `K\V` and `k\v` match each other during classification but are
//! separate rows. Duplicates are logged, not rejected.

mod report;

pub use report::{ComplianceStatus, ReconcileReport, Report, ReportRow, Summary};

use std::collections::HashMap;

use crate::baseline::duplicate_identities;
use crate::classify::{Classification, Classifier, DriftStatus};
use crate::entry::{Entry, Identity};

/// Reconciles expected (baseline) entries against actual (live) entries.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    classifier: Classifier,
}

impl Reconciler {
    pub fn new(classifier: Classifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Produce all three reports.
    pub fn reconcile(&self, expected: &[Entry], actual: &[Entry]) -> ReconcileReport {
        warn_duplicates("baseline", expected);
        warn_duplicates("snapshot", actual);

        let report = ReconcileReport {
            full: self.full_report(expected, actual),
            filtered: self.filtered_report(expected, actual),
            redundant: self.redundant_report(expected, actual),
        };

        let summary = report.full.summary();
        tracing::info!(
            pass = summary.pass,
            fail = summary.fail,
            missing = summary.missing,
            exist = summary.exist,
            not_exist = summary.not_exist,
            redundant = report.redundant.attention().count(),
            "reconciliation complete"
        );
        report
    }

    /// Classify every expected entry against the whole actual set.
    pub fn full_report(&self, expected: &[Entry], actual: &[Entry]) -> Report {
        let index = candidate_index(actual);
        let mut report = Report::new();
        for entry in expected {
            let candidates = index.get(&entry.identity()).map(Vec::as_slice).unwrap_or(&[]);
            let (counterpart, classification) =
                self.best_match(entry, candidates.iter().map(|&i| &actual[i]), Classifier::classify);
            report.insert(ReportRow::new(entry, counterpart, classification));
        }
        report
    }

    /// Classify expected entries through a last-wins identity lookup and
    /// drop the rows that pass.
    pub fn filtered_report(&self, expected: &[Entry], actual: &[Entry]) -> Report {
        let lookup: HashMap<Identity, &Entry> = actual.iter().map(|e| (e.identity(), e)).collect();

        let mut report = Report::new();
        for entry in expected {
            let counterpart = lookup.get(&entry.identity()).copied();
            let classification = self.classifier.classify(entry, counterpart);
            if classification.status.is_reported() {
                report.insert(ReportRow::new(entry, counterpart, classification));
            }
        }
        report
    }

    /// Classify every actual entry against the baseline.
    ///
    /// Live entries the baseline does not describe come out as `Missing`
    /// (or `NotExist` for protected names).
    pub fn redundant_report(&self, expected: &[Entry], actual: &[Entry]) -> Report {
        let index = candidate_index(expected);
        let mut report = Report::new();
        for entry in actual {
            let candidates = index.get(&entry.identity()).map(Vec::as_slice).unwrap_or(&[]);
            let (counterpart, classification) = self.best_match(
                entry,
                candidates.iter().map(|&i| &expected[i]),
                Classifier::classify_reverse,
            );
            report.insert(ReportRow::new(entry, counterpart, classification));
        }
        report
    }

    /// Pick the deciding candidate for `subject`: first protected result,
    /// else first `Pass`, else first `Fail`, else absent.
    fn best_match<'a>(
        &self,
        subject: &Entry,
        candidates: impl Iterator<Item = &'a Entry>,
        classify: fn(&Classifier, &Entry, Option<&Entry>) -> Classification,
    ) -> (Option<&'a Entry>, Classification) {
        let mut first_pass = None;
        let mut first_fail = None;

        for candidate in candidates {
            let classification = classify(&self.classifier, subject, Some(candidate));
            match classification.status {
                DriftStatus::Exist | DriftStatus::NotExist => {
                    return (Some(candidate), classification);
                }
                DriftStatus::Pass if first_pass.is_none() => {
                    first_pass = Some((Some(candidate), classification));
                }
                DriftStatus::Fail if first_fail.is_none() => {
                    first_fail = Some((Some(candidate), classification));
                }
                _ => {}
            }
        }

        first_pass
            .or(first_fail)
            .unwrap_or_else(|| (None, classify(&self.classifier, subject, None)))
    }
}

/// Positions of each identity in input order.
fn candidate_index(entries: &[Entry]) -> HashMap<Identity, Vec<usize>> {
    let mut index: HashMap<Identity, Vec<usize>> = HashMap::new();
    for (i, entry) in entries.iter().enumerate() {
        index.entry(entry.identity()).or_default().push(i);
    }
    index
}

fn warn_duplicates(side: &str, entries: &[Entry]) {
    for identity in duplicate_identities(entries) {
        tracing::warn!(
            side,
            identity = %identity,
            "duplicate identity; a later entry with the same spelling replaces the earlier row"
        );
    }
}
