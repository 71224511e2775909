//! Report types produced by the reconciliation engine

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::classify::{Classification, DriftStatus};
use crate::entry::{Entry, PLACEHOLDER};

/// Overall verdict for a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplianceStatus {
    /// Every entry passes (or is a present protected entry)
    Compliant,
    /// Some entries are absent, none differ
    Missing,
    /// At least one entry differs
    Drifted,
}

/// One classified entry.
///
/// `expected_*` describe the entry the row was generated for (the baseline
/// entry in full and filtered reports, the live entry in the redundant
/// report); `actual_*` the matched counterpart, if any. Protected rows
/// carry `"-"` in place of types and data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub path: String,
    pub name: String,
    pub expected_type: String,
    pub expected_data: String,
    pub actual_type: Option<String>,
    pub actual_data: Option<String>,
    pub status: DriftStatus,
    /// Why data could not be compared, if it could not
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ReportRow {
    pub(crate) fn new(subject: &Entry, counterpart: Option<&Entry>, classification: Classification) -> Self {
        let masked = classification.status.is_protected();
        let (expected_type, expected_data) = if masked {
            (PLACEHOLDER.to_string(), PLACEHOLDER.to_string())
        } else {
            (subject.value_type.to_string(), subject.data.display())
        };
        let (actual_type, actual_data) = match counterpart {
            Some(_) if masked => (Some(PLACEHOLDER.to_string()), Some(PLACEHOLDER.to_string())),
            Some(other) => (Some(other.value_type.to_string()), Some(other.data.display())),
            None => (None, None),
        };

        Self {
            path: subject.path.clone(),
            name: subject.name.clone(),
            expected_type,
            expected_data,
            actual_type,
            actual_data,
            status: classification.status,
            note: classification.note,
        }
    }

    pub fn key(&self) -> String {
        format!("{}\\{}", self.path, self.name)
    }
}

/// Per-status counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub pass: usize,
    pub fail: usize,
    pub missing: usize,
    pub exist: usize,
    pub not_exist: usize,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.pass + self.fail + self.missing + self.exist + self.not_exist
    }

    fn count(&mut self, status: DriftStatus) {
        match status {
            DriftStatus::Pass => self.pass += 1,
            DriftStatus::Fail => self.fail += 1,
            DriftStatus::Missing => self.missing += 1,
            DriftStatus::Exist => self.exist += 1,
            DriftStatus::NotExist => self.not_exist += 1,
        }
    }
}

/// Classified rows keyed by `{path}\{name}`.
///
/// Inserting a second row under an existing key replaces the first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Report {
    rows: BTreeMap<String, ReportRow>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row, returning the row it replaced.
    pub fn insert(&mut self, row: ReportRow) -> Option<ReportRow> {
        self.rows.insert(row.key(), row)
    }

    pub fn get(&self, key: &str) -> Option<&ReportRow> {
        self.rows.get(key)
    }

    pub fn status_of(&self, key: &str) -> Option<DriftStatus> {
        self.rows.get(key).map(|r| r.status)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ReportRow)> {
        self.rows.iter()
    }

    pub fn rows(&self) -> impl Iterator<Item = &ReportRow> {
        self.rows.values()
    }

    /// Rows an operator needs to act on (`Fail`, `Missing`, `NotExist`).
    ///
    /// Present protected rows (`Exist`) are not included here, although the
    /// filtered report lists them.
    pub fn attention(&self) -> impl Iterator<Item = &ReportRow> {
        self.rows.values().filter(|r| r.status.needs_attention())
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for row in self.rows.values() {
            summary.count(row.status);
        }
        summary
    }

    /// Worst status present: Drifted > Missing > Compliant
    pub fn overall(&self) -> ComplianceStatus {
        let summary = self.summary();
        if summary.fail > 0 {
            ComplianceStatus::Drifted
        } else if summary.missing > 0 || summary.not_exist > 0 {
            ComplianceStatus::Missing
        } else {
            ComplianceStatus::Compliant
        }
    }
}

/// The three views produced by one reconciliation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileReport {
    /// Every baseline entry, classified against the live set
    pub full: Report,
    /// Baseline entries needing attention
    pub filtered: Report,
    /// Every live entry, classified against the baseline
    pub redundant: Report,
}
