//! Drift classification for a single expected/actual pair

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entry::Entry;

/// Names whose values are never compared or shown by default.
pub const DEFAULT_PROTECTED_NAMES: &[&str] = &["Password", "DefaultPassword"];

/// Drift status of one entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DriftStatus {
    /// Identity matches and type and data are equal (or type is "N/A")
    Pass,
    /// Identity matches but type or data differ
    Fail,
    /// Identity absent from the other side
    Missing,
    /// Identity absent, and the name is protected
    NotExist,
    /// Identity present, and the name is protected; value not compared
    Exist,
}

impl DriftStatus {
    /// True for statuses an operator must look at
    pub fn needs_attention(self) -> bool {
        matches!(self, Self::Fail | Self::Missing | Self::NotExist)
    }

    /// True for every status the filtered report keeps: anything but
    /// `Pass`. Protected rows are kept with their values masked.
    pub fn is_reported(self) -> bool {
        !matches!(self, Self::Pass)
    }

    pub fn is_protected(self) -> bool {
        matches!(self, Self::Exist | Self::NotExist)
    }
}

impl fmt::Display for DriftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pass => "Pass",
            Self::Fail => "Fail",
            Self::Missing => "Missing",
            Self::NotExist => "NotExist",
            Self::Exist => "Exist",
        };
        f.write_str(label)
    }
}

/// Result of classifying one pair, with a note when data could not be
/// compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub status: DriftStatus,
    pub note: Option<String>,
}

impl From<DriftStatus> for Classification {
    fn from(status: DriftStatus) -> Self {
        Self { status, note: None }
    }
}

/// Pure classifier configured with the protected-name set.
#[derive(Debug, Clone)]
pub struct Classifier {
    protected: HashSet<String>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(DEFAULT_PROTECTED_NAMES.iter().copied())
    }
}

impl Classifier {
    pub fn new<I, S>(protected_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            protected: protected_names
                .into_iter()
                .map(|n| n.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn is_protected(&self, name: &str) -> bool {
        self.protected.contains(&name.to_lowercase())
    }

    /// Classify an expected entry against an actual entry or its absence.
    ///
    /// Rules apply in order:
    /// 1. identity mismatch or absent: `NotExist` for protected names,
    ///    otherwise `Missing`
    /// 2. either type is "N/A": `Pass`
    /// 3. either name is protected: `Exist`
    /// 4. type and canonical data equal: `Pass`, else `Fail`
    pub fn classify(&self, expected: &Entry, actual: Option<&Entry>) -> Classification {
        let actual = match actual {
            Some(actual) if actual.identity() == expected.identity() => actual,
            _ => {
                return if self.is_protected(&expected.name) {
                    DriftStatus::NotExist.into()
                } else {
                    DriftStatus::Missing.into()
                };
            }
        };

        if expected.value_type.is_not_applicable() || actual.value_type.is_not_applicable() {
            return DriftStatus::Pass.into();
        }

        if self.is_protected(&expected.name) || self.is_protected(&actual.name) {
            return DriftStatus::Exist.into();
        }

        if expected.value_type != actual.value_type {
            return DriftStatus::Fail.into();
        }

        match (expected.canonical_data(), actual.canonical_data()) {
            (Ok(a), Ok(b)) if a == b => DriftStatus::Pass.into(),
            (Ok(_), Ok(_)) => DriftStatus::Fail.into(),
            (Err(e), _) | (_, Err(e)) => Classification {
                status: DriftStatus::Fail,
                note: Some(e.to_string()),
            },
        }
    }

    /// Classify a live entry against the baseline.
    ///
    /// Same rules as [`classify`](Self::classify) with the roles swapped:
    /// a live entry the baseline does not know about is `Missing` (or
    /// `NotExist` for protected names).
    pub fn classify_reverse(&self, actual: &Entry, expected: Option<&Entry>) -> Classification {
        self.classify(actual, expected)
    }
}
