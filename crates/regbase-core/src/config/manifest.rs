//! Manifest parsing for config.toml files
//!
//! A manifest is one configuration layer. Every field is optional so that a
//! later layer only overrides what it actually sets.

use crate::Result;
use serde::{Deserialize, Serialize};

/// `[core]` section: where baselines, ledgers, backups and the audit log live
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreSection {
    /// Directory holding `{id}.json` baselines, relative to the workspace root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baselines_dir: Option<String>,

    /// Root of the per-baseline revision folders
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backups_dir: Option<String>,

    /// Directory holding `{id}_edit.temp` ledgers and `{id}.lock` files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ledger_dir: Option<String>,

    /// Audit log file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_log: Option<String>,
}

/// `[classifier]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierSection {
    /// Additional protected value names; unioned across layers
    #[serde(default)]
    pub protected_names: Vec<String>,
}

/// Configuration parsed from a single config.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub core: CoreSection,

    #[serde(default)]
    pub classifier: ClassifierSection,
}

impl Manifest {
    /// Parse a manifest from TOML content
    ///
    /// # Example
    ///
    /// ```
    /// use regbase_core::config::Manifest;
    ///
    /// let manifest = Manifest::parse(r#"
    /// [core]
    /// baselines_dir = "golden"
    ///
    /// [classifier]
    /// protected_names = ["VendorPassword"]
    /// "#).unwrap();
    ///
    /// assert_eq!(manifest.core.baselines_dir.as_deref(), Some("golden"));
    /// ```
    pub fn parse(content: &str) -> Result<Self> {
        let manifest: Manifest = toml::from_str(content)?;
        Ok(manifest)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge another manifest into this one.
    ///
    /// Scalars set in `other` win; protected names are unioned
    /// (case-insensitively, first spelling kept).
    pub fn merge(&mut self, other: &Manifest) {
        let core = &other.core;
        if core.baselines_dir.is_some() {
            self.core.baselines_dir = core.baselines_dir.clone();
        }
        if core.backups_dir.is_some() {
            self.core.backups_dir = core.backups_dir.clone();
        }
        if core.ledger_dir.is_some() {
            self.core.ledger_dir = core.ledger_dir.clone();
        }
        if core.audit_log.is_some() {
            self.core.audit_log = core.audit_log.clone();
        }

        for name in &other.classifier.protected_names {
            let known = self
                .classifier
                .protected_names
                .iter()
                .any(|n| n.eq_ignore_ascii_case(name));
            if !known {
                self.classifier.protected_names.push(name.clone());
            }
        }
    }
}
