//! Configuration resolution with hierarchical merge

use crate::Result;
use crate::classify::{Classifier, DEFAULT_PROTECTED_NAMES};
use regbase_fs::NormalizedPath;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use super::manifest::Manifest;

/// Directory inside a workspace that holds its configuration
pub const CONFIG_DIR: &str = ".regbase";

const DEFAULT_BASELINES_DIR: &str = "golden";
const DEFAULT_BACKUPS_DIR: &str = "golden/backup";
const DEFAULT_AUDIT_LOG: &str = "logs/regbase.log";

/// Effective configuration after merging all layers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedConfig {
    pub baselines_dir: String,
    pub backups_dir: String,
    pub ledger_dir: String,
    pub audit_log: String,
    /// Built-in protected names followed by configured ones
    pub protected_names: Vec<String>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self::from(Manifest::empty())
    }
}

impl From<Manifest> for ResolvedConfig {
    fn from(manifest: Manifest) -> Self {
        let baselines_dir = manifest
            .core
            .baselines_dir
            .unwrap_or_else(|| DEFAULT_BASELINES_DIR.to_string());
        let mut protected_names: Vec<String> =
            DEFAULT_PROTECTED_NAMES.iter().map(|n| n.to_string()).collect();
        for name in manifest.classifier.protected_names {
            if !protected_names.iter().any(|n| n.eq_ignore_ascii_case(&name)) {
                protected_names.push(name);
            }
        }

        Self {
            ledger_dir: manifest
                .core
                .ledger_dir
                .unwrap_or_else(|| baselines_dir.clone()),
            backups_dir: manifest
                .core
                .backups_dir
                .unwrap_or_else(|| DEFAULT_BACKUPS_DIR.to_string()),
            audit_log: manifest
                .core
                .audit_log
                .unwrap_or_else(|| DEFAULT_AUDIT_LOG.to_string()),
            baselines_dir,
            protected_names,
        }
    }
}

impl ResolvedConfig {
    pub fn classifier(&self) -> Classifier {
        Classifier::new(&self.protected_names)
    }
}

/// Resolves configuration by merging, in order:
///
/// 1. Global defaults (`<config_dir>/regbase/config.toml`)
/// 2. Workspace config (`.regbase/config.toml`)
/// 3. Local overrides (`.regbase/config.local.toml`)
///
/// Missing layers are skipped; invalid TOML in any layer is an error.
pub struct ConfigResolver {
    root: NormalizedPath,

    /// Override for the global config directory (used for testing).
    global_config_dir_override: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new(root: NormalizedPath) -> Self {
        Self {
            root,
            global_config_dir_override: None,
        }
    }

    /// Create a resolver with a custom global config directory.
    pub fn with_global_config_dir(root: NormalizedPath, global_config_dir: PathBuf) -> Self {
        Self {
            root,
            global_config_dir_override: Some(global_config_dir),
        }
    }

    fn global_config_dir(&self) -> Option<PathBuf> {
        if let Some(ref override_dir) = self.global_config_dir_override {
            return Some(override_dir.clone());
        }
        dirs::config_dir().map(|d| d.join("regbase"))
    }

    pub fn resolve(&self) -> Result<ResolvedConfig> {
        let mut manifest = Manifest::empty();

        if let Some(global_dir) = self.global_config_dir() {
            let global_config_path = global_dir.join("config.toml");
            if global_config_path.is_file() {
                tracing::debug!(?global_config_path, "Loading global config (layer 1)");
                let content = fs::read_to_string(&global_config_path)?;
                manifest.merge(&Manifest::parse(&content)?);
            }
        }

        let workspace_config_path = self.config_path();
        if workspace_config_path.is_file() {
            tracing::debug!(path = %workspace_config_path, "Loading workspace config (layer 2)");
            let content = fs::read_to_string(workspace_config_path.to_native())?;
            manifest.merge(&Manifest::parse(&content)?);
        }

        let local_config_path = self.local_config_path();
        if local_config_path.is_file() {
            tracing::debug!(path = %local_config_path, "Loading local config (layer 3)");
            let content = fs::read_to_string(local_config_path.to_native())?;
            manifest.merge(&Manifest::parse(&content)?);
        }

        Ok(ResolvedConfig::from(manifest))
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    pub fn config_path(&self) -> NormalizedPath {
        self.root.join(CONFIG_DIR).join("config.toml")
    }

    pub fn local_config_path(&self) -> NormalizedPath {
        self.root.join(CONFIG_DIR).join("config.local.toml")
    }

    pub fn has_config(&self) -> bool {
        self.config_path().is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn isolated(temp: &TempDir) -> ConfigResolver {
        ConfigResolver::with_global_config_dir(
            NormalizedPath::new(temp.path()),
            temp.path().join("global"),
        )
    }

    #[test]
    fn defaults_when_no_config_exists() {
        let temp = TempDir::new().unwrap();
        let resolver = isolated(&temp);
        assert!(!resolver.has_config());

        let config = resolver.resolve().unwrap();
        assert_eq!(config.baselines_dir, "golden");
        assert_eq!(config.ledger_dir, "golden");
        assert_eq!(config.backups_dir, "golden/backup");
        assert_eq!(config.protected_names, vec!["Password", "DefaultPassword"]);
    }

    #[test]
    fn ledger_dir_follows_baselines_dir() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join(CONFIG_DIR)).unwrap();
        std::fs::write(
            temp.path().join(CONFIG_DIR).join("config.toml"),
            "[core]\nbaselines_dir = \"baselines\"\n",
        )
        .unwrap();

        let config = isolated(&temp).resolve().unwrap();
        assert_eq!(config.ledger_dir, "baselines");
    }

    #[test]
    fn layers_merge_in_order() {
        let temp = TempDir::new().unwrap();
        let global = temp.path().join("global");
        std::fs::create_dir_all(&global).unwrap();
        std::fs::write(
            global.join("config.toml"),
            "[core]\naudit_log = \"global.log\"\n[classifier]\nprotected_names = [\"GlobalSecret\"]\n",
        )
        .unwrap();

        let config_dir = temp.path().join(CONFIG_DIR);
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(config_dir.join("config.toml"), "[core]\naudit_log = \"workspace.log\"\n").unwrap();
        std::fs::write(
            config_dir.join("config.local.toml"),
            "[classifier]\nprotected_names = [\"LocalSecret\"]\n",
        )
        .unwrap();

        let config = isolated(&temp).resolve().unwrap();
        assert_eq!(config.audit_log, "workspace.log");
        assert!(config.protected_names.contains(&"GlobalSecret".to_string()));
        assert!(config.protected_names.contains(&"LocalSecret".to_string()));
        assert!(config.classifier().is_protected("localsecret"));
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let temp = TempDir::new().unwrap();
        let config_dir = temp.path().join(CONFIG_DIR);
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(config_dir.join("config.toml"), "[core\n").unwrap();

        assert!(isolated(&temp).resolve().is_err());
    }
}
