//! Error types for regbase-core

use std::path::PathBuf;

use regbase_fs::NormalizedPath;

/// Result type for regbase-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in regbase-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The baseline a reconciliation or session needs does not exist
    #[error("Baseline '{id}' not found at {path}")]
    BaselineNotFound { id: String, path: PathBuf },

    /// A baseline, ledger, snapshot or revision file has the wrong shape
    #[error("Malformed data in {path}: {message}")]
    MalformedData { path: PathBuf, message: String },

    /// The pre-commit backup could not be written; the baseline was not touched
    #[error("Backup of baseline '{id}' failed, commit aborted: {reason}")]
    BackupFailed { id: String, reason: String },

    /// Another editing session holds the baseline's lock file
    #[error("Baseline '{id}' is being edited by another session (lock: {lock})")]
    SessionLocked { id: String, lock: PathBuf },

    /// A commit wrote its applied subset but some actions could not be replayed
    #[error("Commit of '{id}' applied {applied} action(s); {} failed", failed.len())]
    PartialApply {
        id: String,
        applied: usize,
        failed: Vec<String>,
    },

    /// Failure reported by a registry store collaborator
    #[error("Registry store error: {message}")]
    Store { message: String },

    /// Filesystem error from regbase-fs
    #[error(transparent)]
    Fs(#[from] regbase_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}

impl Error {
    pub(crate) fn malformed(path: &NormalizedPath, source: regbase_fs::Error) -> Self {
        match source {
            regbase_fs::Error::ConfigParse { message, .. } => Self::MalformedData {
                path: path.to_native(),
                message,
            },
            other => Self::Fs(other),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }
}
