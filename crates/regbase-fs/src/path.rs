//! Normalized path handling for cross-platform compatibility

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::{Error, Result};

/// A path normalized to use forward slashes internally.
///
/// Backslashes are converted, empty and `.` components are dropped and
/// `..` components are resolved lexically. A leading `//` is kept so UNC
/// shares (`\\server\share`) stay network paths. A `..` that would climb
/// above the start of the path is discarded, so a normalized relative path
/// never escapes the directory it is joined onto.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let raw = path.as_ref().to_string_lossy().replace('\\', "/");
        Self {
            inner: clean(&raw),
        }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment.
    pub fn join(&self, segment: &str) -> Self {
        let segment = segment.replace('\\', "/");
        let joined = if self.inner.is_empty() {
            segment
        } else {
            format!("{}/{}", self.inner, segment)
        };
        Self {
            inner: clean(&joined),
        }
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        match self.inner.rfind('/') {
            Some(0) if self.inner.len() > 1 => Some(Self {
                inner: "/".to_string(),
            }),
            Some(idx) if idx > 0 => Some(Self {
                inner: self.inner[..idx].to_string(),
            }),
            _ => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        self.inner.rsplit('/').next().filter(|n| !n.is_empty())
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 { None } else { Some(&name[idx + 1..]) }
        })
    }

    /// Check if this path exists on the filesystem.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// True for UNC network paths (`//server/share`).
    pub fn is_network_path(&self) -> bool {
        self.inner.starts_with("//")
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }

    /// True when `self` is `base` or lies underneath it.
    pub fn starts_with(&self, base: &NormalizedPath) -> bool {
        if base.inner == "/" {
            return self.inner.starts_with('/');
        }
        self.inner == base.inner
            || self
                .inner
                .strip_prefix(&base.inner)
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

fn clean(raw: &str) -> String {
    let root = if raw.starts_with("//") {
        "//"
    } else if raw.starts_with('/') {
        "/"
    } else {
        ""
    };
    let mut parts: Vec<&str> = Vec::new();
    for component in raw.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    format!("{}{}", root, parts.join("/"))
}

/// Validate a user-supplied name that becomes a single path component.
///
/// Baseline identifiers end up in file names (`{id}.json`,
/// `{id}_rev{N}_{date}.json`, `{id}.lock`), so separators, traversal and
/// control characters are rejected.
pub fn validate_identifier(value: &str, kind: &str) -> Result<()> {
    let reject = |reason: &str| {
        Err(Error::InvalidIdentifier {
            kind: kind.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        })
    };

    if value.trim().is_empty() {
        return reject("must not be empty");
    }
    if value.contains('/') || value.contains('\\') {
        return reject("must not contain path separators");
    }
    if value == "." || value == ".." || value.starts_with('.') {
        return reject("must not start with '.'");
    }
    if value.chars().any(|c| c.is_control() || matches!(c, ':' | '*' | '?' | '"' | '<' | '>' | '|')) {
        return reject("contains characters not allowed in file names");
    }
    Ok(())
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
