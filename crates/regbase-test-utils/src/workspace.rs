//! [`TestWorkspace`] builder for regbase test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary regbase workspace using the default layout
/// (`golden/`, `golden/backup/`, `.regbase/`).
///
/// # Example
///
/// ```rust,no_run
/// use regbase_test_utils::TestWorkspace;
///
/// let ws = TestWorkspace::new();
/// ws.write_baseline("MicroAOI", r#"[["P","N","1","REG_SZ"]]"#);
/// ws.assert_file_exists("golden/MicroAOI.json");
/// ```
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `relative` inside the workspace.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn write_file(&self, relative: &str, content: &str) -> PathBuf {
        let full_path = self.path(relative);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
        full_path
    }

    /// Write `.regbase/config.toml`.
    pub fn write_config(&self, toml: &str) -> PathBuf {
        self.write_file(".regbase/config.toml", toml)
    }

    /// Write `golden/{id}.json`.
    pub fn write_baseline(&self, id: &str, json: &str) -> PathBuf {
        self.write_file(&format!("golden/{}.json", id), json)
    }

    /// Write `golden/{id}_edit.temp`.
    pub fn write_ledger(&self, id: &str, json: &str) -> PathBuf {
        self.write_file(&format!("golden/{}_edit.temp", id), json)
    }

    /// Write a live-state snapshot file at `relative`.
    pub fn write_snapshot(&self, relative: &str, json: &str) -> PathBuf {
        self.write_file(relative, json)
    }

    /// Place an empty revision file, e.g. to simulate gaps in numbering.
    pub fn touch_revision(&self, id: &str, number: u32, date: &str) -> PathBuf {
        self.write_file(
            &format!("golden/backup/{}/{}_rev{}_{}.json", id, id, number, date),
            "[]",
        )
    }

    /// Read and parse a JSON file.
    ///
    /// # Panics
    /// Panics if the file cannot be read or is not valid JSON.
    pub fn read_json(&self, relative: &str) -> serde_json::Value {
        let full_path = self.path(relative);
        let content = fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()));
        serde_json::from_str(&content)
            .unwrap_or_else(|e| panic!("Invalid JSON in {}: {}", full_path.display(), e))
    }

    /// Sorted file names in `golden/backup/{id}`; empty if the folder is absent.
    pub fn revision_files(&self, id: &str) -> Vec<String> {
        let dir = self.path(&format!("golden/backup/{}", id));
        let Ok(entries) = fs::read_dir(&dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Assert that `path` (relative to the workspace root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.path(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the workspace root) does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.path(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `path` (relative to root) contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let full_path = self.path(path);
        let file_content = fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()));
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            full_path.display(),
            content,
            file_content
        );
    }
}
