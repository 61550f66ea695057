//! [`TestWorkspace`] builder for on-disk scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary directory holding a manifest, a template and the notes
/// created from them.
///
/// # Example
///
/// ```rust,no_run
/// use elicit_test_utils::TestWorkspace;
///
/// let ws = TestWorkspace::new();
/// let manifest = ws.write_manifest("[[element]]\nkey = \"path\"\nprompt = false\nvalue = \"Notes\"\n");
/// ws.assert_file_exists("elicit.toml");
/// # let _ = manifest;
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

    /// Write `elicit.toml` and return its path.
    pub fn write_manifest(&self, content: &str) -> PathBuf {
        self.write("elicit.toml", content)
    }

    /// Write a file relative to the root, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.root().join(relative))
            .unwrap_or_else(|e| panic!("failed to read {}: {}", relative, e))
    }

    pub fn assert_file_exists(&self, relative: &str) {
        assert!(
            self.root().join(relative).exists(),
            "expected {} to exist",
            relative
        );
    }

    pub fn assert_file_missing(&self, relative: &str) {
        assert!(
            !self.root().join(relative).exists(),
            "expected {} to be absent",
            relative
        );
    }
}
