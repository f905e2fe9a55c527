//! [`TestContentRoot`] builder for folder and index test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary repository root with an empty `files/` upload directory.
///
/// # Example
///
/// ```rust,no_run
/// use repo_test_utils::content::TestContentRoot;
///
/// let root = TestContentRoot::new();
/// root.write("files/x/a.txt", "0123456789");
/// root.assert_file_exists("files/x/a.txt");
/// ```
pub struct TestContentRoot {
    temp_dir: TempDir,
}

impl Default for TestContentRoot {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContentRoot {
    /// Create a temp root containing an empty `files/` directory.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("files")).unwrap();
        Self { temp_dir }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of a root-relative path.
    pub fn abs(&self, path: &str) -> PathBuf {
        self.root().join(path)
    }

    /// Write `content` to `path`, creating parent directories.
    pub fn write(&self, path: &str, content: &str) {
        let full_path = self.abs(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Could not write {}: {e}", full_path.display()));
    }

    /// Write a file of exactly `len` bytes.
    pub fn write_bytes(&self, path: &str, len: usize) {
        self.write(path, &"x".repeat(len));
    }

    /// Create a directory and its parents.
    pub fn mkdir(&self, path: &str) {
        fs::create_dir_all(self.abs(path)).unwrap();
    }

    /// Number of immediate entries (hidden ones included) in a directory.
    pub fn entry_count(&self, path: &str) -> usize {
        fs::read_dir(self.abs(path)).unwrap().count()
    }

    /// Assert that `path` (relative to the root) is a directory.
    ///
    /// # Panics
    /// Panics with a descriptive message if it is not.
    pub fn assert_dir_exists(&self, path: &str) {
        let full_path = self.abs(path);
        assert!(
            full_path.is_dir(),
            "Expected directory to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the root) is a file.
    ///
    /// # Panics
    /// Panics with a descriptive message if it is not.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.abs(path);
        assert!(
            full_path.is_file(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the root) does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_not_exists(&self, path: &str) {
        let full_path = self.abs(path);
        assert!(
            !full_path.exists(),
            "Expected path NOT to exist: {}",
            full_path.display()
        );
    }
}
