//! [`TestSource`]: a throwaway file for load/commit tests.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use patch_fs::checksum;

/// A file inside its own temporary directory.
///
/// # Example
///
/// ```rust
/// use patch_test_utils::source::TestSource;
///
/// let source = TestSource::new("page.tsx", "<div>\n</div>\n");
/// let before = source.checksum();
/// source.assert_checksum(&before);
/// ```
pub struct TestSource {
    temp_dir: TempDir,
    path: PathBuf,
}

impl TestSource {
    /// Create `name` with `content`.
    pub fn new(name: &str, content: &str) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        Self { temp_dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the file; handy as a working directory.
    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn read(&self) -> String {
        fs::read_to_string(&self.path).unwrap()
    }

    pub fn write(&self, content: &str) {
        fs::write(&self.path, content).unwrap();
    }

    /// Write an extra file next to the source, e.g. a recipe.
    pub fn sibling(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    /// Current `sha256:<hex>` checksum of the file.
    pub fn checksum(&self) -> String {
        checksum::checksum_file(&self.path).unwrap()
    }

    /// Panic unless the file still has checksum `expected`.
    pub fn assert_checksum(&self, expected: &str) {
        assert_eq!(
            self.checksum(),
            expected,
            "{} was modified",
            self.path.display()
        );
    }
}
