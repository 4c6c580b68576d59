//! [`TestTree`] builder for mirror scenarios.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use filetime::{FileTime, set_file_mtime, set_file_times};
use tempfile::TempDir;

/// A temporary directory holding a `source/` and a `target/` tree.
///
/// # Example
///
/// ```rust,no_run
/// use mirror_test_utils::TestTree;
///
/// let tree = TestTree::new();
/// tree.source_file("docs/a.txt", "hello");
/// tree.target_file("stale.txt", "old");
/// tree.assert_target_file("stale.txt", "old");
/// ```
pub struct TestTree {
    temp_dir: TempDir,
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Relative path -> file content (`None` for directories).
pub type Snapshot = BTreeMap<String, Option<Vec<u8>>>;

impl TestTree {
    /// Create both roots, empty.
    pub fn new() -> Self {
        let tree = Self::without_target();
        fs::create_dir_all(tree.target()).unwrap();
        tree
    }

    /// Create only the source root; the target root does not exist.
    pub fn without_target() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("source")).unwrap();
        Self { temp_dir }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn source(&self) -> PathBuf {
        self.root().join("source")
    }

    pub fn target(&self) -> PathBuf {
        self.root().join("target")
    }

    /// Write a file under the source root, creating parents.
    pub fn source_file(&self, rel: &str, content: impl AsRef<[u8]>) -> PathBuf {
        write_file(&self.source().join(rel), content.as_ref())
    }

    /// Write a file under the target root, creating parents.
    pub fn target_file(&self, rel: &str, content: impl AsRef<[u8]>) -> PathBuf {
        write_file(&self.target().join(rel), content.as_ref())
    }

    pub fn source_dir(&self, rel: &str) -> PathBuf {
        let path = self.source().join(rel);
        fs::create_dir_all(&path).unwrap();
        path
    }

    pub fn target_dir(&self, rel: &str) -> PathBuf {
        let path = self.target().join(rel);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Set the last-write time of `path` to `unix_seconds`.
    pub fn set_mtime(path: &Path, unix_seconds: i64) {
        set_file_mtime(path, FileTime::from_unix_time(unix_seconds, 0)).unwrap();
    }

    /// Set both access and write times of `path`.
    pub fn set_times(path: &Path, accessed: i64, modified: i64) {
        set_file_times(
            path,
            FileTime::from_unix_time(accessed, 0),
            FileTime::from_unix_time(modified, 0),
        )
        .unwrap();
    }

    pub fn mtime(path: &Path) -> FileTime {
        FileTime::from_last_modification_time(&fs::metadata(path).unwrap())
    }

    pub fn atime(path: &Path) -> FileTime {
        FileTime::from_last_access_time(&fs::metadata(path).unwrap())
    }

    pub fn source_snapshot(&self) -> Snapshot {
        snapshot(&self.source())
    }

    pub fn target_snapshot(&self) -> Snapshot {
        snapshot(&self.target())
    }

    /// Relative paths and write times of every file under the target root.
    pub fn target_mtimes(&self) -> BTreeMap<String, FileTime> {
        let mut times = BTreeMap::new();
        for (rel, content) in self.target_snapshot() {
            if content.is_some() {
                times.insert(rel.clone(), Self::mtime(&self.target().join(&rel)));
            }
        }
        times
    }

    /// Assert that `rel` exists under the target root with `content`.
    ///
    /// # Panics
    /// Panics with a descriptive message on mismatch.
    pub fn assert_target_file(&self, rel: &str, content: impl AsRef<[u8]>) {
        let path = self.target().join(rel);
        let actual = fs::read(&path)
            .unwrap_or_else(|e| panic!("Expected file to exist: {} ({e})", path.display()));
        assert_eq!(
            actual,
            content.as_ref(),
            "Unexpected content in {}",
            path.display()
        );
    }

    /// Assert that `rel` does **not** exist under the target root.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_target_missing(&self, rel: &str) {
        let path = self.target().join(rel);
        assert!(
            !path.exists(),
            "Expected path NOT to exist: {}",
            path.display()
        );
    }

    /// Assert that the target tree mirrors the source tree exactly.
    pub fn assert_mirrored(&self) {
        assert_eq!(
            self.target_snapshot(),
            self.source_snapshot(),
            "target tree does not mirror source tree"
        );
    }
}

fn write_file(path: &Path, content: &[u8]) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
    path.to_path_buf()
}

/// Walk `root` and record every entry by its `/`-separated relative path.
pub fn snapshot(root: &Path) -> Snapshot {
    let mut entries = Snapshot::new();
    if root.is_dir() {
        walk(root, "", &mut entries);
    }
    entries
}

fn walk(dir: &Path, prefix: &str, entries: &mut Snapshot) {
    for item in fs::read_dir(dir).unwrap() {
        let item = item.unwrap();
        let name = item.file_name().to_string_lossy().into_owned();
        let rel = if prefix.is_empty() {
            name
        } else {
            format!("{prefix}/{name}")
        };
        let path = item.path();
        if path.is_dir() {
            entries.insert(rel.clone(), None);
            walk(&path, &rel, entries);
        } else {
            entries.insert(rel, Some(fs::read(&path).unwrap()));
        }
    }
}
