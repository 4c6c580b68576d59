//! Directory and file entries fetched fresh from the filesystem
//!
//! Entries are snapshots: they are read when a directory is listed and are
//! not refreshed afterwards. Links are followed, so a link to a file is a
//! file and a link to a directory is a directory.

use std::ffi::{OsStr, OsString};
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};

use filetime::FileTime;

use crate::{Error, Result};

/// Anything that can be matched by name against a sibling on the other side.
pub trait Named {
    fn name(&self) -> &OsStr;
}

/// A regular file as seen when its parent directory was listed.
#[derive(Debug, Clone)]
pub struct FileEntry {
    path: PathBuf,
    name: OsString,
    metadata: Metadata,
}

impl FileEntry {
    /// Stat `path` and build an entry for it.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let metadata = fs::metadata(&path).map_err(|e| Error::io(&path, e))?;
        let name = path.file_name().map(OsStr::to_os_string).unwrap_or_default();
        Ok(Self {
            path,
            name,
            metadata,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size in bytes.
    pub fn len(&self) -> u64 {
        self.metadata.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Last-write time.
    pub fn modified(&self) -> FileTime {
        FileTime::from_last_modification_time(&self.metadata)
    }
}

impl Named for FileEntry {
    fn name(&self) -> &OsStr {
        &self.name
    }
}

/// A directory path whose children are listed on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    path: PathBuf,
    name: OsString,
}

impl DirectoryEntry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.file_name().map(OsStr::to_os_string).unwrap_or_default();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the path currently exists as a directory.
    pub fn exists(&self) -> bool {
        self.path.is_dir()
    }

    /// Path of a direct child called `name`.
    pub fn child(&self, name: &OsStr) -> PathBuf {
        self.path.join(name)
    }

    /// Files directly under this directory, sorted by name.
    pub fn files(&self) -> Result<Vec<FileEntry>> {
        let mut files = Vec::new();
        for (path, name, metadata) in self.list()? {
            if metadata.is_file() {
                files.push(FileEntry {
                    path,
                    name,
                    metadata,
                });
            }
        }
        Ok(files)
    }

    /// Subdirectories directly under this directory, sorted by name.
    pub fn directories(&self) -> Result<Vec<DirectoryEntry>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|(_, _, metadata)| metadata.is_dir())
            .map(|(path, name, _)| DirectoryEntry { path, name })
            .collect())
    }

    fn list(&self) -> Result<Vec<(PathBuf, OsString, Metadata)>> {
        let reader = fs::read_dir(&self.path).map_err(|e| Error::io(&self.path, e))?;

        let mut children = Vec::new();
        for item in reader {
            let item = item.map_err(|e| Error::io(&self.path, e))?;
            let path = item.path();
            match fs::metadata(&path) {
                Ok(metadata) => children.push((path, item.file_name(), metadata)),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable entry");
                }
            }
        }

        children.sort_by(|a, b| a.1.cmp(&b.1));
        Ok(children)
    }
}

impl Named for DirectoryEntry {
    fn name(&self) -> &OsStr {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn listing_separates_files_and_directories() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let entry = DirectoryEntry::new(dir.path());
        let files: Vec<_> = entry.files().unwrap().iter().map(|f| f.name().to_os_string()).collect();
        let dirs: Vec<_> = entry
            .directories()
            .unwrap()
            .iter()
            .map(|d| d.name().to_os_string())
            .collect();

        assert_eq!(files, vec![OsString::from("a.txt"), OsString::from("b.txt")]);
        assert_eq!(dirs, vec![OsString::from("sub")]);
    }

    #[test]
    fn missing_directory_does_not_exist() {
        let dir = tempdir().unwrap();
        let entry = DirectoryEntry::new(dir.path().join("missing"));
        assert!(!entry.exists());
        assert!(entry.files().is_err());
    }

    #[test]
    fn file_entry_reports_size() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.bin");
        fs::write(&path, [0u8; 42]).unwrap();

        let entry = FileEntry::from_path(&path).unwrap();
        assert_eq!(entry.len(), 42);
        assert_eq!(entry.name(), OsStr::new("data.bin"));
    }
}
