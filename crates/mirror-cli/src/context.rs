//! Backup root resolution
//!
//! Works out the source and destination folders for a run and checks that
//! they can be mirrored safely before the engine touches anything.

use std::path::{Path, PathBuf};

use mirror_fs::path::is_within;
use mirror_fs::resolve_root;

use crate::error::{CliError, Result};

/// Resolved roots for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupContext {
    /// Absolute source folder
    pub source: PathBuf,
    /// Absolute destination folder
    pub destination: PathBuf,
    /// Name of the running program, without extension
    pub program: String,
}

impl BackupContext {
    /// Resolve the roots, defaulting the source to the program's own folder.
    pub fn detect(source: Option<&Path>, destination: &Path) -> Result<Self> {
        let exe = std::env::current_exe()?;
        let program = exe
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .ok_or_else(|| CliError::user("Cannot capture the name of this running program."))?;

        let source = match source {
            Some(path) => path.to_path_buf(),
            None => exe
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| CliError::user("Cannot capture the folder of this running program."))?,
        };

        Self::resolve(&source, destination, program)
    }

    /// Validate and canonicalize explicit roots.
    pub fn resolve(source: &Path, destination: &Path, program: impl Into<String>) -> Result<Self> {
        if !destination.is_dir() {
            return Err(CliError::user(format!(
                "Root destination does not exist: '{}'",
                destination.display()
            )));
        }
        if !source.is_dir() {
            return Err(mirror_core::Error::SourceNotFound {
                path: source.to_path_buf(),
            }
            .into());
        }

        let source = resolve_root(source)?;
        let destination = resolve_root(destination)?;

        if is_within(&destination, &source) || is_within(&source, &destination) {
            return Err(CliError::user(format!(
                "Source and destination overlap: '{}' and '{}'",
                source.display(),
                destination.display()
            )));
        }

        Ok(Self {
            source,
            destination,
            program: program.into(),
        })
    }

    /// `<source>/<program>.log`
    pub fn default_log_file(&self) -> PathBuf {
        self.source.join(format!("{}.log", self.program))
    }
}
