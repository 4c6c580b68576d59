//! Error types for mirror-core

use std::path::PathBuf;

/// Result type for mirror-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a synchronization run
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source side of a pair does not exist
    #[error("Source not found: '{}'", path.display())]
    SourceNotFound { path: PathBuf },

    /// The target of an unconditional delete does not exist
    #[error("Target not found: '{}'", path.display())]
    TargetNotFound { path: PathBuf },

    /// Config file could not be parsed
    #[error("Failed to parse config at {}: {message}", path.display())]
    ConfigParse { path: PathBuf, message: String },

    /// Filesystem error from mirror-fs
    #[error(transparent)]
    Fs(#[from] mirror_fs::Error),
}

/// Broad failure classes a caller can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required directory is absent; retrying cannot help.
    Precondition,
    /// A mutation kept failing until the retry budget ran out.
    Transient,
    /// A read (listing, stat, comparison) failed.
    Io,
    /// Configuration was rejected.
    Config,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SourceNotFound { .. } | Self::TargetNotFound { .. } => ErrorKind::Precondition,
            Self::ConfigParse { .. } => ErrorKind::Config,
            Self::Fs(e) if e.is_exhausted_retry() => ErrorKind::Transient,
            Self::Fs(_) => ErrorKind::Io,
        }
    }
}
