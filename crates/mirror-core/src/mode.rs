//! Reconciliation modes
//!
//! A run starts in [`SyncMode::Compute`] at the root and switches to one of
//! the unconditional modes for subtrees that exist on only one side.

use std::fmt;

/// How a `(source, target)` directory pair is processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SyncMode {
    /// Diff both sides and apply the minimal set of changes.
    #[default]
    Compute,
    /// Copy every source descendant; the target is only checked for existence.
    Add,
    /// Remove every target descendant and then the target itself; the source
    /// is never read.
    Delete,
}

impl SyncMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compute => "compute",
            Self::Add => "add",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
