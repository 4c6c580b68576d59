//! Action records emitted by the filesystem mutators
//!
//! One [`Action`] is recorded per mutating decision, in the order the
//! decisions are made. The caller owns the sink and decides how to present
//! and persist it; an aborted run keeps every action recorded before the
//! failure.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::Result;

/// A single mutating decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    CreateFolder { path: PathBuf },
    AddFile { source: PathBuf, target: PathBuf },
    UpdateFile { source: PathBuf, target: PathBuf },
    DeleteFile { path: PathBuf },
    DeleteFolder { path: PathBuf },
}

impl Action {
    /// The destination path this action changes.
    pub fn target(&self) -> &Path {
        match self {
            Self::CreateFolder { path } | Self::DeleteFile { path } | Self::DeleteFolder { path } => path,
            Self::AddFile { target, .. } | Self::UpdateFile { target, .. } => target,
        }
    }

    /// Human-readable verb phrase, e.g. `"Adding file"`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::CreateFolder { .. } => "Creating folder",
            Self::AddFile { .. } => "Adding file",
            Self::UpdateFile { .. } => "Updating file",
            Self::DeleteFile { .. } => "Deleting file",
            Self::DeleteFolder { .. } => "Deleting folder",
        }
    }

    /// The path shown in the log line. File copies name their source.
    pub fn display_path(&self) -> &Path {
        match self {
            Self::AddFile { source, .. } | Self::UpdateFile { source, .. } => source,
            other => other.target(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label(), self.display_path().display())
    }
}

/// Receiver for actions as they are decided.
pub trait ActionSink {
    fn record(&mut self, action: Action);
}

impl ActionSink for Vec<Action> {
    fn record(&mut self, action: Action) {
        self.push(action);
    }
}

/// Per-kind action counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub folders_created: usize,
    pub files_added: usize,
    pub files_updated: usize,
    pub files_deleted: usize,
    pub folders_deleted: usize,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.folders_created
            + self.files_added
            + self.files_updated
            + self.files_deleted
            + self.folders_deleted
    }
}

/// Ordered, append-only list of actions for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActionLog {
    actions: Vec<Action>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// One display line per action.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.actions.iter().map(ToString::to_string)
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for action in &self.actions {
            match action {
                Action::CreateFolder { .. } => summary.folders_created += 1,
                Action::AddFile { .. } => summary.files_added += 1,
                Action::UpdateFile { .. } => summary.files_updated += 1,
                Action::DeleteFile { .. } => summary.files_deleted += 1,
                Action::DeleteFolder { .. } => summary.folders_deleted += 1,
            }
        }
        summary
    }

    /// Write the log to `path`, one action per line, followed by any
    /// `trailer` lines (e.g. the error that aborted the run).
    pub fn persist(&self, path: &Path, trailer: &[String]) -> Result<()> {
        mirror_fs::io::write_lines(path, self.lines().chain(trailer.iter().cloned()))?;
        Ok(())
    }
}

impl ActionSink for ActionLog {
    fn record(&mut self, action: Action) {
        self.actions.push(action);
    }
}
