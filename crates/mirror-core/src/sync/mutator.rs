//! Filesystem mutators
//!
//! The four primitive mutations (create folder, add/update file, delete file,
//! delete folder) plus metadata replication. Each records its action first
//! and then, unless emulating, performs the write under the retry policy.
//! Emulation short-circuits here rather than at the call sites so that the
//! recorded actions are identical with and without it.

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use mirror_fs::retry::{self, RetryPolicy};
use mirror_fs::MetadataSync;

use crate::action::{Action, ActionSink};
use crate::Result;

/// Whether a mutation should record its action.
///
/// Recursive helpers suppress the record when a parent already reported the
/// aggregate action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Record {
    Yes,
    No,
}

/// Performs (or, when emulating, only reports) filesystem mutations.
#[derive(Debug, Clone, Copy)]
pub struct Mutator {
    emulate: bool,
    retry: RetryPolicy,
    metadata: MetadataSync,
}

impl Mutator {
    pub fn new(emulate: bool, retry: RetryPolicy, started: SystemTime) -> Self {
        Self {
            emulate,
            retry,
            metadata: MetadataSync::new(started, retry),
        }
    }

    /// Create `target` and any missing parents.
    pub fn create_directory(&self, target: &Path, sink: &mut dyn ActionSink, record: Record) -> Result<()> {
        self.report(
            sink,
            record,
            Action::CreateFolder {
                path: target.to_path_buf(),
            },
        );
        if self.emulate {
            return Ok(());
        }

        retry::execute(self.retry, "create folder", target, || fs::create_dir_all(target))?;
        Ok(())
    }

    /// Copy `source` over `target`, overwriting it if present.
    ///
    /// Whether this is an add or an update is decided before copying.
    pub fn add_or_update_file(
        &self,
        source: &Path,
        target: &Path,
        sink: &mut dyn ActionSink,
        record: Record,
    ) -> Result<()> {
        let (source_path, target_path) = (source.to_path_buf(), target.to_path_buf());
        let action = if target.exists() {
            Action::UpdateFile {
                source: source_path,
                target: target_path,
            }
        } else {
            Action::AddFile {
                source: source_path,
                target: target_path,
            }
        };
        self.report(sink, record, action);
        if self.emulate {
            return Ok(());
        }

        retry::execute(self.retry, "copy file", target, || fs::copy(source, target).map(|_| ()))?;
        Ok(())
    }

    pub fn delete_file(&self, target: &Path, sink: &mut dyn ActionSink, record: Record) -> Result<()> {
        self.report(
            sink,
            record,
            Action::DeleteFile {
                path: target.to_path_buf(),
            },
        );
        if self.emulate {
            return Ok(());
        }

        retry::execute(self.retry, "delete file", target, || fs::remove_file(target))?;
        Ok(())
    }

    /// Remove `target`, which must already be empty.
    pub fn delete_folder(&self, target: &Path, sink: &mut dyn ActionSink, record: Record) -> Result<()> {
        self.report(
            sink,
            record,
            Action::DeleteFolder {
                path: target.to_path_buf(),
            },
        );
        if self.emulate {
            return Ok(());
        }

        retry::execute(self.retry, "delete folder", target, || fs::remove_dir(target))?;
        Ok(())
    }

    /// Replicate dates, then attributes, from `source` onto `target`.
    ///
    /// Dates go first so a read-only attribute cannot get in their way.
    pub fn sync_metadata(&self, source: &Path, target: &Path) -> Result<()> {
        if self.emulate {
            return Ok(());
        }

        self.metadata.sync_dates(source, target)?;
        self.metadata.sync_attributes(source, target)?;
        Ok(())
    }

    fn report(&self, sink: &mut dyn ActionSink, record: Record, action: Action) {
        tracing::debug!(emulate = self.emulate, %action, "Mutation");
        if record == Record::Yes {
            sink.record(action);
        }
    }
}
