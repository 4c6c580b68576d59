//! SyncEngine implementation
//!
//! Depth-first, single-threaded reconciliation of a `(source, target)`
//! directory pair. Within one directory level files are fully reconciled
//! before any subdirectory is visited. Entries are listed fresh on every
//! call and dropped when it returns.

use std::path::Path;
use std::time::SystemTime;

use mirror_fs::{DirectoryEntry, FileComparator, Named, RetryPolicy, ShortReadPolicy, take_match};

use super::mutator::{Mutator, Record};
use crate::action::ActionSink;
use crate::mode::SyncMode;
use crate::{Error, Result};

/// Options for a synchronization run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Record every action but write nothing to the filesystem.
    pub emulate: bool,
    /// Treat same-sized files as equal instead of comparing their bytes.
    pub fast: bool,
    /// Attempt budget and pause for every mutation.
    pub retry: RetryPolicy,
    /// Outcome of a comparison where one file ends early.
    pub short_read: ShortReadPolicy,
}

/// Engine for mirroring a source tree onto a destination tree
///
/// The engine owns its comparison buffers, so one engine runs one
/// comparison at a time. Errors are not caught here: the first fatal error
/// unwinds the whole recursion and is returned to the caller, with the
/// actions recorded so far left in the caller's sink.
#[derive(Debug)]
pub struct SyncEngine {
    options: SyncOptions,
    comparator: FileComparator,
    mutator: Mutator,
}

impl SyncEngine {
    pub fn new(options: SyncOptions) -> Self {
        Self::with_start_time(options, SystemTime::now())
    }

    /// Create an engine whose creation-time ceiling is `started`.
    pub fn with_start_time(options: SyncOptions, started: SystemTime) -> Self {
        let comparator = FileComparator::new()
            .fast(options.fast)
            .short_read(options.short_read);
        Self {
            options,
            comparator,
            mutator: Mutator::new(options.emulate, options.retry, started),
        }
    }

    /// Make `target` mirror `source`.
    ///
    /// Both paths should be absolute. A missing `target` is created.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceNotFound`] if `source` is not a directory, or
    /// the first filesystem error that survived its retries.
    pub fn synchronize(&mut self, source: &Path, target: &Path, sink: &mut dyn ActionSink) -> Result<()> {
        tracing::info!(
            source = %source.display(),
            target = %target.display(),
            emulate = self.options.emulate,
            fast = self.options.fast,
            "Synchronizing"
        );
        self.run(SyncMode::Compute, source, target, sink)
    }

    /// Process one directory pair in the given mode.
    ///
    /// `source` is ignored in [`SyncMode::Delete`].
    pub fn run(&mut self, mode: SyncMode, source: &Path, target: &Path, sink: &mut dyn ActionSink) -> Result<()> {
        match mode {
            SyncMode::Compute => self.reconcile(source, target, sink),
            SyncMode::Add => self.add_tree(source, target, sink),
            SyncMode::Delete => self.delete_tree(target, sink, Record::Yes),
        }
    }

    fn reconcile(&mut self, source: &Path, target: &Path, sink: &mut dyn ActionSink) -> Result<()> {
        let source_dir = DirectoryEntry::new(source);
        let target_dir = DirectoryEntry::new(target);

        if !source_dir.exists() {
            return Err(Error::SourceNotFound {
                path: source.to_path_buf(),
            });
        }
        if !target_dir.exists() {
            return self.add_tree(source, target, sink);
        }

        tracing::debug!(mode = %SyncMode::Compute, source = %source.display(), "Visiting folder");

        let mut pending_files = target_dir.files()?;
        for file in source_dir.files()? {
            match take_match(&mut pending_files, file.name()) {
                None => self.copy_file(file.path(), &target_dir.child(file.name()), sink)?,
                Some(existing) => {
                    if !self.comparator.are_equal(&file, &existing)? {
                        self.copy_file(file.path(), existing.path(), sink)?;
                    }
                }
            }
        }
        for stale in pending_files {
            self.mutator.delete_file(stale.path(), sink, Record::Yes)?;
        }

        let mut pending_dirs = target_dir.directories()?;
        for dir in source_dir.directories()? {
            match take_match(&mut pending_dirs, dir.name()) {
                None => self.add_tree(dir.path(), &target_dir.child(dir.name()), sink)?,
                Some(existing) => self.reconcile(dir.path(), existing.path(), sink)?,
            }
        }
        for stale in pending_dirs {
            self.delete_tree(stale.path(), sink, Record::Yes)?;
        }

        Ok(())
    }

    fn add_tree(&mut self, source: &Path, target: &Path, sink: &mut dyn ActionSink) -> Result<()> {
        let source_dir = DirectoryEntry::new(source);
        if !source_dir.exists() {
            return Err(Error::SourceNotFound {
                path: source.to_path_buf(),
            });
        }

        tracing::debug!(mode = %SyncMode::Add, source = %source.display(), "Visiting folder");

        let created = !target.is_dir();
        if created {
            self.mutator.create_directory(target, sink, Record::Yes)?;
        }

        for file in source_dir.files()? {
            self.copy_file(file.path(), &target.join(file.name()), sink)?;
        }
        for dir in source_dir.directories()? {
            self.add_tree(dir.path(), &target.join(dir.name()), sink)?;
        }

        // Children are in place; their writes no longer move the folder's dates.
        if created {
            self.mutator.sync_metadata(source, target)?;
        }

        Ok(())
    }

    fn delete_tree(&mut self, target: &Path, sink: &mut dyn ActionSink, record: Record) -> Result<()> {
        let target_dir = DirectoryEntry::new(target);
        if !target_dir.exists() {
            return Err(Error::TargetNotFound {
                path: target.to_path_buf(),
            });
        }

        tracing::debug!(mode = %SyncMode::Delete, target = %target.display(), "Visiting folder");

        for file in target_dir.files()? {
            self.mutator.delete_file(file.path(), sink, Record::Yes)?;
        }
        for dir in target_dir.directories()? {
            self.delete_tree(dir.path(), sink, Record::No)?;
        }

        self.mutator.delete_folder(target, sink, record)
    }

    fn copy_file(&self, source: &Path, target: &Path, sink: &mut dyn ActionSink) -> Result<()> {
        self.mutator.add_or_update_file(source, target, sink, Record::Yes)?;
        self.mutator.sync_metadata(source, target)
    }
}
