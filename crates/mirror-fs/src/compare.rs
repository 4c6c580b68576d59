//! Byte-level file comparison
//!
//! Decides whether a destination file already holds the source's content.
//! Cheap signals are checked first; contents are only streamed when the
//! timestamps and sizes cannot tell the files apart.

use std::fs::File;
use std::io::{self, Read};

use serde::Deserialize;

use crate::{Error, FileEntry, Result};

/// Size of each comparison chunk (1 MiB).
pub const CHUNK_SIZE: usize = 1024 * 1024;

/// What to conclude when one stream ends before the other.
///
/// Sizes are checked before streaming, so a stream ending early means a file
/// changed between listing and reading. Historically such a comparison has
/// reported the files equal; that remains the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShortReadPolicy {
    /// Report the files equal once either stream is exhausted.
    #[default]
    AssumeEqual,
    /// Report the files different unless both streams end together.
    Different,
}

/// Compares files with a pair of reusable chunk buffers.
///
/// Each comparator owns its buffers, so comparisons on one instance are
/// serialized by `&mut self`.
#[derive(Debug)]
pub struct FileComparator {
    source_buf: Box<[u8]>,
    target_buf: Box<[u8]>,
    fast: bool,
    short_read: ShortReadPolicy,
}

impl Default for FileComparator {
    fn default() -> Self {
        Self::new()
    }
}

impl FileComparator {
    pub fn new() -> Self {
        Self::with_chunk_size(CHUNK_SIZE)
    }

    /// Build a comparator streaming `chunk_size` bytes at a time.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            source_buf: vec![0; chunk_size].into_boxed_slice(),
            target_buf: vec![0; chunk_size].into_boxed_slice(),
            fast: false,
            short_read: ShortReadPolicy::default(),
        }
    }

    /// Skip content streaming: files with equal sizes are reported equal.
    pub fn fast(mut self, fast: bool) -> Self {
        self.fast = fast;
        self
    }

    pub fn short_read(mut self, policy: ShortReadPolicy) -> Self {
        self.short_read = policy;
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.source_buf.len()
    }

    /// Decide whether `target` already matches `source`.
    ///
    /// In order: a strictly newer source is a change, a size difference is a
    /// change, then contents are compared chunk by chunk.
    pub fn are_equal(&mut self, source: &FileEntry, target: &FileEntry) -> Result<bool> {
        if source.modified() > target.modified() {
            tracing::debug!(path = %source.path().display(), "Source is newer than target");
            return Ok(false);
        }

        if source.len() != target.len() {
            tracing::debug!(
                path = %source.path().display(),
                source_len = source.len(),
                target_len = target.len(),
                "Sizes differ"
            );
            return Ok(false);
        }

        if self.fast {
            return Ok(true);
        }

        let mut source_file = File::open(source.path()).map_err(|e| Error::io(source.path(), e))?;
        let mut target_file = File::open(target.path()).map_err(|e| Error::io(target.path(), e))?;

        loop {
            let source_read =
                read_chunk(&mut source_file, &mut self.source_buf).map_err(|e| Error::io(source.path(), e))?;
            if source_read == 0 {
                return match self.short_read {
                    ShortReadPolicy::AssumeEqual => Ok(true),
                    ShortReadPolicy::Different => {
                        let target_read = read_chunk(&mut target_file, &mut self.target_buf)
                            .map_err(|e| Error::io(target.path(), e))?;
                        Ok(target_read == 0)
                    }
                };
            }

            let target_read =
                read_chunk(&mut target_file, &mut self.target_buf).map_err(|e| Error::io(target.path(), e))?;
            if target_read == 0 {
                tracing::debug!(
                    path = %target.path().display(),
                    policy = ?self.short_read,
                    "Target ended before source"
                );
                return Ok(self.short_read == ShortReadPolicy::AssumeEqual);
            }

            if source_read != target_read
                || self.source_buf[..source_read] != self.target_buf[..target_read]
            {
                return Ok(false);
            }
        }
    }
}

/// Fill `buf` from `reader`, stopping early only at end of stream.
fn read_chunk(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
