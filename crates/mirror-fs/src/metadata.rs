//! Timestamp and attribute replication
//!
//! Source timestamps are first coerced into `created <= modified <= accessed`
//! order (with `created` never in the future), then copied onto the target.
//! Nothing is written when the values already agree, so running a sync twice
//! performs no metadata writes the second time.
//!
//! Creation time can only be written on Windows. Elsewhere it is treated as
//! unavailable and only write/access times take part.

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use filetime::FileTime;

use crate::retry::{self, RetryPolicy};
use crate::{Error, Result};

const CAN_SET_CREATED: bool = cfg!(windows);

/// The creation/last-write/last-access triple of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamps {
    pub created: Option<FileTime>,
    pub modified: FileTime,
    pub accessed: FileTime,
}

impl Timestamps {
    /// Read the timestamps of `path`, following links.
    pub fn read(path: &Path) -> Result<Self> {
        let metadata = fs::metadata(path).map_err(|e| Error::io(path, e))?;
        Ok(Self::from_metadata(&metadata))
    }

    pub fn from_metadata(metadata: &fs::Metadata) -> Self {
        let created = if CAN_SET_CREATED {
            FileTime::from_creation_time(metadata)
        } else {
            None
        };
        Self {
            created,
            modified: FileTime::from_last_modification_time(metadata),
            accessed: FileTime::from_last_access_time(metadata),
        }
    }

    /// Force the triple into a coherent order.
    ///
    /// `created` is clamped to `now`, `modified` raised to at least
    /// `created`, and `accessed` raised to at least `modified`.
    pub fn coerced(self, now: FileTime) -> Self {
        let created = self.created.map(|created| created.min(now));
        let modified = match created {
            Some(created) if self.modified < created => created,
            _ => self.modified,
        };
        let accessed = self.accessed.max(modified);
        Self {
            created,
            modified,
            accessed,
        }
    }

    fn apply(&self, path: &Path) -> std::io::Result<()> {
        filetime::set_file_times(path, self.accessed, self.modified)?;
        if let Some(created) = self.created {
            set_created(path, created)?;
        }
        Ok(())
    }
}

#[cfg(windows)]
fn set_created(path: &Path, created: FileTime) -> std::io::Result<()> {
    use std::os::windows::fs::{FileTimesExt, OpenOptionsExt};
    use std::time::Duration;

    const FILE_WRITE_ATTRIBUTES: u32 = 0x0100;
    const FILE_FLAG_BACKUP_SEMANTICS: u32 = 0x0200_0000;

    let seconds = created.unix_seconds();
    let nanos = Duration::from_nanos(u64::from(created.nanoseconds()));
    let time = if seconds >= 0 {
        SystemTime::UNIX_EPOCH + Duration::from_secs(seconds as u64) + nanos
    } else {
        SystemTime::UNIX_EPOCH - Duration::from_secs(seconds.unsigned_abs()) + nanos
    };

    let file = fs::OpenOptions::new()
        .access_mode(FILE_WRITE_ATTRIBUTES)
        .custom_flags(FILE_FLAG_BACKUP_SEMANTICS)
        .open(path)?;
    file.set_times(fs::FileTimes::new().set_created(time))
}

#[cfg(not(windows))]
fn set_created(_path: &Path, _created: FileTime) -> std::io::Result<()> {
    Ok(())
}

/// Replicates timestamps and attributes from a source entry onto a target.
#[derive(Debug, Clone, Copy)]
pub struct MetadataSync {
    now: FileTime,
    retry: RetryPolicy,
}

impl MetadataSync {
    /// `started` is the run's start time, used as the ceiling for creation
    /// times.
    pub fn new(started: SystemTime, retry: RetryPolicy) -> Self {
        Self {
            now: FileTime::from_system_time(started),
            retry,
        }
    }

    /// Coerce the source's timestamps, then copy them onto `target`.
    ///
    /// The source is rewritten only when coercion changed a value, and the
    /// target only when it differs from the (coerced) source. Returns the
    /// timestamps the target now carries.
    pub fn sync_dates(&self, source: &Path, target: &Path) -> Result<Timestamps> {
        let original = Timestamps::read(source)?;
        let coerced = original.coerced(self.now);
        if coerced != original {
            tracing::debug!(path = %source.display(), ?original, ?coerced, "Coercing source timestamps");
            retry::execute(self.retry, "fix source dates", source, || coerced.apply(source))?;
        }

        let current = Timestamps::read(target)?;
        if current != coerced {
            retry::execute(self.retry, "copy dates", target, || coerced.apply(target))?;
        }

        Ok(coerced)
    }

    /// Copy the source's attributes onto `target` when they differ.
    ///
    /// On unix a directory always keeps its owner-write bit, otherwise later
    /// runs could not add or remove its children.
    ///
    /// Returns whether a write happened.
    pub fn sync_attributes(&self, source: &Path, target: &Path) -> Result<bool> {
        let wanted = target_permissions(&fs::metadata(source).map_err(|e| Error::io(source, e))?);
        let current = fs::metadata(target)
            .map_err(|e| Error::io(target, e))?
            .permissions();
        if wanted == current {
            return Ok(false);
        }

        retry::execute(self.retry, "copy attributes", target, || {
            fs::set_permissions(target, wanted.clone())
        })?;
        Ok(true)
    }
}

/// Permissions a copy of an entry with `source` metadata should carry.
fn target_permissions(source: &fs::Metadata) -> fs::Permissions {
    #[allow(unused_mut)]
    let mut permissions = source.permissions();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        if source.is_dir() {
            permissions.set_mode(permissions.mode() | 0o200);
        }
    }
    permissions
}
