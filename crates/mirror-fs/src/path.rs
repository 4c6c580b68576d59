//! Root resolution and case-insensitive name matching
//!
//! The destination filesystem is assumed to be case-insensitive, so a source
//! entry and a destination entry describe the same item when their names are
//! equal ignoring case.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::{Error, Named, Result};

/// Compare two entry names ignoring case.
///
/// Names that are not valid Unicode fall back to exact byte equality.
pub fn names_match(a: &OsStr, b: &OsStr) -> bool {
    match (a.to_str(), b.to_str()) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b) || a.to_uppercase() == b.to_uppercase(),
        _ => a == b,
    }
}

/// Remove and return the first entry of `pending` whose name matches `name`.
///
/// Used to keep the working set of not-yet-visited destination entries: what
/// remains after every source entry has been looked up is stale.
pub fn take_match<T: Named>(pending: &mut Vec<T>, name: &OsStr) -> Option<T> {
    let index = pending
        .iter()
        .position(|candidate| names_match(candidate.name(), name))?;
    Some(pending.remove(index))
}

/// Resolve `path` to an absolute, symlink-free path.
///
/// Uses `dunce` so Windows results stay in their familiar non-UNC form.
pub fn resolve_root(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    dunce::canonicalize(path).map_err(|e| Error::io(path, e))
}

/// Whether `inner` equals `outer` or lives somewhere underneath it.
///
/// Both paths are expected to be resolved already.
pub fn is_within(inner: &Path, outer: &Path) -> bool {
    inner.starts_with(outer)
}
