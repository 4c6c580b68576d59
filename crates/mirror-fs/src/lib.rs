//! Filesystem primitives for the easy-backup directory mirror
//!
//! Provides directory listing with case-insensitive name matching, byte-level
//! file comparison, timestamp/attribute replication and a fixed-delay retry
//! executor for mutating calls.

pub mod compare;
pub mod entry;
pub mod error;
pub mod io;
pub mod metadata;
pub mod path;
pub mod retry;

pub use compare::{CHUNK_SIZE, FileComparator, ShortReadPolicy};
pub use entry::{DirectoryEntry, FileEntry, Named};
pub use error::{Error, Result};
pub use metadata::{MetadataSync, Timestamps};
pub use path::{names_match, resolve_root, take_match};
pub use retry::{RetryPolicy, RetrySettings};
