//! Recursive one-way reconciliation engine
//!
//! Makes a destination directory tree mirror a source tree: missing entries
//! are copied, changed files overwritten and entries absent from the source
//! deleted. Every decision is reported as an [`Action`] to a caller-owned
//! [`ActionSink`].

pub mod action;
pub mod config;
pub mod error;
pub mod mode;
pub mod sync;

pub use action::{Action, ActionLog, ActionSink, Summary};
pub use config::SyncConfig;
pub use error::{Error, ErrorKind, Result};
pub use mode::SyncMode;
pub use sync::{Mutator, Record, SyncEngine, SyncOptions};

// Re-exported so callers can configure the engine without depending on
// mirror-fs directly.
pub use mirror_fs::{RetryPolicy, ShortReadPolicy};
