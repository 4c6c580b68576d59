//! Command implementations

mod backup;

pub use backup::run_backup;
