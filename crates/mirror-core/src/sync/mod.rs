//! Directory reconciliation
//!
//! This module provides:
//! - **engine**: the recursive [`SyncEngine`] and its [`SyncOptions`]
//! - **mutator**: retried, emulation-aware filesystem mutations

mod engine;
mod mutator;

pub use engine::{SyncEngine, SyncOptions};
pub use mutator::{Mutator, Record};
