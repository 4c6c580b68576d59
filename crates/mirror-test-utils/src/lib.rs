//! Shared test utilities for the easy-backup workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only — never published.
//!
//! # Modules
//!
//! - [`tree`] — [`TestTree`] builder for source/destination directory pairs

pub mod tree;

pub use tree::{Snapshot, TestTree};
