//! Config file loading
//!
//! An optional TOML file supplies defaults for a run; command-line flags are
//! layered on top by the caller.
//!
//! ```toml
//! emulate = false
//! fast = false
//! short_read = "assume-equal"
//!
//! [retry]
//! attempts = 3
//! delay_ms = 100
//! ```

use std::path::Path;

use mirror_fs::{RetrySettings, ShortReadPolicy};
use serde::Deserialize;

use crate::sync::SyncOptions;
use crate::{Error, Result};

/// Run settings as written in a config file. Missing keys take defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    pub emulate: bool,
    pub fast: bool,
    pub short_read: ShortReadPolicy,
    pub retry: RetrySettings,
}

impl SyncConfig {
    /// Load a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid config.
    pub fn load(path: &Path) -> Result<Self> {
        let content = mirror_fs::io::read_text(path)?;
        tracing::debug!(path = %path.display(), "Loading config");
        Self::parse(&content).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })
    }

    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_options(&self) -> SyncOptions {
        SyncOptions {
            emulate: self.emulate,
            fast: self.fast,
            retry: self.retry.into(),
            short_read: self.short_read,
        }
    }
}
