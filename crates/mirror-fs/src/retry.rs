//! Fixed-delay retry executor for mutating filesystem calls
//!
//! Local filesystem mutations fail transiently when another process holds a
//! handle (scanners, indexers, editors). Every mutation is retried a bounded
//! number of times with a constant pause; there is no jitter and no growth.

use std::io;
use std::path::Path;
use std::time::Duration;

use backoff::backoff::Backoff;
use serde::Deserialize;

use crate::{Error, Result};

/// Bounded attempts with a constant inter-attempt delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    pub const DEFAULT_ATTEMPTS: u32 = 3;
    pub const DEFAULT_DELAY_MS: u64 = 100;
    pub const MIN_DELAY_MS: u64 = 10;

    /// Build a policy, clamping `attempts` to at least 1 and `delay_ms` to at
    /// least [`Self::MIN_DELAY_MS`].
    pub fn new(attempts: u32, delay_ms: u64) -> Self {
        Self {
            attempts: attempts.max(1),
            delay: Duration::from_millis(delay_ms.max(Self::MIN_DELAY_MS)),
        }
    }

    /// Total number of attempts, including the first one.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    fn backoff(&self) -> FixedBackoff {
        FixedBackoff {
            delay: self.delay,
            remaining: self.attempts - 1,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ATTEMPTS, Self::DEFAULT_DELAY_MS)
    }
}

/// Raw `[retry]` table as it appears in a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetrySettings {
    pub attempts: u32,
    pub delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            attempts: RetryPolicy::DEFAULT_ATTEMPTS,
            delay_ms: RetryPolicy::DEFAULT_DELAY_MS,
        }
    }
}

impl From<RetrySettings> for RetryPolicy {
    fn from(settings: RetrySettings) -> Self {
        Self::new(settings.attempts, settings.delay_ms)
    }
}

/// Constant backoff that gives up after a fixed number of retries.
struct FixedBackoff {
    delay: Duration,
    remaining: u32,
}

impl Backoff for FixedBackoff {
    fn next_backoff(&mut self) -> Option<Duration> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.delay)
    }
}

/// Run `op` under `policy`.
///
/// Every I/O failure is treated as transient. When the attempt budget is
/// spent the last failure is returned as [`Error::RetriesExhausted`]; it is
/// never swallowed.
pub fn execute<T, F>(policy: RetryPolicy, operation: &'static str, path: &Path, mut op: F) -> Result<T>
where
    F: FnMut() -> io::Result<T>,
{
    let mut attempts = 0u32;

    let result = backoff::retry_notify(
        policy.backoff(),
        || {
            attempts += 1;
            op().map_err(backoff::Error::transient)
        },
        |err: io::Error, delay: Duration| {
            tracing::warn!(
                operation,
                path = %path.display(),
                error = %err,
                delay_ms = delay.as_millis() as u64,
                "Retrying filesystem operation"
            );
        },
    );

    result.map_err(|err| {
        let source = match err {
            backoff::Error::Permanent(source) => source,
            backoff::Error::Transient { err, .. } => err,
        };
        Error::RetriesExhausted {
            operation,
            path: path.to_path_buf(),
            attempts,
            source,
        }
    })
}
