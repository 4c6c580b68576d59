//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::Parser;
use mirror_core::{RetryPolicy, ShortReadPolicy, SyncOptions};

/// Easy Backup - mirror a source folder onto an existing destination folder
///
/// Copies new and changed files from the source to the destination and
/// removes destination entries the source no longer has. The source defaults
/// to the folder this program lives in, so do not place it in a global
/// search path.
///
/// Unless --log-file says otherwise, each real run writes its action log to
/// <source>/<program>.log. That file is part of the source, so the next run
/// copies it to the destination as well.
#[derive(Parser, Debug)]
#[command(name = "easy-backup")]
#[command(author, version, about, long_about)]
pub struct Cli {
    /// Destination folder; it must already exist
    pub destination: PathBuf,

    /// Source folder [default: the folder containing this program]
    #[arg(short, long, env = "EASY_BACKUP_SOURCE")]
    pub source: Option<PathBuf>,

    /// Treat files of equal size as equal without comparing contents
    #[arg(short, long)]
    pub fast: bool,

    /// Report every action without modifying the destination
    #[arg(short, long)]
    pub emulate: bool,

    /// Treat a file that ends early during comparison as changed
    #[arg(long)]
    pub strict_compare: bool,

    /// Attempts per filesystem operation before giving up
    #[arg(long, value_name = "N")]
    pub retries: Option<u32>,

    /// Pause between attempts, in milliseconds
    #[arg(long, value_name = "MS")]
    pub retry_delay_ms: Option<u64>,

    /// TOML file with default settings
    #[arg(short, long, env = "EASY_BACKUP_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Where to write the action log [default: <source>/<program>.log, which is backed up too]
    #[arg(long, env = "EASY_BACKUP_LOG_FILE", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Print a JSON report instead of the action stream
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Layer command-line flags over `base`.
    ///
    /// Switches can only turn a setting on; numeric flags replace the base value.
    pub fn apply(&self, base: SyncOptions) -> SyncOptions {
        let attempts = self.retries.unwrap_or(base.retry.attempts());
        let delay_ms = self
            .retry_delay_ms
            .unwrap_or(base.retry.delay().as_millis() as u64);

        SyncOptions {
            emulate: base.emulate || self.emulate,
            fast: base.fast || self.fast,
            retry: RetryPolicy::new(attempts, delay_ms),
            short_read: if self.strict_compare {
                ShortReadPolicy::Different
            } else {
                base.short_read
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["easy-backup"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn destination_is_required() {
        assert!(Cli::try_parse_from(["easy-backup"]).is_err());
    }

    #[test]
    fn short_flags_parse() {
        let cli = parse(&["D:/backup", "-f", "-e", "-s", "/data"]);
        assert_eq!(cli.destination, PathBuf::from("D:/backup"));
        assert_eq!(cli.source, Some(PathBuf::from("/data")));
        assert!(cli.fast);
        assert!(cli.emulate);
    }

    #[test]
    fn defaults_pass_through() {
        let cli = parse(&["/dst"]);
        assert_eq!(cli.apply(SyncOptions::default()), SyncOptions::default());
    }

    #[test]
    fn flags_override_base_options() {
        let cli = parse(&["/dst", "--fast", "--strict-compare", "--retries", "7"]);
        let base = SyncOptions {
            retry: RetryPolicy::new(2, 400),
            ..SyncOptions::default()
        };

        let options = cli.apply(base);

        assert!(options.fast);
        assert!(!options.emulate);
        assert_eq!(options.short_read, ShortReadPolicy::Different);
        assert_eq!(options.retry.attempts(), 7);
        assert_eq!(options.retry.delay(), Duration::from_millis(400));
    }

    #[test]
    fn absent_switches_keep_base_values() {
        let cli = parse(&["/dst"]);
        let base = SyncOptions {
            emulate: true,
            fast: true,
            ..SyncOptions::default()
        };

        let options = cli.apply(base);

        assert!(options.emulate);
        assert!(options.fast);
    }

    #[test]
    fn retry_flags_are_clamped() {
        let cli = parse(&["/dst", "--retries", "0", "--retry-delay-ms", "1"]);

        let options = cli.apply(SyncOptions::default());

        assert_eq!(options.retry.attempts(), 1);
        assert_eq!(options.retry.delay(), Duration::from_millis(10));
    }
}
