//! The backup run: resolve roots, synchronize, report, persist the log.

use std::path::Path;

use colored::Colorize;
use mirror_core::{Action, ActionLog, Summary, SyncConfig, SyncEngine};
use serde::Serialize;

use crate::cli::Cli;
use crate::console::{self, ConsoleSink};
use crate::context::BackupContext;
use crate::error::Result;

/// Machine-readable outcome printed by `--json`
#[derive(Debug, Serialize)]
struct Report<'a> {
    success: bool,
    emulate: bool,
    source: &'a Path,
    destination: &'a Path,
    summary: Summary,
    actions: &'a [Action],
    error: Option<String>,
}

/// Run one backup as described by the command line.
///
/// The action log is written after the run whether or not it succeeded; a
/// failed run appends its error as the last line. Emulated runs write no log.
pub fn run_backup(cli: &Cli) -> Result<()> {
    let context = BackupContext::detect(cli.source.as_deref(), &cli.destination)?;
    let config = match &cli.config {
        Some(path) => SyncConfig::load(path)?,
        None => SyncConfig::default(),
    };
    let options = cli.apply(config.to_options());

    if !cli.json {
        console::print_banner(&context, &options);
    }

    let mut sink = ConsoleSink::new(!cli.json);
    let outcome = SyncEngine::new(options).synchronize(&context.source, &context.destination, &mut sink);
    let log = sink.into_log();
    let error = outcome.as_ref().err().map(ToString::to_string);

    let persisted = if options.emulate {
        Ok(())
    } else {
        let path = cli
            .log_file
            .clone()
            .unwrap_or_else(|| context.default_log_file());
        persist(&log, &path, error.as_deref())
    };

    if cli.json {
        let report = Report {
            success: error.is_none(),
            emulate: options.emulate,
            source: &context.source,
            destination: &context.destination,
            summary: log.summary(),
            actions: log.actions(),
            error,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if outcome.is_ok() {
        console::print_summary(&log.summary(), options.emulate);
    }

    outcome?;
    persisted
}

fn persist(log: &ActionLog, path: &Path, error: Option<&str>) -> Result<()> {
    let trailer: Vec<String> = error.map(|e| format!("Error: {e}")).into_iter().collect();
    tracing::debug!(path = %path.display(), actions = log.len(), "Writing action log");

    match log.persist(path, &trailer) {
        Ok(()) => Ok(()),
        Err(e) if error.is_some() => {
            // The run already failed; that error is the one to report.
            tracing::warn!(path = %path.display(), error = %e, "Failed to write action log");
            eprintln!("{} could not write log file '{}'", "warning:".yellow().bold(), path.display());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
