//! easy-backup CLI
//!
//! Mirrors a source folder onto an existing destination folder.

mod cli;
mod commands;
mod console;
mod context;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::Cli;
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose).map_err(|e| CliError::user(format!("Failed to set up logging: {e}")))?;
    if cli.verbose {
        tracing::debug!("Verbose mode enabled");
    }

    commands::run_backup(&cli)
}
