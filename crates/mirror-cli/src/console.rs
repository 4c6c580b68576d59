//! Colored console presentation

use colored::{ColoredString, Colorize};
use mirror_core::{Action, ActionLog, ActionSink, Summary, SyncOptions};

use crate::context::BackupContext;

/// Sink that echoes each action to stdout before logging it.
pub struct ConsoleSink {
    log: ActionLog,
    echo: bool,
}

impl ConsoleSink {
    pub fn new(echo: bool) -> Self {
        Self {
            log: ActionLog::new(),
            echo,
        }
    }

    pub fn into_log(self) -> ActionLog {
        self.log
    }
}

impl ActionSink for ConsoleSink {
    fn record(&mut self, action: Action) {
        if self.echo {
            println!("{}: '{}'", paint(&action), action.display_path().display());
        }
        self.log.record(action);
    }
}

fn paint(action: &Action) -> ColoredString {
    let label = action.label();
    match action {
        Action::CreateFolder { .. } => label.green(),
        Action::AddFile { .. } | Action::UpdateFile { .. } => label.yellow(),
        Action::DeleteFile { .. } => label.blue(),
        Action::DeleteFolder { .. } => label.magenta(),
    }
}

/// Start-up information: where from, where to, and how.
pub fn print_banner(context: &BackupContext, options: &SyncOptions) {
    println!();
    println!("{}", "Source:".green());
    println!("\t{}\t{}", "Folder:".green(), context.source.display());
    println!("\t{}\t{}", "Name:".green(), context.program);
    println!();
    println!("{}\t{}", "Destination:".green(), context.destination.display());
    if options.emulate {
        println!("{}", "Emulating: the destination will not be modified".cyan());
    }
    if options.fast {
        println!("{}", "Fast mode: files of equal size are not compared".cyan());
    }
    println!();
}

/// One-line tally of a finished run.
pub fn summary_line(summary: &Summary) -> String {
    if summary.total() == 0 {
        return "Already synchronized".to_string();
    }

    let parts = [
        (summary.folders_created, "folder(s) created"),
        (summary.files_added, "file(s) added"),
        (summary.files_updated, "file(s) updated"),
        (summary.files_deleted, "file(s) deleted"),
        (summary.folders_deleted, "folder(s) deleted"),
    ];
    parts
        .iter()
        .filter(|(count, _)| *count > 0)
        .map(|(count, what)| format!("{count} {what}"))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn print_summary(summary: &Summary, emulate: bool) {
    println!();
    let line = summary_line(summary);
    if emulate {
        println!("{} {} (emulated)", "OK".green().bold(), line);
    } else {
        println!("{} {}", "OK".green().bold(), line);
    }
}
