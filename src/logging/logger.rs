//! Logger that emits through [`tracing`] and keeps the run summary.
use std::path::PathBuf;
use std::sync::Mutex;

use super::subscriber::{DRY_RUN_TARGET, STAGE_TARGET};
use super::types::{Log, Tally, TaskEntry, TaskStatus};
use super::utils::log_file_path;

/// Implement the message methods of [`Log`] by calling the inherent method
/// of the same name.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Per-command logger.
///
/// Messages go straight to [`tracing`]; the subscriber installed by
/// [`init_subscriber`](super::init_subscriber) decides where they land.
/// Summary entries are kept in memory until [`Logger::print_summary`].
#[derive(Debug)]
pub struct Logger {
    entries: Mutex<Vec<TaskEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Logger for `command`; the summary footer points at its log file.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            log_file: log_file_path(command),
        }
    }

    /// Snapshot of the summary entries recorded so far.
    #[must_use]
    pub fn task_entries(&self) -> Vec<TaskEntry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Error line on stderr.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Warning line on stderr.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// `==>` stage header.
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Indented line on stdout.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Debug line; on the console only with `--verbose`.
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// `[DRY RUN]` line describing a skipped change.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Add an entry to the summary.
    pub fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        let entry = TaskEntry {
            name: name.to_string(),
            status,
            message: message.map(str::to_string),
        };
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry);
        }
    }

    /// Whether any entry failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failure_count() > 0
    }

    /// Number of failed entries.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        Tally::of(&self.task_entries()).count(TaskStatus::Failed)
    }

    /// Print one line per recorded entry, the per-status totals, and the log
    /// file location. Prints nothing when no entries were recorded.
    pub fn print_summary(&self) {
        let entries = self.task_entries();
        if entries.is_empty() {
            return;
        }

        self.stage("Summary");
        for entry in &entries {
            let suffix = entry
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));
            self.info(&format!(
                "{}{} {}{suffix}\x1b[0m",
                entry.status.color(),
                entry.status.symbol(),
                entry.name
            ));
        }
        self.info(&Tally::of(&entries).to_string());

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);

    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        self.record_task(name, status, message);
    }
}
