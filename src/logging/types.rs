//! Summary entries, task status, and the [`Log`] trait.
use std::fmt;

/// One line of the end-of-run summary: a setup task or a backed-up item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEntry {
    /// Task or inventory item name.
    pub name: String,
    /// How it ended.
    pub status: TaskStatus,
    /// Skip reason, file count, or error text.
    pub message: Option<String>,
}

/// How a task or item ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Completed.
    Ok,
    /// Not relevant on this host.
    NotApplicable,
    /// Skipped with a warning (missing source, installer failure).
    Skipped,
    /// Dry run: nothing was changed.
    DryRun,
    /// Failed; setup stops here.
    Failed,
}

impl TaskStatus {
    /// Every status, in summary order.
    pub const ALL: [Self; 5] = [
        Self::Ok,
        Self::NotApplicable,
        Self::Skipped,
        Self::DryRun,
        Self::Failed,
    ];

    /// Summary icon.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Ok => "✓",
            Self::NotApplicable => "·",
            Self::Skipped => "○",
            Self::DryRun => "~",
            Self::Failed => "✗",
        }
    }

    /// ANSI color used for this status on the console.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Ok => "\x1b[32m",
            Self::NotApplicable => "\x1b[2m",
            Self::Skipped => "\x1b[33m",
            Self::DryRun => "\x1b[37m",
            Self::Failed => "\x1b[31m",
        }
    }

    /// Label used in the totals line.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::NotApplicable => "n/a",
            Self::Skipped => "skipped",
            Self::DryRun => "dry-run",
            Self::Failed => "failed",
        }
    }
}

/// Per-status counts of summary entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    counts: [usize; TaskStatus::ALL.len()],
}

impl Tally {
    /// Count `entries` by status.
    #[must_use]
    pub fn of(entries: &[TaskEntry]) -> Self {
        let mut tally = Self::default();
        for entry in entries {
            tally.add(entry.status);
        }
        tally
    }

    fn add(&mut self, status: TaskStatus) {
        if let Some(slot) = self.counts.get_mut(status as usize) {
            *slot += 1;
        }
    }

    /// Number of entries with `status`.
    #[must_use]
    pub fn count(&self, status: TaskStatus) -> usize {
        self.counts.get(status as usize).copied().unwrap_or(0)
    }

    /// Number of entries counted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

impl fmt::Display for Tally {
    /// `N entries: a ok, b n/a, c skipped, d dry-run, e failed`, each count
    /// in its status color.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} entries:", self.total())?;
        for (i, status) in TaskStatus::ALL.into_iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(
                f,
                "{sep}{}{} {}\x1b[0m",
                status.color(),
                self.count(status),
                status.label()
            )?;
        }
        Ok(())
    }
}

/// Logging backend used by tasks and commands.
///
/// [`Logger`](super::Logger) is the only production implementation; the
/// trait exists so a [`Context`](crate::tasks::Context) can hold it behind
/// an `Arc<dyn Log>`.
pub trait Log: Send + Sync {
    /// Stage header (`==> msg`).
    fn stage(&self, msg: &str);
    /// Indented informational line.
    fn info(&self, msg: &str);
    /// Debug line, shown on the console only with `--verbose`.
    fn debug(&self, msg: &str);
    /// Warning, printed to stderr.
    fn warn(&self, msg: &str);
    /// Error, printed to stderr.
    fn error(&self, msg: &str);
    /// Change that a dry run would have made.
    fn dry_run(&self, msg: &str);
    /// Add an entry to the end-of-run summary.
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>);
}
