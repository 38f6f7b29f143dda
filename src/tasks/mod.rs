//! Named, ordered tasks that orchestrate resource changes during setup.
pub mod homebrew;
pub mod key_bindings;
pub mod packages;
mod processing;
pub mod restore;
pub mod shell;
pub mod terminal;

pub use processing::Context;
pub use processing::{TaskResult, TaskStats, process_resources};

use anyhow::Result;

use crate::logging::TaskStatus;

/// A named, executable task.
pub trait Task: Send + Sync {
    /// Human-readable task name.
    fn name(&self) -> &str;

    /// Whether this task should run in the given context.
    fn should_run(&self, ctx: &Context) -> bool;

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns an error if the task fails to execute, such as when a system
    /// command fails or a file operation is not permitted.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// The tasks run by setup, in execution order.
#[must_use]
pub fn setup_tasks() -> Vec<Box<dyn Task>> {
    vec![
        Box::new(homebrew::EnsureHomebrew),
        Box::new(packages::InstallFormulae),
        Box::new(packages::InstallCasks),
        Box::new(restore::RestoreConfigItems),
        Box::new(terminal::RestoreTerminalProfiles),
        Box::new(key_bindings::InstallKeyBindings),
        Box::new(shell::ReloadShellProfile),
    ]
}

/// Execute a task, recording the result in the logger.
///
/// Returns the status that was recorded.
#[must_use]
pub fn execute(task: &dyn Task, ctx: &Context) -> TaskStatus {
    if !task.should_run(ctx) {
        ctx.log
            .debug(&format!("skipping task: {} (not applicable)", task.name()));
        ctx.log
            .record_task(task.name(), TaskStatus::NotApplicable, None);
        return TaskStatus::NotApplicable;
    }

    ctx.log.stage(task.name());

    let (status, message) = match task.run(ctx) {
        Ok(TaskResult::Ok) => (TaskStatus::Ok, None),
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            (TaskStatus::Skipped, Some(reason))
        }
        Ok(TaskResult::DryRun) => (TaskStatus::DryRun, None),
        Err(e) => {
            ctx.log.error(&format!("{}: {e:#}", task.name()));
            (TaskStatus::Failed, Some(format!("{e:#}")))
        }
    };
    ctx.log.record_task(task.name(), status, message.as_deref());
    status
}
