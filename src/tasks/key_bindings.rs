//! Shell key bindings and completion from the fzf installer.
use std::path::Path;

use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::config::packages::KEY_BINDINGS_FORMULA;

/// Run fzf's companion installer to set up shell key bindings and completion.
///
/// A failing installer is a warning, never a task failure.
#[derive(Debug)]
pub struct InstallKeyBindings;

impl Task for InstallKeyBindings {
    fn name(&self) -> &'static str {
        "Install key bindings"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.platform.is_macos()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        if ctx.dry_run {
            ctx.log
                .dry_run(&format!("would run the {KEY_BINDINGS_FORMULA} key-binding installer"));
            return Ok(TaskResult::DryRun);
        }

        let Some(brew) = ctx.brew() else {
            ctx.log.warn("Homebrew not found, cannot locate key-binding installer");
            return Ok(TaskResult::Skipped("Homebrew not found".to_string()));
        };

        let prefix = match ctx.executor.run(&brew, &["--prefix"]) {
            Ok(result) => result.stdout,
            Err(e) => return Ok(warn_and_skip(ctx, format!("cannot read Homebrew prefix: {e:#}"))),
        };
        let installer = Path::new(prefix.trim())
            .join("opt")
            .join(KEY_BINDINGS_FORMULA)
            .join("install");
        let installer = installer.to_string_lossy();
        ctx.log.debug(&format!("running {installer}"));

        match ctx.executor.run_unchecked(
            &installer,
            &["--key-bindings", "--completion", "--no-update-rc"],
        ) {
            Ok(result) if result.success => Ok(TaskResult::Ok),
            Ok(result) => Ok(warn_and_skip(
                ctx,
                format!("key-binding installer exited with {}", result.exit_code()),
            )),
            Err(e) => Ok(warn_and_skip(ctx, format!("{e:#}"))),
        }
    }
}

fn warn_and_skip(ctx: &Context, reason: String) -> TaskResult {
    ctx.log.warn(&reason);
    TaskResult::Skipped(reason)
}
