//! Install or update Homebrew.
use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::config::packages::HOMEBREW_INSTALL_URL;
use crate::resources::error::ResourceError;

/// Install Homebrew when it is absent, otherwise refresh its index.
#[derive(Debug)]
pub struct EnsureHomebrew;

impl Task for EnsureHomebrew {
    fn name(&self) -> &'static str {
        "Ensure Homebrew"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.platform.is_macos()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        if let Some(brew) = ctx.brew() {
            ctx.log.debug(&format!("found Homebrew at {brew}"));
            if ctx.dry_run {
                ctx.log.dry_run("would run: brew update");
                return Ok(TaskResult::DryRun);
            }
            ctx.executor.run(&brew, &["update"])?;
            ctx.log.info("Homebrew index updated");
            return Ok(TaskResult::Ok);
        }

        if ctx.dry_run {
            ctx.log
                .dry_run(&format!("would install Homebrew from {HOMEBREW_INSTALL_URL}"));
            return Ok(TaskResult::DryRun);
        }

        ctx.log.info("installing Homebrew");
        let script = ctx
            .executor
            .run("curl", &["-fsSL", HOMEBREW_INSTALL_URL])?
            .stdout;
        ctx.executor
            .run_interactive("/bin/bash", &["-c", &script], &[("NONINTERACTIVE", "1")])?;

        let brew = ctx.brew().ok_or_else(|| ResourceError::ManagerNotFound {
            manager: "brew".to_string(),
        })?;
        ctx.log.info(&format!("Homebrew installed at {brew}"));
        Ok(TaskResult::Ok)
    }
}
