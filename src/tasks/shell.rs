//! Reload the restored shell profile.
use anyhow::Result;

use super::{Context, Task, TaskResult};

/// Source the restored shell profile in a fresh `zsh` to surface errors in it.
///
/// A child process cannot change its parent shell's environment; the
/// operator gets the new profile by starting a new session afterwards.
#[derive(Debug)]
pub struct ReloadShellProfile;

impl Task for ReloadShellProfile {
    fn name(&self) -> &'static str {
        "Reload shell profile"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let profile = ctx.layout.shell_profile();
        if !ctx.dry_run && !profile.is_file() {
            ctx.log
                .warn(&format!("no shell profile at {}", profile.display()));
            return Ok(TaskResult::Skipped("no shell profile".to_string()));
        }

        let command = format!("source '{}'", profile.display());
        if ctx.dry_run {
            ctx.log.dry_run(&format!("would run: zsh -c \"{command}\""));
            return Ok(TaskResult::DryRun);
        }

        let reason = match ctx.executor.run_unchecked("zsh", &["-c", &command]) {
            Ok(result) if result.success => {
                ctx.log.info(&format!("sourced {}", profile.display()));
                return Ok(TaskResult::Ok);
            }
            Ok(result) => format!(
                "sourcing {} failed: {}",
                profile.display(),
                result.stderr.trim()
            ),
            Err(e) => format!("{e:#}"),
        };
        ctx.log.warn(&reason);
        Ok(TaskResult::Skipped(reason))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::Layout;
    use crate::resources::test_helpers::MockExecutor;
    use crate::tasks::test_helpers::make_context;
    use std::sync::Arc;

    #[test]
    fn sources_profile_with_zsh() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".zshrc"), "export A=1\n").unwrap();
        let executor = Arc::new(MockExecutor::ok(""));
        let (ctx, _log) = make_context(Layout::new("/repo", dir.path()), executor.clone());

        assert!(matches!(ReloadShellProfile.run(&ctx).unwrap(), TaskResult::Ok));
        let calls = executor.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].starts_with("zsh -c source '"));
        assert!(calls[0].ends_with(".zshrc'"));
    }

    #[test]
    fn skipped_without_profile() {
        let dir = tempfile::tempdir().unwrap();
        let executor = Arc::new(MockExecutor::ok(""));
        let (ctx, _log) = make_context(Layout::new("/repo", dir.path()), executor.clone());
        assert!(matches!(
            ReloadShellProfile.run(&ctx).unwrap(),
            TaskResult::Skipped(_)
        ));
        assert_eq!(executor.call_count(), 0);
    }

    #[test]
    fn failed_source_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".zshrc"), "syntax error (\n").unwrap();
        let (ctx, _log) = make_context(
            Layout::new("/repo", dir.path()),
            Arc::new(MockExecutor::fail()),
        );
        assert!(matches!(
            ReloadShellProfile.run(&ctx).unwrap(),
            TaskResult::Skipped(_)
        ));
    }

    #[test]
    fn missing_zsh_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".zshrc"), "export A=1\n").unwrap();
        let (ctx, log) = make_context(
            Layout::new("/repo", dir.path()),
            Arc::new(MockExecutor::ok("").unstartable("zsh")),
        );

        let result = ReloadShellProfile.run(&ctx).unwrap();

        assert!(matches!(result, TaskResult::Skipped(ref reason) if reason.contains("cannot start zsh")));
        assert!(!log.has_failures());
    }
}
