//! Restore terminal color schemes and dynamic profiles.
use anyhow::{Context as _, Result};

use super::{Context, Task, TaskResult, process_resources};
use crate::config::inventory::{self, ProfileKind, TERMINAL_ITEM};
use crate::resources::copy::CopyResource;

/// Copy stored color schemes and profiles into the terminal emulator's
/// color-preset and dynamic-profile directories.
#[derive(Debug)]
pub struct RestoreTerminalProfiles;

impl Task for RestoreTerminalProfiles {
    fn name(&self) -> &'static str {
        "Restore terminal profiles"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let Some(item) = inventory::find(TERMINAL_ITEM) else {
            return Ok(TaskResult::Skipped("no terminal item".to_string()));
        };
        let stored = ctx.layout.stored_path(item);
        if !stored.is_dir() {
            ctx.log.warn(&format!(
                "no terminal profiles in configuration set: {}",
                stored.display()
            ));
            return Ok(TaskResult::Skipped("not in configuration set".to_string()));
        }

        let mut resources = Vec::new();
        for entry in std::fs::read_dir(&stored)
            .with_context(|| format!("reading directory {}", stored.display()))?
        {
            let path = entry
                .with_context(|| format!("reading entry in {}", stored.display()))?
                .path();
            if !path.is_file() {
                continue;
            }
            let (Some(kind), Some(file_name)) = (ProfileKind::classify(&path), path.file_name())
            else {
                ctx.log
                    .debug(&format!("ignoring {}", path.display()));
                continue;
            };
            let target = ctx.layout.terminal_live_dir(kind).join(file_name);
            resources.push(CopyResource::new(path, target, false));
        }
        resources.sort_by(|a, b| a.source.cmp(&b.source));

        if resources.is_empty() {
            ctx.log.warn(&format!(
                "no color schemes or profiles found in {}",
                stored.display()
            ));
            return Ok(TaskResult::Skipped("no matching files".to_string()));
        }

        if !ctx.dry_run {
            for kind in ProfileKind::ALL {
                let live_dir = ctx.layout.terminal_live_dir(kind);
                std::fs::create_dir_all(&live_dir)
                    .with_context(|| format!("creating {}", live_dir.display()))?;
            }
        }

        process_resources(ctx, resources, "restore")
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::Layout;
    use crate::resources::test_helpers::MockExecutor;
    use crate::tasks::test_helpers::make_context;
    use std::fs;
    use std::sync::Arc;

    fn layout(dir: &tempfile::TempDir) -> Layout {
        Layout::new(dir.path().join("repo"), dir.path().join("home"))
    }

    #[test]
    fn splits_files_by_sub_kind() {
        let dir = tempfile::tempdir().unwrap();
        let layout = layout(&dir);
        let stored = layout.config_set().join("iterm2");
        fs::create_dir_all(&stored).unwrap();
        fs::write(stored.join("Dracula.itermcolors"), "<plist/>").unwrap();
        fs::write(stored.join("work.json"), "{}").unwrap();
        fs::write(stored.join("README.md"), "notes").unwrap();
        let presets = layout.terminal_live_dir(ProfileKind::ColorScheme);
        let profiles = layout.terminal_live_dir(ProfileKind::Profile);
        let (ctx, _log) = make_context(layout, Arc::new(MockExecutor::ok("")));

        let result = RestoreTerminalProfiles.run(&ctx).unwrap();

        assert!(matches!(result, TaskResult::Ok));
        assert_eq!(
            fs::read_to_string(presets.join("Dracula.itermcolors")).unwrap(),
            "<plist/>"
        );
        assert_eq!(fs::read_to_string(profiles.join("work.json")).unwrap(), "{}");
        assert!(!presets.join("README.md").exists());
        assert!(!profiles.join("README.md").exists());
    }

    #[test]
    fn both_live_directories_exist_after_restore() {
        let dir = tempfile::tempdir().unwrap();
        let layout = layout(&dir);
        let stored = layout.config_set().join("iterm2");
        fs::create_dir_all(&stored).unwrap();
        fs::write(stored.join("Nord.itermcolors"), "<plist/>").unwrap();
        let presets = layout.terminal_live_dir(ProfileKind::ColorScheme);
        let profiles = layout.terminal_live_dir(ProfileKind::Profile);
        let (ctx, _log) = make_context(layout, Arc::new(MockExecutor::ok("")));

        RestoreTerminalProfiles.run(&ctx).unwrap();

        assert!(presets.join("Nord.itermcolors").is_file());
        assert!(profiles.is_dir());
    }

    #[test]
    fn dry_run_creates_no_live_directories() {
        let dir = tempfile::tempdir().unwrap();
        let layout = layout(&dir);
        let stored = layout.config_set().join("iterm2");
        fs::create_dir_all(&stored).unwrap();
        fs::write(stored.join("Nord.itermcolors"), "<plist/>").unwrap();
        let home = layout.home().to_path_buf();
        let (mut ctx, _log) = make_context(layout, Arc::new(MockExecutor::ok("")));
        ctx.dry_run = true;

        let result = RestoreTerminalProfiles.run(&ctx).unwrap();

        assert!(matches!(result, TaskResult::DryRun));
        assert!(!home.exists());
    }

    #[test]
    fn skipped_when_not_stored() {
        let dir = tempfile::tempdir().unwrap();
        let (ctx, _log) = make_context(layout(&dir), Arc::new(MockExecutor::ok("")));
        assert!(matches!(
            RestoreTerminalProfiles.run(&ctx).unwrap(),
            TaskResult::Skipped(_)
        ));
    }

    #[test]
    fn skipped_when_no_matching_files() {
        let dir = tempfile::tempdir().unwrap();
        let layout = layout(&dir);
        let stored = layout.config_set().join("iterm2");
        fs::create_dir_all(&stored).unwrap();
        fs::write(stored.join("notes.txt"), "x").unwrap();
        let (ctx, _log) = make_context(layout, Arc::new(MockExecutor::ok("")));
        assert!(matches!(
            RestoreTerminalProfiles.run(&ctx).unwrap(),
            TaskResult::Skipped(_)
        ));
    }
}
