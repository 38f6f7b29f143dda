//! Restore stored files and directories to their live locations.
use anyhow::Result;

use super::{Context, Task, TaskResult, process_resources};
use crate::config::inventory;
use crate::resources::copy::CopyResource;

/// Copy every stored file and directory item to its live location.
///
/// Items missing from the configuration set are warned about and skipped.
#[derive(Debug)]
pub struct RestoreConfigItems;

impl Task for RestoreConfigItems {
    fn name(&self) -> &'static str {
        "Restore configuration"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let resources = inventory::copy_items().map(|item| {
            CopyResource::new(
                ctx.layout.stored_path(item),
                ctx.layout.live_path(item),
                item.kind.is_dir(),
            )
        });
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

    fn setup() -> (tempfile::TempDir, Layout) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("repo");
        let home = dir.path().join("home");
        fs::create_dir_all(root.join("config/nvim")).unwrap();
        fs::create_dir_all(&home).unwrap();
        fs::write(root.join("config/nvim/init.lua"), "vim.o.number = true\n").unwrap();
        fs::write(root.join("config/zshrc"), "export EDITOR=nvim\n").unwrap();
        (dir, Layout::new(root, home))
    }

    #[test]
    fn restores_present_items_and_skips_missing() {
        let (_dir, layout) = setup();
        let home = layout.home().to_path_buf();
        let (ctx, _log) = make_context(layout, Arc::new(MockExecutor::ok("")));

        let result = RestoreConfigItems.run(&ctx).unwrap();

        assert!(matches!(result, TaskResult::Ok));
        assert_eq!(
            fs::read_to_string(home.join(".config/nvim/init.lua")).unwrap(),
            "vim.o.number = true\n"
        );
        assert_eq!(
            fs::read_to_string(home.join(".zshrc")).unwrap(),
            "export EDITOR=nvim\n"
        );
        assert!(!home.join(".gitconfig").exists());
    }

    #[test]
    fn overwrites_existing_live_file() {
        let (_dir, layout) = setup();
        let home = layout.home().to_path_buf();
        fs::write(home.join(".zshrc"), "old\n").unwrap();
        let (ctx, _log) = make_context(layout, Arc::new(MockExecutor::ok("")));

        RestoreConfigItems.run(&ctx).unwrap();

        assert_eq!(
            fs::read_to_string(home.join(".zshrc")).unwrap(),
            "export EDITOR=nvim\n"
        );
    }

    #[test]
    fn dry_run_writes_nothing() {
        let (_dir, layout) = setup();
        let home = layout.home().to_path_buf();
        let (mut ctx, _log) = make_context(layout, Arc::new(MockExecutor::ok("")));
        ctx.dry_run = true;

        assert!(matches!(
            RestoreConfigItems.run(&ctx).unwrap(),
            TaskResult::DryRun
        ));
        assert!(!home.join(".zshrc").exists());
    }
}
