//! Command: install tooling and restore the configuration set.
use std::io::IsTerminal as _;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::cli::{GlobalOpts, SetupOpts};
use crate::config::Layout;
use crate::error::PreconditionError;
use crate::exec::{self, Executor};
use crate::fetch;
use crate::logging::{Log, Logger};
use crate::platform::Platform;
use crate::resources::helpers::fs;
use crate::tasks::{self, Context};

/// Prompt shown before replacing the process with a login shell.
const NEW_SHELL_PROMPT: &str = "Start a new zsh session now?";

/// Run the setup command.
///
/// # Errors
///
/// Returns an error if a precondition fails or any setup task fails.
pub fn run(
    global: &GlobalOpts,
    opts: &SetupOpts,
    log: &Arc<Logger>,
    executor: Arc<dyn Executor>,
) -> Result<()> {
    let home = super::resolve_home()?;
    let root = super::resolve_root(global, &home);
    let ctx = Context::new(
        Layout::new(root, home),
        Platform::detect(),
        Arc::clone(log) as Arc<dyn Log>,
        executor,
        global.dry_run,
    );

    let url = fetch::resolve_archive_url(opts.archive_url.as_deref());
    run_with_context(&ctx, log, &url)?;

    if !opts.no_shell {
        offer_new_shell(&ctx)?;
    }
    Ok(())
}

/// Check preconditions, then run every setup task in order.
///
/// # Errors
///
/// Returns a [`PreconditionError`] for fatal checks, or an error naming the
/// first task that failed.
pub fn run_with_context(ctx: &Context, log: &Logger, archive_url: &str) -> Result<()> {
    log.info(&format!("dotfiles {}", super::version::version()));
    log.debug(&format!("root: {}", ctx.layout.root().display()));
    log.debug(&format!("home: {}", ctx.layout.home().display()));

    log.stage("Checking preconditions");
    ensure_config_set(ctx, archive_url)?;
    check_platform(ctx.platform)?;
    ensure_toolchain(ctx)?;

    let all = tasks::setup_tasks();
    super::run_tasks_fail_fast(all.iter().map(Box::as_ref), ctx, log)
}

/// Fetch the configuration set when it is absent locally.
///
/// Only the `config` subtree of the archive is moved into place.
///
/// # Errors
///
/// Returns an error if the fetch fails or the archive has no configuration
/// set.
pub fn ensure_config_set(ctx: &Context, archive_url: &str) -> Result<()> {
    let config_set = ctx.layout.config_set();
    if config_set.is_dir() {
        ctx.log
            .debug(&format!("configuration set found at {}", config_set.display()));
        return Ok(());
    }

    if ctx.dry_run {
        ctx.log.dry_run(&format!(
            "would fetch {archive_url} into {}",
            config_set.display()
        ));
        return Ok(());
    }

    ctx.log.info(&format!(
        "configuration set missing, fetching {archive_url}"
    ));
    let archive = fetch::fetch(archive_url, &*ctx.executor)?;
    fs::replace_dir(&archive.config_set(), &config_set, true)
        .with_context(|| format!("installing configuration set at {}", config_set.display()))?;
    ctx.log
        .info(&format!("configuration set installed at {}", config_set.display()));
    Ok(())
}

/// Fail unless running on macOS.
///
/// # Errors
///
/// Returns [`PreconditionError::UnsupportedPlatform`] on any other host.
pub fn check_platform(platform: Platform) -> Result<(), PreconditionError> {
    if platform.is_macos() {
        Ok(())
    } else {
        Err(PreconditionError::UnsupportedPlatform {
            platform: platform.os.to_string(),
        })
    }
}

/// Make sure the Xcode Command Line Tools are installed.
///
/// When they are missing the installer is started and the run stops: the
/// installer is an interactive dialog that finishes on its own schedule.
///
/// # Errors
///
/// Returns [`PreconditionError::ToolchainPending`] after starting the
/// installer.
pub fn ensure_toolchain(ctx: &Context) -> Result<()> {
    let probe = ctx.executor.run_unchecked("xcode-select", &["-p"])?;
    if probe.success {
        ctx.log
            .debug(&format!("command line tools at {}", probe.stdout.trim()));
        return Ok(());
    }

    if ctx.dry_run {
        ctx.log
            .dry_run("would install the Xcode Command Line Tools");
        return Ok(());
    }

    ctx.log.warn("Xcode Command Line Tools not found, starting installer");
    let started = ctx.executor.run_unchecked("xcode-select", &["--install"])?;
    if !started.success {
        ctx.log.warn(&format!(
            "xcode-select --install exited with code {}",
            started.exit_code()
        ));
    }
    Err(PreconditionError::ToolchainPending.into())
}

/// Ask whether to replace this process with a login shell.
///
/// Never prompts in dry-run mode or when stdin is not a terminal.
fn offer_new_shell(ctx: &Context) -> Result<()> {
    if ctx.dry_run || !std::io::stdin().is_terminal() {
        return Ok(());
    }

    match inquire::Confirm::new(NEW_SHELL_PROMPT)
        .with_default(false)
        .prompt()
    {
        Ok(true) => Err(exec::replace_process("zsh", &["-l"])),
        Ok(false) => Ok(()),
        Err(e) => {
            ctx.log.debug(&format!("prompt dismissed: {e}"));
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::platform::Os;
    use crate::resources::test_helpers::MockExecutor;
    use crate::tasks::test_helpers::make_context;

    fn layout_with_config(dir: &tempfile::TempDir) -> Layout {
        let root = dir.path().join("repo");
        std::fs::create_dir_all(root.join("config")).unwrap();
        Layout::new(root, dir.path().join("home"))
    }

    // -----------------------------------------------------------------------
    // check_platform
    // -----------------------------------------------------------------------

    #[test]
    fn macos_passes_platform_check() {
        assert!(check_platform(Platform::new(Os::MacOs)).is_ok());
    }

    #[test]
    fn linux_fails_platform_check() {
        let err = check_platform(Platform::new(Os::Linux)).unwrap_err();
        assert!(matches!(
            err,
            PreconditionError::UnsupportedPlatform { ref platform } if platform == "linux"
        ));
    }

    // -----------------------------------------------------------------------
    // ensure_toolchain
    // -----------------------------------------------------------------------

    #[test]
    fn toolchain_present_passes() {
        let dir = tempfile::tempdir().unwrap();
        let executor = Arc::new(MockExecutor::ok("/Library/Developer/CommandLineTools\n"));
        let (ctx, _log) = make_context(layout_with_config(&dir), executor.clone());
        ensure_toolchain(&ctx).unwrap();
        assert_eq!(executor.calls(), vec!["xcode-select -p"]);
    }

    #[test]
    fn missing_toolchain_starts_installer_and_stops() {
        let dir = tempfile::tempdir().unwrap();
        let executor = Arc::new(MockExecutor::with_responses(vec![
            (false, String::new()),
            (true, String::new()),
        ]));
        let (ctx, _log) = make_context(layout_with_config(&dir), executor.clone());
        let err = ensure_toolchain(&ctx).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PreconditionError>(),
            Some(PreconditionError::ToolchainPending)
        ));
        assert_eq!(
            executor.calls(),
            vec!["xcode-select -p", "xcode-select --install"]
        );
    }

    #[test]
    fn dry_run_does_not_start_installer() {
        let dir = tempfile::tempdir().unwrap();
        let executor = Arc::new(MockExecutor::fail());
        let (mut ctx, _log) = make_context(layout_with_config(&dir), executor.clone());
        ctx.dry_run = true;
        ensure_toolchain(&ctx).unwrap();
        assert_eq!(executor.call_count(), 1);
    }

    // -----------------------------------------------------------------------
    // ensure_config_set
    // -----------------------------------------------------------------------

    #[test]
    fn existing_config_set_is_not_fetched() {
        let dir = tempfile::tempdir().unwrap();
        let executor = Arc::new(MockExecutor::fail());
        let (ctx, _log) = make_context(layout_with_config(&dir), executor.clone());
        ensure_config_set(&ctx, "http://127.0.0.1:9/unused.tar.gz").unwrap();
        assert_eq!(executor.call_count(), 0);
    }

    #[test]
    fn dry_run_skips_fetch_of_missing_config_set() {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::new(dir.path().join("repo"), dir.path().join("home"));
        let (mut ctx, _log) = make_context(layout, Arc::new(MockExecutor::fail()));
        ctx.dry_run = true;
        ensure_config_set(&ctx, "http://127.0.0.1:9/unused.tar.gz").unwrap();
        assert!(!dir.path().join("repo/config").exists());
    }

    // -----------------------------------------------------------------------
    // run_with_context
    // -----------------------------------------------------------------------

    #[test]
    fn unsupported_platform_stops_before_tasks() {
        let dir = tempfile::tempdir().unwrap();
        let executor = Arc::new(MockExecutor::ok(""));
        let (mut ctx, log) = make_context(layout_with_config(&dir), executor.clone());
        ctx.platform = Platform::new(Os::Linux);
        let err = run_with_context(&ctx, &log, "unused").unwrap_err();
        assert!(err.downcast_ref::<PreconditionError>().is_some());
        assert_eq!(executor.call_count(), 0);
        assert!(log.task_entries().is_empty());
    }
}
