//! Top-level subcommand orchestration.
pub mod backup;
pub mod bootstrap;
pub mod setup;
pub mod verify;
pub mod version;

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::config::CONFIG_SET_DIR;
use crate::error::PreconditionError;
use crate::logging::{Logger, TaskStatus};
use crate::tasks::{self, Context, Task};

/// Environment variable naming the repository root.
pub const ROOT_ENV: &str = "DOTFILES_ROOT";

/// Directory under home used when no other root is found.
pub const DEFAULT_ROOT_DIR: &str = ".dotfiles";

/// The user's home directory.
///
/// # Errors
///
/// Returns [`PreconditionError::HomeNotFound`] if it cannot be determined.
pub fn resolve_home() -> Result<PathBuf, PreconditionError> {
    dirs::home_dir().ok_or(PreconditionError::HomeNotFound)
}

/// Resolve the repository root from CLI arguments, environment, or the
/// running binary's location, falling back to `<home>/.dotfiles`.
///
/// The current working directory is never consulted.
#[must_use]
pub fn resolve_root(global: &GlobalOpts, home: &Path) -> PathBuf {
    resolve_root_from(
        global.root.as_deref(),
        std::env::var(ROOT_ENV).ok().as_deref(),
        std::env::current_exe().ok().as_deref(),
        home,
    )
}

/// [`resolve_root`] with every input passed explicitly.
#[must_use]
pub fn resolve_root_from(
    explicit: Option<&Path>,
    env: Option<&str>,
    exe: Option<&Path>,
    home: &Path,
) -> PathBuf {
    if let Some(root) = explicit {
        return root.to_path_buf();
    }

    if let Some(root) = env.filter(|r| !r.trim().is_empty()) {
        return PathBuf::from(root);
    }

    // target/release/dotfiles → repo root, or bin/dotfiles → repo root
    if let Some(parent) = exe.and_then(Path::parent) {
        for candidate in [parent.join("../.."), parent.join("..")] {
            if candidate.join(CONFIG_SET_DIR).is_dir() {
                return dunce::canonicalize(&candidate).unwrap_or(candidate);
            }
        }
    }

    home.join(DEFAULT_ROOT_DIR)
}

/// Execute tasks in order, stopping at the first failure, then print the
/// summary.
///
/// # Errors
///
/// Returns an error naming the task that failed.
pub fn run_tasks_fail_fast<'a>(
    tasks: impl IntoIterator<Item = &'a dyn Task>,
    ctx: &Context,
    log: &Logger,
) -> Result<()> {
    let mut failed = None;
    for task in tasks {
        if tasks::execute(task, ctx) == TaskStatus::Failed {
            failed = Some(task.name().to_string());
            break;
        }
    }

    log.print_summary();

    if let Some(name) = failed {
        anyhow::bail!("task '{name}' failed");
    }
    Ok(())
}
