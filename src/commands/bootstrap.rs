//! Command: fetch the repository and hand over to setup.
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::cli::{BootstrapOpts, GlobalOpts, SetupOpts};
use crate::config::CONFIG_SET_DIR;
use crate::exec::Executor;
use crate::fetch;
use crate::logging::Logger;
use crate::resources::helpers::fs;

/// Run the bootstrap command.
///
/// Downloads the repository archive, copies its tree over the install root
/// and runs setup against that root. The temporary download directory is
/// removed before setup starts.
///
/// # Errors
///
/// Returns an error if the archive cannot be fetched, has no configuration
/// set, cannot be copied into place, or if setup fails.
pub fn run(
    global: &GlobalOpts,
    opts: &BootstrapOpts,
    log: &Arc<Logger>,
    executor: Arc<dyn Executor>,
) -> Result<()> {
    let home = super::resolve_home()?;
    let root = super::resolve_root(global, &home);
    let url = fetch::resolve_archive_url(opts.archive_url.as_deref());

    log.stage("Fetching repository");
    if global.dry_run {
        log.dry_run(&format!("would fetch {url} into {}", root.display()));
    } else {
        log.info(&format!("downloading {url}"));
        let archive = fetch::fetch(&url, &*executor)?;
        install_tree(archive.tree(), &root)?;
        log.info(&format!("repository installed at {}", root.display()));
    }

    let setup_global = GlobalOpts {
        root: Some(root),
        ..global.clone()
    };
    let setup_opts = SetupOpts {
        archive_url: Some(url),
        no_shell: opts.no_shell,
    };
    super::setup::run(&setup_global, &setup_opts, log, executor)
}

/// Copy an unpacked repository tree over `root`, creating it if needed.
///
/// The configuration set is replaced wholesale so it matches the archive
/// exactly. Other files already under `root` that the tree does not contain
/// are kept.
///
/// # Errors
///
/// Returns an error if any file cannot be copied.
pub fn install_tree(tree: &Path, root: &Path) -> Result<()> {
    fs::copy_dir_recursive(tree, root, true)
        .with_context(|| format!("copying repository into {}", root.display()))?;
    let config_set = root.join(CONFIG_SET_DIR);
    fs::replace_dir(&tree.join(CONFIG_SET_DIR), &config_set, true)
        .with_context(|| format!("replacing {}", config_set.display()))
}
