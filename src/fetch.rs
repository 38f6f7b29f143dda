//! Download and unpack the repository archive.
//!
//! The archive is streamed into a per-run [`TempDir`] and unpacked there with
//! the system `tar`. The temporary directory is removed when the returned
//! [`FetchedArchive`] is dropped.
use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use tempfile::TempDir;

use crate::config::CONFIG_SET_DIR;
use crate::error::{FetchError, PreconditionError};
use crate::exec::Executor;

/// Archive fetched when neither `--archive-url` nor [`ARCHIVE_URL_ENV`] is set.
pub const DEFAULT_ARCHIVE_URL: &str =
    "https://github.com/dotfiles-macos/dotfiles/archive/refs/heads/main.tar.gz";

/// Environment variable overriding the archive URL.
pub const ARCHIVE_URL_ENV: &str = "DOTFILES_ARCHIVE_URL";

/// File name the archive is saved under inside the temporary directory.
const ARCHIVE_FILE: &str = "dotfiles.tar.gz";

/// Resolve the archive URL: explicit value, then environment, then default.
#[must_use]
pub fn resolve_archive_url(explicit: Option<&str>) -> String {
    explicit.map(str::to_string).unwrap_or_else(|| {
        std::env::var(ARCHIVE_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ARCHIVE_URL.to_string())
    })
}

/// An unpacked archive living in a temporary directory.
#[derive(Debug)]
pub struct FetchedArchive {
    _dir: TempDir,
    tree: PathBuf,
}

impl FetchedArchive {
    /// The archive's top-level directory (the repository tree).
    #[must_use]
    pub fn tree(&self) -> &Path {
        &self.tree
    }

    /// The configuration set inside the repository tree.
    #[must_use]
    pub fn config_set(&self) -> PathBuf {
        self.tree.join(CONFIG_SET_DIR)
    }
}

/// Download `url` and unpack it into a fresh temporary directory.
///
/// # Errors
///
/// Returns [`FetchError`] if the download or extraction fails and
/// [`PreconditionError::MissingConfigSubtree`] if the unpacked tree has no
/// configuration set.
pub fn fetch(url: &str, executor: &dyn Executor) -> Result<FetchedArchive> {
    let dir = tempfile::Builder::new()
        .prefix("dotfiles-")
        .tempdir()
        .context("creating temporary directory")?;
    let archive = dir.path().join(ARCHIVE_FILE);
    download(url, &archive)?;

    let unpack_dir = dir.path().join("src");
    std::fs::create_dir_all(&unpack_dir)
        .with_context(|| format!("creating {}", unpack_dir.display()))?;
    extract(executor, &archive, &unpack_dir)?;

    let tree = locate_tree(&unpack_dir)?;
    Ok(FetchedArchive { _dir: dir, tree })
}

/// Stream the body of `url` into `dest`.
///
/// # Errors
///
/// Returns [`FetchError::Download`] for HTTP failures (including error
/// statuses) and [`FetchError::Write`] if the body cannot be saved.
pub fn download(url: &str, dest: &Path) -> Result<(), FetchError> {
    tracing::debug!("downloading {url}");
    let mut response = ureq::get(url).call().map_err(|e| FetchError::Download {
        url: url.to_string(),
        source: Box::new(e),
    })?;
    let write_err = |source| FetchError::Write {
        path: dest.to_path_buf(),
        source,
    };
    let mut file = File::create(dest).map_err(write_err)?;
    let mut reader = response.body_mut().as_reader();
    let bytes = std::io::copy(&mut reader, &mut file).map_err(write_err)?;
    tracing::debug!("saved {bytes} bytes to {}", dest.display());
    Ok(())
}

/// Unpack the gzip tarball `archive` into `dest` with `tar -xzf`.
///
/// # Errors
///
/// Returns [`FetchError::Extract`] if `tar` cannot be run or exits non-zero.
pub fn extract(executor: &dyn Executor, archive: &Path, dest: &Path) -> Result<(), FetchError> {
    let archive_arg = archive.to_string_lossy();
    let dest_arg = dest.to_string_lossy();
    let extract_err = |reason: String| FetchError::Extract {
        archive: archive.to_path_buf(),
        reason,
    };
    let result = executor
        .run_unchecked("tar", &["-xzf", &archive_arg, "-C", &dest_arg])
        .map_err(|e| extract_err(format!("{e:#}")))?;
    if result.success {
        Ok(())
    } else {
        Err(extract_err(format!(
            "tar exited with code {}: {}",
            result.exit_code(),
            result.stderr.trim()
        )))
    }
}

/// Find the repository tree inside an unpacked archive.
///
/// Archives normally hold a single top-level directory; an archive packed
/// without one is accepted when the configuration set sits at its root.
///
/// # Errors
///
/// Returns [`PreconditionError::MissingConfigSubtree`] if no configuration
/// set is found, or an I/O error if the directory cannot be read.
pub fn locate_tree(unpack_dir: &Path) -> Result<PathBuf> {
    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(unpack_dir)
        .with_context(|| format!("reading directory {}", unpack_dir.display()))?
    {
        let path = entry
            .with_context(|| format!("reading entry in {}", unpack_dir.display()))?
            .path();
        if path.is_dir() {
            dirs.push(path);
        }
    }

    let tree = match dirs.as_slice() {
        [single] if !unpack_dir.join(CONFIG_SET_DIR).is_dir() => single.clone(),
        _ => unpack_dir.to_path_buf(),
    };
    if !tree.join(CONFIG_SET_DIR).is_dir() {
        return Err(PreconditionError::MissingConfigSubtree { path: tree }.into());
    }
    Ok(tree)
}
