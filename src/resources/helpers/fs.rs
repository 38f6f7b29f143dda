//! File-system helpers shared by resources and commands.
use anyhow::{Context as _, Result, bail};
use sha2::{Digest as _, Sha256};
use std::path::{Path, PathBuf};

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create parent: {}", parent.display()))?;
    }
    Ok(())
}

/// Remove whatever exists at `path` (file, symlink, or directory tree).
/// Does nothing if `path` does not exist.
///
/// # Errors
///
/// Returns an error if the path exists but cannot be removed.
pub fn remove_existing(path: &Path) -> Result<()> {
    let Ok(meta) = path.symlink_metadata() else {
        return Ok(());
    };
    let removed = if meta.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };
    removed.with_context(|| format!("remove existing: {}", path.display()))
}

/// Recursively copy a directory tree, overwriting files that already exist.
///
/// When `skip_git` is `true`, `.git` directories are skipped.
///
/// Symlinks within the source tree are *followed*: directory symlinks are
/// recursed into and their contents materialised rather than copying the
/// link itself. A link leading back into one of its own ancestors is an
/// error.
///
/// # Errors
///
/// Returns an error if the destination directory cannot be created, a source
/// entry cannot be read, a file cannot be copied, or the tree links back
/// into itself.
pub fn copy_dir_recursive(src: &Path, dst: &Path, skip_git: bool) -> Result<()> {
    copy_tree(src, dst, skip_git, &mut Vec::new())
}

fn copy_tree(src: &Path, dst: &Path, skip_git: bool, ancestors: &mut Vec<PathBuf>) -> Result<()> {
    enter(src, ancestors)?;
    std::fs::create_dir_all(dst)
        .with_context(|| format!("creating directory {}", dst.display()))?;
    for entry in
        std::fs::read_dir(src).with_context(|| format!("reading directory {}", src.display()))?
    {
        let entry = entry.with_context(|| format!("reading entry in {}", src.display()))?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        if src_path.is_dir() {
            if skip_git && entry.file_name() == ".git" {
                continue;
            }
            copy_tree(&src_path, &dst_path, skip_git, ancestors)?;
        } else {
            std::fs::copy(&src_path, &dst_path).with_context(|| {
                format!("copying {} to {}", src_path.display(), dst_path.display())
            })?;
        }
    }
    ancestors.pop();
    Ok(())
}

/// Record `dir` as the innermost directory being walked.
///
/// Fails if `dir` resolves to a directory already on the path from the root
/// of the walk, which only a symlink can cause.
fn enter(dir: &Path, ancestors: &mut Vec<PathBuf>) -> Result<()> {
    let real = dunce::canonicalize(dir).with_context(|| format!("resolving {}", dir.display()))?;
    if ancestors.contains(&real) {
        bail!(
            "symlink cycle: {} leads back to {}",
            dir.display(),
            real.display()
        );
    }
    ancestors.push(real);
    Ok(())
}

/// Replace `dst` wholesale with a copy of the directory `src`.
///
/// Whatever existed at `dst` is deleted first, so files absent from `src`
/// do not survive.
///
/// # Errors
///
/// Returns an error if `dst` cannot be removed or the copy fails.
pub fn replace_dir(src: &Path, dst: &Path, skip_git: bool) -> Result<()> {
    remove_existing(dst)?;
    copy_dir_recursive(src, dst, skip_git)
}

/// Copy the file `src` to `dst`, creating parent directories and replacing
/// anything already at `dst`.
///
/// # Errors
///
/// Returns an error if the parent cannot be created, `dst` cannot be
/// removed, or the copy fails.
pub fn replace_file(src: &Path, dst: &Path) -> Result<()> {
    ensure_parent_dir(dst)?;
    if dst.is_dir() {
        remove_existing(dst)?;
    }
    std::fs::copy(src, dst)
        .with_context(|| format!("copying {} to {}", src.display(), dst.display()))?;
    Ok(())
}

/// Compute the hex-encoded SHA-256 digest of a file.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file =
        std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher)
        .with_context(|| format!("hashing {}", path.display()))?;
    Ok(hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect())
}

/// Whether two regular files have identical content.
///
/// # Errors
///
/// Returns an error if either file cannot be read.
pub fn files_identical(a: &Path, b: &Path) -> Result<bool> {
    if !a.is_file() || !b.is_file() {
        return Ok(false);
    }
    let (len_a, len_b) = (
        std::fs::metadata(a)
            .with_context(|| format!("stat {}", a.display()))?
            .len(),
        std::fs::metadata(b)
            .with_context(|| format!("stat {}", b.display()))?
            .len(),
    );
    if len_a != len_b {
        return Ok(false);
    }
    Ok(sha256_file(a)? == sha256_file(b)?)
}

/// Whether two directory trees hold the same relative file paths with
/// identical content. Empty directories are not compared.
///
/// # Errors
///
/// Returns an error if either tree cannot be walked or a file cannot be read.
pub fn dirs_identical(a: &Path, b: &Path) -> Result<bool> {
    if !a.is_dir() || !b.is_dir() {
        return Ok(false);
    }
    let files_a = list_files(a)?;
    if files_a != list_files(b)? {
        return Ok(false);
    }
    for rel in &files_a {
        if !files_identical(&a.join(rel), &b.join(rel))? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Every regular file under `dir`, relative to it, sorted.
///
/// # Errors
///
/// Returns an error if a directory cannot be read.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    walk(dir, dir, &mut Vec::new(), &mut |rel, is_dir| {
        if !is_dir {
            out.push(rel.to_path_buf());
        }
    })?;
    out.sort();
    Ok(out)
}

/// Every file and directory under `dir`, relative to it, sorted.
///
/// # Errors
///
/// Returns an error if a directory cannot be read.
pub fn list_tree(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    walk(dir, dir, &mut Vec::new(), &mut |rel, _| {
        out.push(rel.to_path_buf());
    })?;
    out.sort();
    Ok(out)
}

fn walk(
    base: &Path,
    dir: &Path,
    ancestors: &mut Vec<PathBuf>,
    visit: &mut dyn FnMut(&Path, bool),
) -> Result<()> {
    enter(dir, ancestors)?;
    for entry in
        std::fs::read_dir(dir).with_context(|| format!("reading directory {}", dir.display()))?
    {
        let entry = entry.with_context(|| format!("reading entry in {}", dir.display()))?;
        let path = entry.path();
        let rel = path.strip_prefix(base).unwrap_or(&path);
        let is_dir = path.is_dir();
        visit(rel, is_dir);
        if is_dir {
            walk(base, &path, ancestors, visit)?;
        }
    }
    ancestors.pop();
    Ok(())
}

/// `"1 file"`, `"3 files"`.
#[must_use]
pub fn file_count(files: usize) -> String {
    if files == 1 {
        "1 file".to_string()
    } else {
        format!("{files} files")
    }
}

/// Format a byte count the way `ls -lh` does: `512B`, `1.5K`, `2.0M`, `1.1G`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 3] = ["K", "M", "G"];
    if bytes < 1024 {
        return format!("{bytes}B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = "K";
    for next in UNITS.iter().skip(1) {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = next;
    }
    format!("{value:.1}{unit}")
}
