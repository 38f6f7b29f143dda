//! Homebrew package resource.
use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;

use super::error::ResourceError;
use super::{Resource, ResourceState};
use crate::config::packages::{HOMEBREW_PATHS, short_name};
use crate::exec::Executor;

/// Kinds of Homebrew package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageKind {
    /// Command-line formula.
    Formula,
    /// Application or font cask.
    Cask,
}

impl PackageKind {
    /// The `brew` flag selecting this kind.
    #[must_use]
    pub const fn flag(self) -> &'static str {
        match self {
            Self::Formula => "--formula",
            Self::Cask => "--cask",
        }
    }
}

impl std::fmt::Display for PackageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Formula => write!(f, "formula"),
            Self::Cask => write!(f, "cask"),
        }
    }
}

/// Find the `brew` program.
///
/// Returns `"brew"` when it is on `PATH`, otherwise the first well-known
/// install location that exists, otherwise `None`.
#[must_use]
pub fn locate_brew(executor: &dyn Executor) -> Option<String> {
    if executor.which("brew") {
        return Some("brew".to_string());
    }
    HOMEBREW_PATHS
        .iter()
        .find(|path| Path::new(path).is_file())
        .map(|path| (*path).to_string())
}

/// A Homebrew package that can be checked and installed.
#[derive(Debug)]
pub struct PackageResource<'a> {
    /// Package name, possibly tap-qualified (`user/tap/name`).
    pub name: String,
    /// Formula or cask.
    pub kind: PackageKind,
    /// Program used to invoke Homebrew.
    brew: String,
    /// Executor for running `brew`.
    executor: &'a dyn Executor,
}

impl<'a> PackageResource<'a> {
    /// Create a new package resource.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        kind: PackageKind,
        brew: impl Into<String>,
        executor: &'a dyn Executor,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            brew: brew.into(),
            executor,
        }
    }

    /// Determine the resource state from a pre-fetched set of installed names.
    ///
    /// Tap-qualified names are matched by their final segment, which is how
    /// `brew list` prints them.
    #[must_use]
    pub fn state_from_installed(&self, installed: &HashSet<String>) -> ResourceState {
        if installed.contains(short_name(&self.name)) {
            ResourceState::Correct
        } else {
            ResourceState::Missing
        }
    }
}

/// Query the full set of installed package names of one kind.
///
/// Runs a single `brew list <flag> -1` regardless of how many packages need
/// checking. A failing listing yields an empty set so every package is
/// treated as missing.
///
/// # Errors
///
/// Returns an error if `brew` cannot be spawned.
pub fn get_installed_packages(
    kind: PackageKind,
    brew: &str,
    executor: &dyn Executor,
) -> Result<HashSet<String>> {
    let result = executor.run_unchecked(brew, &["list", kind.flag(), "-1"])?;
    let mut set = HashSet::new();
    if result.success {
        for line in result.stdout.lines() {
            let name = line.trim();
            if !name.is_empty() {
                set.insert(name.to_string());
            }
        }
    }
    Ok(set)
}

/// Install a batch of packages with one `brew install` per kind.
///
/// # Errors
///
/// Returns [`ResourceError::CommandFailed`] if an install command exits
/// non-zero, or an I/O error if `brew` cannot be spawned.
pub fn batch_install_packages(resources: &[&PackageResource<'_>]) -> Result<()> {
    for kind in [PackageKind::Formula, PackageKind::Cask] {
        let group: Vec<&&PackageResource<'_>> =
            resources.iter().filter(|r| r.kind == kind).collect();
        let Some(first) = group.first() else {
            continue;
        };
        let mut args = vec!["install"];
        if kind == PackageKind::Cask {
            args.push(kind.flag());
        }
        args.extend(group.iter().map(|r| r.name.as_str()));
        install(first.executor, &first.brew, &args)?;
    }
    Ok(())
}

fn install(executor: &dyn Executor, brew: &str, args: &[&str]) -> Result<()> {
    let result = executor.run_unchecked(brew, args)?;
    if result.success {
        return Ok(());
    }
    Err(ResourceError::CommandFailed {
        program: brew.to_string(),
        exit_code: result.exit_code(),
        stderr: result.stderr.trim().to_string(),
    }
    .into())
}

impl Resource for PackageResource<'_> {
    fn description(&self) -> String {
        format!("{} ({})", self.name, self.kind)
    }

    fn current_state(&self) -> Result<ResourceState> {
        let result = self.executor.run_unchecked(
            &self.brew,
            &["list", self.kind.flag(), short_name(&self.name)],
        )?;
        if result.success {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Missing)
        }
    }

    fn apply(&self) -> Result<()> {
        let mut args = vec!["install"];
        if self.kind == PackageKind::Cask {
            args.push(self.kind.flag());
        }
        args.push(&self.name);
        install(self.executor, &self.brew, &args)
    }
}
