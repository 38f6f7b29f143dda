//! Homebrew formulae and casks.
use anyhow::Result;

use super::{Context, Task, TaskResult, TaskStats};
use crate::config::packages::{CASKS, FORMULAE};
use crate::resources::error::ResourceError;
use crate::resources::package::{
    PackageKind, PackageResource, batch_install_packages, get_installed_packages,
};
use crate::resources::{Resource as _, ResourceState};

/// Check every package of `kind` with one query and install the missing
/// ones with one `brew install`.
fn install_packages(ctx: &Context, names: &[&str], kind: PackageKind) -> Result<TaskResult> {
    let Some(brew) = ctx.brew() else {
        if ctx.dry_run {
            ctx.log
                .dry_run(&format!("would install {} packages", names.len()));
            return Ok(TaskResult::DryRun);
        }
        return Err(ResourceError::ManagerNotFound {
            manager: "brew".to_string(),
        }
        .into());
    };

    ctx.log.debug(&format!(
        "batch-checking {} {kind} packages with a single query",
        names.len()
    ));
    let installed = get_installed_packages(kind, &brew, &*ctx.executor)?;

    let mut stats = TaskStats::new();
    let mut missing = Vec::new();
    for name in names {
        let resource = PackageResource::new(*name, kind, brew.as_str(), &*ctx.executor);
        if resource.state_from_installed(&installed) == ResourceState::Correct {
            ctx.log.debug(&format!("ok: {}", resource.description()));
            stats.already_ok += 1;
        } else {
            missing.push(resource);
        }
    }

    if !missing.is_empty() {
        let listed: Vec<&str> = missing.iter().map(|r| r.name.as_str()).collect();
        if ctx.dry_run {
            ctx.log
                .dry_run(&format!("would install: {}", listed.join(" ")));
        } else {
            ctx.log.info(&format!("installing: {}", listed.join(" ")));
            let refs: Vec<&PackageResource<'_>> = missing.iter().collect();
            batch_install_packages(&refs)?;
        }
        stats.changed += u32::try_from(missing.len()).unwrap_or(u32::MAX);
    }

    Ok(stats.finish(ctx))
}

/// Install the command-line formulae.
#[derive(Debug)]
pub struct InstallFormulae;

impl Task for InstallFormulae {
    fn name(&self) -> &'static str {
        "Install formulae"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.platform.is_macos()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        install_packages(ctx, FORMULAE, PackageKind::Formula)
    }
}

/// Install the font and terminal emulator casks.
#[derive(Debug)]
pub struct InstallCasks;

impl Task for InstallCasks {
    fn name(&self) -> &'static str {
        "Install casks"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.platform.is_macos()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        install_packages(ctx, CASKS, PackageKind::Cask)
    }
}
