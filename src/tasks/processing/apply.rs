//! One resource through the check-then-apply cycle.
use anyhow::{Context as _, Result};

use super::TaskStats;
use super::context::Context;
use crate::resources::{Resource, ResourceState};

/// Check `resource` and apply it when it differs, returning its counts.
///
/// A resource that cannot be applied is warned about and counted as
/// skipped. In a dry run nothing is applied; a differing resource is logged
/// and counted as changed.
pub(super) fn process_one<R: Resource>(ctx: &Context, resource: &R, verb: &str) -> Result<TaskStats> {
    let desc = resource.description();
    let state = resource.current_state()?;
    ctx.log.debug(&format!("{desc}: {state:?}"));

    let mut delta = TaskStats::new();
    match state {
        ResourceState::Correct => delta.already_ok += 1,
        ResourceState::Invalid { reason } => {
            ctx.log.warn(&format!("skipping {desc}: {reason}"));
            delta.skipped += 1;
        }
        ResourceState::Missing if ctx.dry_run => {
            ctx.log.dry_run(&format!("would {verb} {desc}"));
            delta.changed += 1;
        }
        ResourceState::Incorrect { current } if ctx.dry_run => {
            ctx.log.dry_run(&format!("would {verb} {desc} ({current})"));
            delta.changed += 1;
        }
        ResourceState::Missing | ResourceState::Incorrect { .. } => {
            resource
                .apply()
                .with_context(|| format!("failed to {verb} {desc}"))?;
            ctx.log.info(&format!("{verb}: {desc}"));
            delta.changed += 1;
        }
    }
    Ok(delta)
}
