//! Command: capture live configuration into the configuration set.
//!
//! Every stored item is replaced wholesale, never merged, so files deleted
//! from the live system disappear from the configuration set too.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use serde::Serialize;

use crate::cli::GlobalOpts;
use crate::config::Layout;
use crate::config::inventory::{ConfigItem, INVENTORY, ItemKind, ProfileKind};
use crate::logging::{Log, Logger, TaskStatus};
use crate::resources::helpers::fs::{self, file_count};

/// What happened to one item during backup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BackupOutcome {
    /// The stored copy was replaced.
    Saved {
        /// Number of regular files now stored for the item.
        files: usize,
    },
    /// Nothing was found on the live system; the stored copy is untouched.
    Missing,
    /// Dry run: the item would have been saved.
    DryRun,
}

/// Backup result for one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemBackup {
    /// Item name.
    pub name: &'static str,
    /// What happened.
    #[serde(flatten)]
    pub outcome: BackupOutcome,
}

/// Result of a backup run, one entry per inventory item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BackupReport {
    /// Per-item results in inventory order.
    pub items: Vec<ItemBackup>,
}

impl BackupReport {
    /// Number of items whose stored copy was replaced.
    #[must_use]
    pub fn saved(&self) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(i.outcome, BackupOutcome::Saved { .. }))
            .count()
    }

    /// Number of items not found on the live system.
    #[must_use]
    pub fn missing(&self) -> usize {
        self.items
            .iter()
            .filter(|i| i.outcome == BackupOutcome::Missing)
            .count()
    }

    /// Outcome for the named item.
    #[must_use]
    pub fn outcome(&self, name: &str) -> Option<&BackupOutcome> {
        self.items
            .iter()
            .find(|i| i.name == name)
            .map(|i| &i.outcome)
    }
}

/// Run the backup command.
///
/// # Errors
///
/// Returns an error if the home directory is unknown or a filesystem
/// operation fails.
pub fn run(global: &GlobalOpts, log: &Arc<Logger>) -> Result<()> {
    let home = super::resolve_home()?;
    let root = super::resolve_root(global, &home);
    let layout = Layout::new(root, home);

    let report = backup(&layout, global.dry_run, log.as_ref())?;
    log.print_summary();
    log.debug(&format!(
        "{} saved, {} missing",
        report.saved(),
        report.missing()
    ));
    Ok(())
}

/// Back up every inventory item from the live system into the configuration
/// set.
///
/// Missing live items are warned about and skipped. Any filesystem failure
/// aborts the run.
///
/// # Errors
///
/// Returns an error if the configuration set cannot be created or an item
/// cannot be copied.
pub fn backup(layout: &Layout, dry_run: bool, log: &dyn Log) -> Result<BackupReport> {
    let config_set = layout.config_set();
    log.stage(&format!("Backing up to {}", config_set.display()));
    if !dry_run {
        std::fs::create_dir_all(&config_set)
            .with_context(|| format!("creating {}", config_set.display()))?;
    }

    let mut report = BackupReport::default();
    for item in INVENTORY {
        let outcome = if item.kind == ItemKind::TerminalProfiles {
            backup_terminal(layout, item, dry_run, log)?
        } else {
            backup_item(layout, item, dry_run, log)?
        };
        let (status, message) = match &outcome {
            BackupOutcome::Saved { files } => (TaskStatus::Ok, Some(file_count(*files))),
            BackupOutcome::Missing => (TaskStatus::Skipped, Some("not found".to_string())),
            BackupOutcome::DryRun => (TaskStatus::DryRun, None),
        };
        log.record_task(item.name, status, message.as_deref());
        report.items.push(ItemBackup {
            name: item.name,
            outcome,
        });
    }
    Ok(report)
}

/// Whether `live` and `stored` are the same place on disk, or one contains
/// the other.
///
/// Copying such an item onto itself empties the stored copy.
fn overlaps_stored(live: &Path, stored: &Path) -> bool {
    match (dunce::canonicalize(live), dunce::canonicalize(stored)) {
        (Ok(live), Ok(stored)) => live.starts_with(&stored) || stored.starts_with(&live),
        _ => false,
    }
}

fn backup_item(
    layout: &Layout,
    item: &ConfigItem,
    dry_run: bool,
    log: &dyn Log,
) -> Result<BackupOutcome> {
    let live = layout.live_path(item);
    let stored = layout.stored_path(item);
    let present = if item.kind.is_dir() {
        live.is_dir()
    } else {
        live.is_file()
    };
    if !present {
        log.warn(&format!("{}: not found at {}", item.name, live.display()));
        return Ok(BackupOutcome::Missing);
    }

    if dry_run {
        log.dry_run(&format!(
            "would back up {} -> {}",
            live.display(),
            stored.display()
        ));
        return Ok(BackupOutcome::DryRun);
    }

    if overlaps_stored(&live, &stored) {
        log.warn(&format!(
            "{}: {} resolves into the configuration set, leaving {} as is",
            item.name,
            live.display(),
            stored.display()
        ));
        let files = if item.kind.is_dir() {
            fs::list_files(&stored)?.len()
        } else {
            1
        };
        return Ok(BackupOutcome::Saved { files });
    }

    let files = if item.kind.is_dir() {
        fs::replace_dir(&live, &stored, true)?;
        fs::list_files(&stored)?.len()
    } else {
        fs::replace_file(&live, &stored)?;
        1
    };
    log.info(&format!("{}: backed up {}", item.name, file_count(files)));
    Ok(BackupOutcome::Saved { files })
}

/// Color schemes and profiles found in the terminal search directories.
///
/// Directories are visited in precedence order (lowest first) and files
/// within one directory by name, so when two directories hold a file with
/// the same name the later one appears later in the list.
///
/// # Errors
///
/// Returns an error if a search directory exists but cannot be read.
pub fn gather_terminal_files(layout: &Layout) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for dir in layout.terminal_search_dirs() {
        if !dir.is_dir() {
            continue;
        }
        let mut matches = Vec::new();
        for entry in
            std::fs::read_dir(&dir).with_context(|| format!("reading directory {}", dir.display()))?
        {
            let path = entry
                .with_context(|| format!("reading entry in {}", dir.display()))?
                .path();
            if path.is_file() && ProfileKind::classify(&path).is_some() {
                matches.push(path);
            }
        }
        matches.sort();
        found.extend(matches);
    }
    Ok(found)
}

fn backup_terminal(
    layout: &Layout,
    item: &ConfigItem,
    dry_run: bool,
    log: &dyn Log,
) -> Result<BackupOutcome> {
    let sources = gather_terminal_files(layout)?;
    if sources.is_empty() {
        log.warn(&format!(
            "{}: no color schemes or profiles found",
            item.name
        ));
        return Ok(BackupOutcome::Missing);
    }

    let stored = layout.stored_path(item);
    if dry_run {
        for source in &sources {
            log.dry_run(&format!("would back up {}", source.display()));
        }
        return Ok(BackupOutcome::DryRun);
    }

    // A search directory may be a link to the stored copy itself, so the
    // matches are staged before the stored directory is removed.
    let staging = tempfile::Builder::new()
        .prefix("dotfiles-iterm2-")
        .tempdir()
        .context("creating staging directory")?;
    for source in &sources {
        copy_into(source, staging.path())?;
    }
    fs::replace_dir(staging.path(), &stored, false)?;
    let files = fs::list_files(&stored)?.len();
    log.info(&format!("{}: backed up {}", item.name, file_count(files)));
    Ok(BackupOutcome::Saved { files })
}

fn copy_into(source: &Path, dir: &Path) -> Result<()> {
    let Some(name) = source.file_name() else {
        return Ok(());
    };
    let dest = dir.join(name);
    std::fs::copy(source, &dest)
        .with_context(|| format!("copying {} to {}", source.display(), dest.display()))?;
    Ok(())
}
