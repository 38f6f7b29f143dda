//! Command: read-only audit of the configuration set.
//!
//! Every inventory item counts towards the total. An item passes when its
//! stored copy is present or when it is optional; structural checks are
//! reported but only the terminal profiles check can fail an item.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use serde::Serialize;

use crate::cli::{GlobalOpts, VerifyOpts};
use crate::config::Layout;
use crate::config::inventory::{ConfigItem, INVENTORY, ItemKind, ProfileKind, StructureCheck};
use crate::error::PreconditionError;
use crate::logging::{Log, Logger};
use crate::resources::helpers::fs;

/// Overall classification of a configuration set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Completeness {
    /// Every item passed.
    Complete,
    /// At least three quarters of the items passed.
    MostlyComplete,
    /// Fewer than three quarters of the items passed.
    Incomplete,
}

impl Completeness {
    /// Classify `passed` out of `total` items.
    ///
    /// An empty inventory is complete.
    #[must_use]
    pub fn classify(passed: u32, total: u32) -> Self {
        if passed >= total {
            Self::Complete
        } else if u64::from(passed) * 4 >= u64::from(total) * 3 {
            Self::MostlyComplete
        } else {
            Self::Incomplete
        }
    }

    /// Short label for console output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::MostlyComplete => "mostly complete",
            Self::Incomplete => "incomplete",
        }
    }

    /// What the operator should do next.
    #[must_use]
    pub const fn advice(self) -> &'static str {
        match self {
            Self::Complete => "Configuration set is ready to restore.",
            Self::MostlyComplete => {
                "Configuration set is usable; run backup again to capture the missing items."
            }
            Self::Incomplete => {
                "Configuration set is missing required items; run backup on a configured machine before setup."
            }
        }
    }
}

/// Outcome of one structural check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    /// What was checked.
    pub description: String,
    /// Whether the check held.
    pub passed: bool,
}

/// Verification result for one inventory item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemReport {
    /// Item name.
    pub name: &'static str,
    /// File or directory.
    pub kind: ItemKind,
    /// Whether a missing copy lowers the score.
    pub required: bool,
    /// Whether the stored copy exists.
    pub present: bool,
    /// Whether the item counts as passed.
    pub passed: bool,
    /// File count for directories, size for files; `None` when absent.
    pub detail: Option<String>,
    /// Structural checks run against the stored copy.
    pub checks: Vec<CheckResult>,
}

/// Result of a verification pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    /// Per-item results in inventory order.
    pub items: Vec<ItemReport>,
    /// Number of items that passed.
    pub passed: u32,
    /// Number of items checked.
    pub total: u32,
    /// Every file and directory under the configuration set, relative to
    /// it, sorted.
    pub listing: Vec<PathBuf>,
}

impl VerifyReport {
    /// Fraction of items that passed, `1.0` for an empty inventory.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        f64::from(self.passed) / f64::from(self.total)
    }

    /// Classification of this report.
    #[must_use]
    pub fn completeness(&self) -> Completeness {
        Completeness::classify(self.passed, self.total)
    }

    /// Result for the named item.
    #[must_use]
    pub fn item(&self, name: &str) -> Option<&ItemReport> {
        self.items.iter().find(|i| i.name == name)
    }
}

/// JSON form of a report: the report plus its derived fields.
#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    report: &'a VerifyReport,
    ratio: f64,
    completeness: Completeness,
}

/// Run the verify command.
///
/// # Errors
///
/// Returns an error if the home directory is unknown, the configuration set
/// does not exist, or it cannot be read.
pub fn run(global: &GlobalOpts, opts: &VerifyOpts, log: &Arc<Logger>) -> Result<()> {
    let home = super::resolve_home()?;
    let root = super::resolve_root(global, &home);
    let layout = Layout::new(root, home);

    let report = verify(&layout)?;
    if opts.json {
        let json = serde_json::to_string_pretty(&JsonReport {
            report: &report,
            ratio: report.ratio(),
            completeness: report.completeness(),
        })
        .context("serializing verification report")?;
        print_json(&json);
    } else {
        print_report(&report, &layout, log.as_ref());
    }
    Ok(())
}

/// Audit the configuration set under `layout`.
///
/// # Errors
///
/// Returns [`PreconditionError::ConfigSetMissing`] if the configuration set
/// does not exist, or an error if it cannot be read.
pub fn verify(layout: &Layout) -> Result<VerifyReport> {
    let config_set = layout.config_set();
    if !config_set.is_dir() {
        return Err(PreconditionError::ConfigSetMissing { path: config_set }.into());
    }

    let mut items = Vec::with_capacity(INVENTORY.len());
    for item in INVENTORY {
        items.push(verify_item(&layout.stored_path(item), item)?);
    }

    let total = u32::try_from(items.len()).context("inventory too large")?;
    let passed = u32::try_from(items.iter().filter(|i| i.passed).count())
        .context("inventory too large")?;
    let listing = fs::list_tree(&config_set)?;

    Ok(VerifyReport {
        items,
        passed,
        total,
        listing,
    })
}

fn verify_item(stored: &Path, item: &ConfigItem) -> Result<ItemReport> {
    let present = if item.kind.is_dir() {
        stored.is_dir()
    } else {
        stored.is_file()
    };

    let mut report = ItemReport {
        name: item.name,
        kind: item.kind,
        required: item.required,
        present,
        passed: present || !item.required,
        detail: None,
        checks: Vec::new(),
    };
    if !present {
        return Ok(report);
    }

    report.detail = Some(if item.kind.is_dir() {
        let files = fs::list_files(stored)?.len();
        fs::file_count(files)
    } else {
        let meta = std::fs::metadata(stored)
            .with_context(|| format!("reading metadata of {}", stored.display()))?;
        fs::human_size(meta.len())
    });

    if let Some(check) = run_check(stored, item.check)? {
        if item.check == StructureCheck::TerminalProfiles && !check.passed {
            report.passed = false;
        }
        report.checks.push(check);
    }
    Ok(report)
}

fn run_check(stored: &Path, check: StructureCheck) -> Result<Option<CheckResult>> {
    let result = match check {
        StructureCheck::None => return Ok(None),
        StructureCheck::EntryPoint(names) => CheckResult {
            description: format!("has entry point ({})", names.join(" or ")),
            passed: names.iter().any(|n| stored.join(n).is_file()),
        },
        StructureCheck::ContainsExtension(exts) => CheckResult {
            description: format!(
                "contains {}",
                exts.iter()
                    .map(|e| format!("*.{e}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            passed: fs::list_files(stored)?
                .iter()
                .any(|f| has_extension(f, exts)),
        },
        StructureCheck::MinLines(min) => {
            let bytes = std::fs::read(stored)
                .with_context(|| format!("reading {}", stored.display()))?;
            let lines = String::from_utf8_lossy(&bytes).lines().count();
            CheckResult {
                description: format!("more than {min} lines ({lines})"),
                passed: lines > min,
            }
        }
        StructureCheck::TerminalProfiles => CheckResult {
            description: "contains a color scheme or profile".to_string(),
            passed: fs::list_files(stored)?
                .iter()
                .any(|f| ProfileKind::classify(f).is_some()),
        },
    };
    Ok(Some(result))
}

fn has_extension(path: &Path, exts: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| exts.iter().any(|x| e.eq_ignore_ascii_case(x)))
}

#[allow(clippy::print_stdout)]
fn print_json(json: &str) {
    println!("{json}");
}

fn print_report(report: &VerifyReport, layout: &Layout, log: &dyn Log) {
    log.stage(&format!(
        "Verifying {}",
        layout.config_set().display()
    ));
    for item in &report.items {
        let mark = if item.passed { "✓" } else { "✗" };
        let line = match (&item.detail, item.required) {
            (Some(detail), _) => format!("{mark} {} ({detail})", item.name),
            (None, true) => format!("{mark} {} missing", item.name),
            (None, false) => format!("{mark} {} not present (optional)", item.name),
        };
        if item.present || !item.required {
            log.info(&line);
        } else {
            log.warn(&line);
        }
        for check in &item.checks {
            if check.passed {
                log.info(&format!("    {}", check.description));
            } else {
                log.warn(&format!("{}: fails check: {}", item.name, check.description));
            }
        }
    }

    let completeness = report.completeness();
    log.stage(&format!(
        "{}/{} passed: {}",
        report.passed,
        report.total,
        completeness.label()
    ));
    if completeness == Completeness::Complete {
        log.info(completeness.advice());
    } else {
        log.warn(completeness.advice());
    }

    log.stage("Contents");
    for path in &report.listing {
        log.info(&path.display().to_string());
    }
}
