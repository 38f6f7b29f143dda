//! Command-line argument definitions.
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI entry point for the macOS dotfiles tool.
#[derive(Parser, Debug)]
#[command(
    name = "dotfiles",
    about = "Set up a macOS machine and back up, restore, and verify its dotfiles",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Repository root (parent of the `config` directory)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch the repository archive, then run setup
    Bootstrap(BootstrapOpts),
    /// Install tooling and restore the configuration set
    Setup(SetupOpts),
    /// Capture live configuration into the configuration set
    Backup,
    /// Audit the configuration set for completeness
    Verify(VerifyOpts),
    /// Print version information
    Version,
}

impl Command {
    /// Name used for the per-command log file.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Bootstrap(_) => "bootstrap",
            Self::Setup(_) => "setup",
            Self::Backup => "backup",
            Self::Verify(_) => "verify",
            Self::Version => "version",
        }
    }
}

/// Options for the `bootstrap` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct BootstrapOpts {
    /// Archive to fetch (defaults to $DOTFILES_ARCHIVE_URL, then the built-in URL)
    #[arg(long)]
    pub archive_url: Option<String>,

    /// Never offer to start a new shell
    #[arg(long)]
    pub no_shell: bool,
}

/// Options for the `setup` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct SetupOpts {
    /// Archive fetched when the configuration set is missing
    #[arg(long)]
    pub archive_url: Option<String>,

    /// Never offer to start a new shell
    #[arg(long)]
    pub no_shell: bool,
}

/// Options for the `verify` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct VerifyOpts {
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn every_entry_point_parses_without_flags() {
        for (arg, name) in [
            ("bootstrap", "bootstrap"),
            ("setup", "setup"),
            ("backup", "backup"),
            ("verify", "verify"),
            ("version", "version"),
        ] {
            let cli = Cli::parse_from(["dotfiles", arg]);
            assert_eq!(cli.command.name(), name);
            assert!(!cli.global.dry_run);
            assert!(cli.global.root.is_none());
        }
    }

    #[test]
    fn parse_dry_run_short() {
        let cli = Cli::parse_from(["dotfiles", "-d", "backup"]);
        assert!(cli.global.dry_run);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["dotfiles", "setup", "--dry-run", "-v", "--root", "/r"]);
        assert!(cli.global.dry_run);
        assert!(cli.verbose);
        assert_eq!(cli.global.root, Some(PathBuf::from("/r")));
    }

    #[test]
    fn parse_setup_options() {
        let cli = Cli::parse_from([
            "dotfiles",
            "setup",
            "--no-shell",
            "--archive-url",
            "https://example.com/a.tar.gz",
        ]);
        let Command::Setup(opts) = cli.command else {
            panic!("expected setup");
        };
        assert!(opts.no_shell);
        assert_eq!(
            opts.archive_url.as_deref(),
            Some("https://example.com/a.tar.gz")
        );
    }

    #[test]
    fn parse_verify_json() {
        let cli = Cli::parse_from(["dotfiles", "verify", "--json"]);
        assert!(matches!(cli.command, Command::Verify(VerifyOpts { json: true })));
    }
}
