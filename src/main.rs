//! `dotfiles` binary: macOS setup and dotfiles backup.
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use dotfiles_macos::cli::{Cli, Command};
use dotfiles_macos::commands;
use dotfiles_macos::exec::{Executor, SystemExecutor};
use dotfiles_macos::logging::{self, Logger};

fn main() -> Result<()> {
    let args = Cli::parse();
    if matches!(args.command, Command::Version) {
        commands::version::run();
        return Ok(());
    }

    let name = args.command.name();
    logging::init_subscriber(args.verbose, name);
    let log = Arc::new(Logger::new(name));
    let executor: Arc<dyn Executor> = Arc::new(SystemExecutor);

    match &args.command {
        Command::Bootstrap(opts) => commands::bootstrap::run(&args.global, opts, &log, executor),
        Command::Setup(opts) => commands::setup::run(&args.global, opts, &log, executor),
        Command::Backup => commands::backup::run(&args.global, &log),
        Command::Verify(opts) => commands::verify::run(&args.global, opts, &log),
        Command::Version => Ok(()),
    }
}
