// Shared helpers for integration tests.
//
// Provides a temporary home directory and repository root with a fluent
// builder for the configuration set, plus a scripted executor that behaves
// like a macOS host with Homebrew and every package already installed.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Result, bail};
use dotfiles_macos::config::Layout;
use dotfiles_macos::config::packages::{CASKS, FORMULAE, short_name};
use dotfiles_macos::exec::{ExecResult, Executor};
use dotfiles_macos::logging::{Log, Logger};
use dotfiles_macos::platform::{Os, Platform};
use dotfiles_macos::tasks::Context;

/// Twelve-line shell profile that satisfies the line-count check.
pub const ZSHRC: &str = "\
export EDITOR=nvim
export PAGER=less
alias vim=nvim
alias ll='eza -l'
alias la='eza -la'
alias gs='git status'
setopt autocd
setopt histignoredups
bindkey -e
eval \"$(zoxide init zsh)\"
eval \"$(oh-my-posh init zsh)\"
source <(fzf --zsh)
";

/// An isolated repository root and home directory backed by a
/// [`tempfile::TempDir`].
pub struct IntegrationTestContext {
    /// Temporary directory holding both `repo/` and `home/`.
    pub dir: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Create an empty repository root and home directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(dir.path().join("repo")).expect("create repo dir");
        std::fs::create_dir_all(dir.path().join("home")).expect("create home dir");
        Self { dir }
    }

    /// Layout over the temporary root and home.
    pub fn layout(&self) -> Layout {
        Layout::new(self.dir.path().join("repo"), self.dir.path().join("home"))
    }

    /// Path to the configuration set.
    pub fn config_set(&self) -> PathBuf {
        self.layout().config_set()
    }

    /// Path to the home directory.
    pub fn home(&self) -> PathBuf {
        self.dir.path().join("home")
    }

    /// A macOS context with a fresh logger and the given executor.
    pub fn context(&self, executor: Arc<dyn Executor>) -> (Context, Arc<Logger>) {
        let log = Arc::new(Logger::new("test"));
        let ctx = Context::new(
            self.layout(),
            Platform::new(Os::MacOs),
            Arc::clone(&log) as Arc<dyn Log>,
            executor,
            false,
        );
        (ctx, log)
    }
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building a context with an empty root and home.
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext::new(),
        }
    }

    /// Store the four required items in the configuration set.
    pub fn with_required_items(self) -> Self {
        self.with_stored("nvim/init.lua", "require('opts')\n")
            .with_stored("nvim/lua/opts.lua", "vim.opt.number = true\n")
            .with_stored("tmux/tmux.conf", "set -g mouse on\n")
            .with_stored("omp/theme.omp.json", "{\"blocks\": []}\n")
            .with_stored("zshrc", ZSHRC)
    }

    /// Write `content` to `config/<rel>`.
    pub fn with_stored(self, rel: &str, content: &str) -> Self {
        write(&self.ctx.config_set().join(rel), content);
        self
    }

    /// Write `content` to `<home>/<rel>`.
    pub fn with_live(self, rel: &str, content: &str) -> Self {
        write(&self.ctx.home().join(rel), content);
        self
    }

    /// Finalise and return the context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}

/// Write `content` to `path`, creating parent directories.
pub fn write(path: &Path, content: &str) {
    std::fs::create_dir_all(path.parent().expect("path has parent")).expect("create parent");
    std::fs::write(path, content).expect("write file");
}

/// Executor that answers like a macOS host where Homebrew, the Xcode
/// Command Line Tools and every configured package are already installed.
///
/// Every invocation is recorded as `"program arg1 arg2"`.
#[derive(Debug, Default)]
pub struct InstalledHost {
    calls: Mutex<Vec<String>>,
    absent: Option<&'static str>,
}

impl InstalledHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Same host, except programs whose path ends with `suffix` cannot be
    /// started.
    pub fn without(suffix: &'static str) -> Arc<Self> {
        Arc::new(Self {
            absent: Some(suffix),
            ..Self::default()
        })
    }

    /// Every recorded invocation, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn answer(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let mut line = program.to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        self.calls.lock().expect("calls lock").push(line);
        if self.absent.is_some_and(|suffix| program.ends_with(suffix)) {
            bail!("cannot start {program}");
        }

        let stdout = match (program, args) {
            ("brew", ["list", "--formula", "-1"]) => listing(FORMULAE),
            ("brew", ["list", "--cask", "-1"]) => listing(CASKS),
            ("brew", ["--prefix"]) => "/opt/homebrew\n".to_string(),
            ("xcode-select", ["-p"]) => "/Library/Developer/CommandLineTools\n".to_string(),
            _ => String::new(),
        };
        Ok(ExecResult {
            stdout,
            stderr: String::new(),
            success: true,
            code: Some(0),
        })
    }
}

fn listing(names: &[&str]) -> String {
    names.iter().map(|n| format!("{}\n", short_name(n))).collect()
}

impl Executor for InstalledHost {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        self.answer(program, args)
    }

    fn run_with_env(
        &self,
        program: &str,
        args: &[&str],
        _env: &[(&str, &str)],
    ) -> Result<ExecResult> {
        self.answer(program, args)
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        self.answer(program, args)
    }

    fn run_interactive(&self, program: &str, args: &[&str], _env: &[(&str, &str)]) -> Result<()> {
        let result = self.answer(program, args)?;
        if !result.success {
            bail!("{program} failed");
        }
        Ok(())
    }

    fn which(&self, program: &str) -> bool {
        program == "brew"
    }
}
