//! External command execution behind an injectable [`Executor`].
use anyhow::{Context, Result, bail};
use std::process::{Command, Output, Stdio};

/// Result of a command execution.
#[derive(Debug, Clone)]
pub struct ExecResult {
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, if the process was not killed by a signal.
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Runs external programs.
///
/// Every tool the engine drives (brew, xcode-select, tar, zsh, installers)
/// goes through this trait so tasks can be exercised against a mock.
pub trait Executor: Send + Sync + std::fmt::Debug {
    /// Run a command and capture its output. Fails if the command exits non-zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned or exits non-zero.
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run a command with extra environment variables. Fails on non-zero exit.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned or exits non-zero.
    fn run_with_env(&self, program: &str, args: &[&str], env: &[(&str, &str)])
    -> Result<ExecResult>;

    /// Run a command, allowing failure (returns the result without bailing).
    ///
    /// # Errors
    ///
    /// Returns an error only if the program cannot be spawned.
    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run a command attached to the terminal (inherited stdio) so it can
    /// prompt for passwords or show progress. Fails on non-zero exit.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned or exits non-zero.
    fn run_interactive(&self, program: &str, args: &[&str], env: &[(&str, &str)]) -> Result<()>;

    /// Check if a program is available on `PATH`.
    fn which(&self, program: &str) -> bool;
}

/// [`Executor`] backed by [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl ExecResult {
    /// Exit code for messages, `-1` when the process died from a signal.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        self.code.unwrap_or(-1)
    }

    /// Turn a non-zero exit into an error naming `program`.
    fn checked(self, program: &str) -> Result<Self> {
        if !self.success {
            bail!(
                "{program} exited with {}: {}",
                self.exit_code(),
                self.stderr.trim()
            );
        }
        Ok(self)
    }
}

fn command(program: &str, args: &[&str], env: &[(&str, &str)]) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(args).envs(env.iter().copied());
    cmd
}

fn capture(program: &str, args: &[&str], env: &[(&str, &str)]) -> Result<ExecResult> {
    command(program, args, env)
        .output()
        .map(ExecResult::from)
        .with_context(|| format!("cannot start {program}"))
}

impl Executor for SystemExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        capture(program, args, &[])?.checked(program)
    }

    fn run_with_env(
        &self,
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> Result<ExecResult> {
        capture(program, args, env)?.checked(program)
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        capture(program, args, &[])
    }

    fn run_interactive(&self, program: &str, args: &[&str], env: &[(&str, &str)]) -> Result<()> {
        let status = command(program, args, env)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .with_context(|| format!("cannot start {program}"))?;
        if !status.success() {
            bail!("{program} exited with {}", status.code().unwrap_or(-1));
        }
        Ok(())
    }

    fn which(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

/// Replace the current process image with `program`.
///
/// Only returns when the replacement failed; the returned error describes why.
#[cfg(unix)]
#[must_use]
pub fn replace_process(program: &str, args: &[&str]) -> anyhow::Error {
    use std::os::unix::process::CommandExt as _;
    let err = Command::new(program).args(args).exec();
    anyhow::Error::new(err).context(format!("failed to exec {program}"))
}

/// Replace the current process image with `program`.
#[cfg(not(unix))]
#[must_use]
pub fn replace_process(program: &str, _args: &[&str]) -> anyhow::Error {
    anyhow::anyhow!("cannot exec {program}: process replacement requires a Unix host")
}
