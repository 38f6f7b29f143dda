//! Recording executor shared by resource and task unit tests.
use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::{Result, bail};

use crate::exec::{ExecResult, Executor};

/// Executor answering from a queue of canned `(success, stdout)` responses.
///
/// Every call except [`Executor::which`] records `"program arg1 arg2"` and
/// takes the next response; an empty queue answers with a failure whose
/// stdout is `"unexpected call"`. Checked calls (`run`, `run_with_env`,
/// `run_interactive`) turn a failed response into an error. Programs marked
/// with [`MockExecutor::unstartable`] fail to spawn in every method.
#[derive(Debug, Default)]
pub struct MockExecutor {
    responses: Mutex<VecDeque<(bool, String)>>,
    calls: Mutex<Vec<String>>,
    on_path: bool,
    unstartable: Option<String>,
}

impl MockExecutor {
    /// One successful response.
    #[must_use]
    pub fn ok(stdout: &str) -> Self {
        Self::with_responses(vec![(true, stdout.to_string())])
    }

    /// One failed response.
    #[must_use]
    pub fn fail() -> Self {
        Self::with_responses(vec![(false, String::new())])
    }

    /// Responses consumed in order.
    #[must_use]
    pub fn with_responses(responses: Vec<(bool, String)>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            ..Self::default()
        }
    }

    /// Answer every [`Executor::which`] lookup with `found`.
    #[must_use]
    pub const fn with_which(mut self, found: bool) -> Self {
        self.on_path = found;
        self
    }

    /// Make every program whose path ends with `suffix` fail to spawn.
    #[must_use]
    pub fn unstartable(mut self, suffix: &str) -> Self {
        self.unstartable = Some(suffix.to_string());
        self
    }

    /// Commands issued so far.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Number of commands issued so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls().len()
    }

    fn spawn(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let line = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(line);
        }
        if self
            .unstartable
            .as_deref()
            .is_some_and(|suffix| program.ends_with(suffix))
        {
            bail!("cannot start {program}");
        }
        let (success, stdout) = self
            .responses
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front())
            .unwrap_or_else(|| (false, "unexpected call".to_string()));
        Ok(ExecResult {
            stdout,
            stderr: String::new(),
            success,
            code: Some(i32::from(!success)),
        })
    }

    fn respond_checked(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let result = self.spawn(program, args)?;
        if !result.success {
            bail!("mock command failed: {program}");
        }
        Ok(result)
    }
}

impl Executor for MockExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        self.respond_checked(program, args)
    }

    fn run_with_env(&self, program: &str, args: &[&str], _: &[(&str, &str)]) -> Result<ExecResult> {
        self.respond_checked(program, args)
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        self.spawn(program, args)
    }

    fn run_interactive(&self, program: &str, args: &[&str], _: &[(&str, &str)]) -> Result<()> {
        self.respond_checked(program, args).map(drop)
    }

    fn which(&self, _: &str) -> bool {
        self.on_path
    }
}
