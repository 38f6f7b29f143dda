//! Check-then-apply primitives.
//!
//! A [`Resource`] reports how the system compares to what the configuration
//! set asks for, and can bring it into line. Tasks feed resources through
//! [`crate::tasks::process_resources`], which applies only what differs.
pub mod copy;
pub mod error;
pub mod helpers;
pub mod package;
#[cfg(test)]
pub mod test_helpers;

use anyhow::Result;

/// How a resource compares to its desired state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Nothing exists at the target.
    Missing,
    /// The target already matches.
    Correct,
    /// The target exists but differs.
    Incorrect {
        /// What differs.
        current: String,
    },
    /// The resource cannot be applied, e.g. its stored copy is absent.
    Invalid {
        /// Why it cannot be applied.
        reason: String,
    },
}

/// Something on the system that can be checked and brought into line.
pub trait Resource {
    /// Short human-readable form used in log lines.
    fn description(&self) -> String;

    /// Compare the system with the desired state.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be read (I/O failure, a command
    /// that cannot be spawned).
    fn current_state(&self) -> Result<ResourceState>;

    /// Bring the system to the desired state, creating parents as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if a copy or command fails.
    fn apply(&self) -> Result<()>;
}
