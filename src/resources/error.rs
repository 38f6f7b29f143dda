//! Errors raised while checking or applying a resource.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that arise from resource checks and apply operations.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// A program run on behalf of a resource exited non-zero.
    #[error("{program} exited with {exit_code}: {stderr}")]
    CommandFailed {
        /// Name of the program that was invoked.
        program: String,
        /// Exit code returned by the process.
        exit_code: i32,
        /// Captured standard error output.
        stderr: String,
    },

    /// The stored copy a resource restores from does not exist.
    #[error("stored copy not found: {}", .path.display())]
    SourceMissing {
        /// Expected location of the stored copy.
        path: PathBuf,
    },

    /// The package manager could not be found on this system.
    #[error("{manager} not found on PATH or in any well-known location")]
    ManagerNotFound {
        /// Name of the package manager.
        manager: String,
    },
}
