//! Domain-specific error types for the dotfiles engine.
//!
//! Internal modules return typed errors while command handlers at the CLI
//! boundary convert them to [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! DotfilesError
//! ├── Precondition(PreconditionError)   fatal checks that abort a run
//! └── Fetch(FetchError)                 archive download and extraction
//! ```
//!
//! Missing configuration items are never errors: they are reported as
//! warnings and skipped entries in the run summary.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the dotfiles engine.
#[derive(Error, Debug)]
pub enum DotfilesError {
    /// A fatal precondition was not met.
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    /// The configuration archive could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Fatal precondition failures. Each aborts the run with a non-zero exit.
#[derive(Error, Debug)]
pub enum PreconditionError {
    /// The host is not macOS.
    #[error("unsupported platform '{platform}': this setup only runs on macOS")]
    UnsupportedPlatform {
        /// Name of the detected platform.
        platform: String,
    },

    /// The extracted archive did not contain a `config` subtree.
    #[error("archive does not contain a config directory (looked in {})", .path.display())]
    MissingConfigSubtree {
        /// Directory that was searched.
        path: PathBuf,
    },

    /// The Xcode Command Line Tools were missing and their installer was
    /// started; the operator must finish it and re-run setup.
    #[error(
        "Xcode Command Line Tools are being installed; finish the installer dialog, then run setup again"
    )]
    ToolchainPending,

    /// The configuration set directory does not exist.
    #[error("configuration set not found at {}", .path.display())]
    ConfigSetMissing {
        /// Expected location of the configuration set.
        path: PathBuf,
    },

    /// The user's home directory could not be determined.
    #[error("cannot determine the home directory")]
    HomeNotFound,
}

/// Errors raised while fetching the configuration archive.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The HTTP request failed or returned an error status.
    #[error("failed to download {url}: {source}")]
    Download {
        /// URL that was requested.
        url: String,
        /// Underlying HTTP error.
        source: Box<ureq::Error>,
    },

    /// Writing the downloaded archive to disk failed.
    #[error("failed to write archive to {}: {source}", .path.display())]
    Write {
        /// Destination file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The archive could not be unpacked.
    #[error("failed to extract {}: {reason}", .archive.display())]
    Extract {
        /// Archive file that was being unpacked.
        archive: PathBuf,
        /// Human-readable reason.
        reason: String,
    },
}
