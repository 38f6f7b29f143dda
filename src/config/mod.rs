//! Compiled-in configuration: the item inventory, package lists, and the
//! [`Layout`] that maps both onto concrete directories.
pub mod inventory;
pub mod packages;

use std::path::{Path, PathBuf};

use inventory::{ConfigItem, ProfileKind, TERMINAL_SEARCH_PRECEDENCE};

/// Name of the configuration set directory under the repository root.
pub const CONFIG_SET_DIR: &str = "config";

/// Explicit base directories for every path the engine touches.
///
/// All path composition is a pure function of the repository root and the
/// home directory held here; nothing depends on the process working
/// directory.
///
/// # Examples
///
/// ```
/// use dotfiles_macos::config::{Layout, inventory};
/// use std::path::PathBuf;
///
/// let layout = Layout::new("/repo", "/Users/me");
/// let zshrc = inventory::find("zshrc").unwrap();
/// assert_eq!(layout.stored_path(zshrc), PathBuf::from("/repo/config/zshrc"));
/// assert_eq!(layout.live_path(zshrc), PathBuf::from("/Users/me/.zshrc"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
    home: PathBuf,
}

impl Layout {
    /// Create a layout from a repository root and a home directory.
    pub fn new(root: impl Into<PathBuf>, home: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            home: home.into(),
        }
    }

    /// Repository root (parent of the configuration set).
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// User home directory.
    #[must_use]
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// The configuration set directory.
    #[must_use]
    pub fn config_set(&self) -> PathBuf {
        self.root.join(CONFIG_SET_DIR)
    }

    /// Where `item` is kept inside the configuration set.
    #[must_use]
    pub fn stored_path(&self, item: &ConfigItem) -> PathBuf {
        self.config_set().join(item.stored)
    }

    /// Where `item` lives on the system.
    #[must_use]
    pub fn live_path(&self, item: &ConfigItem) -> PathBuf {
        self.home.join(item.live)
    }

    /// Terminal profile search directories, lowest precedence first.
    #[must_use]
    pub fn terminal_search_dirs(&self) -> Vec<PathBuf> {
        TERMINAL_SEARCH_PRECEDENCE
            .iter()
            .map(|dir| self.home.join(dir))
            .collect()
    }

    /// Live directory that receives restored files of `kind`.
    #[must_use]
    pub fn terminal_live_dir(&self, kind: ProfileKind) -> PathBuf {
        self.home.join(kind.live_dir())
    }

    /// The user's shell profile.
    #[must_use]
    pub fn shell_profile(&self) -> PathBuf {
        self.home.join(".zshrc")
    }
}
