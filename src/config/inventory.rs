//! The compiled-in configuration inventory.
//!
//! Every item the engine backs up, restores, or audits is listed in
//! [`INVENTORY`]. Paths are relative: stored paths to the configuration set,
//! live paths to the user's home directory. See [`super::Layout`] for the
//! functions that turn them into absolute paths.
use std::path::Path;

/// Whether an item is a single file or a directory tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// A single regular file.
    File,
    /// A directory copied recursively.
    Directory,
    /// The terminal emulator's color schemes and profiles.
    ///
    /// Stored as a flat directory; live files are gathered from
    /// [`TERMINAL_SEARCH_PRECEDENCE`] on backup and split by
    /// [`ProfileKind`] on restore.
    TerminalProfiles,
}

impl ItemKind {
    /// Whether the stored form of this item is a directory.
    #[must_use]
    pub const fn is_dir(self) -> bool {
        matches!(self, Self::Directory | Self::TerminalProfiles)
    }
}

/// Structural sanity check applied to a stored item by Verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureCheck {
    /// No extra check.
    None,
    /// The directory must contain one of these files at its top level.
    EntryPoint(&'static [&'static str]),
    /// The directory must contain at least one file with one of these
    /// extensions, searched recursively.
    ContainsExtension(&'static [&'static str]),
    /// The file must have strictly more lines than this.
    MinLines(usize),
    /// The directory must contain at least one color scheme or profile file.
    /// Unlike the other checks, failing this one fails the item.
    TerminalProfiles,
}

/// One logical configuration unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigItem {
    /// Identifier shown in status lines.
    pub name: &'static str,
    /// Live location, relative to the home directory.
    pub live: &'static str,
    /// Location inside the configuration set.
    pub stored: &'static str,
    /// File or directory.
    pub kind: ItemKind,
    /// Whether a missing stored copy lowers the Verify score.
    pub required: bool,
    /// Extra structural check run by Verify.
    pub check: StructureCheck,
}

/// Sub-kinds of files kept in the terminal profiles item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    /// `*.itermcolors` color preset.
    ColorScheme,
    /// `*.json` dynamic profile descriptor.
    Profile,
}

impl ProfileKind {
    /// All sub-kinds.
    pub const ALL: [Self; 2] = [Self::ColorScheme, Self::Profile];

    /// File extension (without the dot) identifying this sub-kind.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::ColorScheme => "itermcolors",
            Self::Profile => "json",
        }
    }

    /// Live directory files of this sub-kind are restored into, relative to home.
    #[must_use]
    pub const fn live_dir(self) -> &'static str {
        match self {
            Self::ColorScheme => "Library/Application Support/iTerm2/ColorPresets",
            Self::Profile => "Library/Application Support/iTerm2/DynamicProfiles",
        }
    }

    /// Classify a file by its extension (case-insensitive).
    #[must_use]
    pub fn classify(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::ALL
            .into_iter()
            .find(|kind| ext.eq_ignore_ascii_case(kind.extension()))
    }
}

/// Directories searched for terminal profile files during backup, relative
/// to home, lowest precedence first.
///
/// Every match in every directory is copied into the same stored directory,
/// so when two directories hold a file with the same name the one from the
/// later directory wins.
pub const TERMINAL_SEARCH_PRECEDENCE: &[&str] = &[
    ".config/iterm2",
    "Library/Application Support/iTerm2/ColorPresets",
    "Library/Application Support/iTerm2/DynamicProfiles",
];

/// Name of the terminal profiles item.
pub const TERMINAL_ITEM: &str = "iterm2";

/// The fixed inventory, in processing order.
pub const INVENTORY: &[ConfigItem] = &[
    ConfigItem {
        name: "nvim",
        live: ".config/nvim",
        stored: "nvim",
        kind: ItemKind::Directory,
        required: true,
        check: StructureCheck::EntryPoint(&["init.lua", "init.vim"]),
    },
    ConfigItem {
        name: "tmux",
        live: ".config/tmux",
        stored: "tmux",
        kind: ItemKind::Directory,
        required: true,
        check: StructureCheck::ContainsExtension(&["conf"]),
    },
    ConfigItem {
        name: "omp",
        live: ".config/omp",
        stored: "omp",
        kind: ItemKind::Directory,
        required: true,
        check: StructureCheck::ContainsExtension(&["json", "toml", "yaml", "yml"]),
    },
    ConfigItem {
        name: "zshrc",
        live: ".zshrc",
        stored: "zshrc",
        kind: ItemKind::File,
        required: true,
        check: StructureCheck::MinLines(10),
    },
    ConfigItem {
        name: "gitconfig",
        live: ".gitconfig",
        stored: "gitconfig",
        kind: ItemKind::File,
        required: false,
        check: StructureCheck::None,
    },
    ConfigItem {
        name: "ssh_config",
        live: ".ssh/config",
        stored: "ssh_config",
        kind: ItemKind::File,
        required: false,
        check: StructureCheck::None,
    },
    ConfigItem {
        name: "tmux.conf",
        live: ".tmux.conf",
        stored: "tmux.conf",
        kind: ItemKind::File,
        required: false,
        check: StructureCheck::None,
    },
    ConfigItem {
        name: TERMINAL_ITEM,
        live: "Library/Application Support/iTerm2",
        stored: "iterm2",
        kind: ItemKind::TerminalProfiles,
        required: false,
        check: StructureCheck::TerminalProfiles,
    },
];

/// Look up an item by name.
#[must_use]
pub fn find(name: &str) -> Option<&'static ConfigItem> {
    INVENTORY.iter().find(|item| item.name == name)
}

/// Items restored by a plain stored → live copy (everything except the
/// terminal profiles).
pub fn copy_items() -> impl Iterator<Item = &'static ConfigItem> {
    INVENTORY
        .iter()
        .filter(|item| item.kind != ItemKind::TerminalProfiles)
}
