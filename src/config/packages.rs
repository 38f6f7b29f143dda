//! Homebrew packages installed by setup.

/// Command-line formulae. Tap-qualified names (`user/tap/name`) are matched
/// against `brew list` output by their final segment.
pub const FORMULAE: &[&str] = &[
    "git",
    "neovim",
    "tmux",
    "fzf",
    "ripgrep",
    "fd",
    "bat",
    "eza",
    "zoxide",
    "jq",
    "lazygit",
    "jandedobbeleer/oh-my-posh/oh-my-posh",
];

/// Nerd font used by the prompt theme and editor.
pub const FONT_CASK: &str = "font-meslo-lg-nerd-font";

/// Terminal emulator application.
pub const TERMINAL_CASK: &str = "iterm2";

/// Casks installed after the formulae.
pub const CASKS: &[&str] = &[FONT_CASK, TERMINAL_CASK];

/// Formula whose companion installer sets up shell key bindings and completion.
pub const KEY_BINDINGS_FORMULA: &str = "fzf";

/// Official Homebrew install script.
pub const HOMEBREW_INSTALL_URL: &str =
    "https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh";

/// Well-known Homebrew locations checked when `brew` is not on `PATH`
/// (Apple silicon first, then Intel).
pub const HOMEBREW_PATHS: &[&str] = &["/opt/homebrew/bin/brew", "/usr/local/bin/brew"];

/// Short name of a possibly tap-qualified formula.
#[must_use]
pub fn short_name(formula: &str) -> &str {
    formula.rsplit('/').next().unwrap_or(formula)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_name_strips_tap() {
        assert_eq!(short_name("jandedobbeleer/oh-my-posh/oh-my-posh"), "oh-my-posh");
        assert_eq!(short_name("git"), "git");
    }

    #[test]
    fn formulae_include_every_configured_tool() {
        let shorts: Vec<&str> = FORMULAE.iter().map(|f| short_name(f)).collect();
        for tool in ["neovim", "tmux", "oh-my-posh", KEY_BINDINGS_FORMULA] {
            assert!(shorts.contains(&tool), "{tool} missing from formulae");
        }
    }

    #[test]
    fn casks_cover_font_and_terminal() {
        assert_eq!(CASKS, &[FONT_CASK, TERMINAL_CASK]);
    }
}
