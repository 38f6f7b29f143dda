//! Log file location, ANSI stripping, and UTC timestamps.
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Remove ANSI escape sequences so console-styled messages read cleanly in
/// the log file.
///
/// A CSI sequence (`ESC [ ... final`) is dropped through its final byte in
/// `@..=~`; any other escape drops the escape and the byte after it.
pub(super) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            out.push(c);
            continue;
        }
        if chars.next_if_eq(&'[').is_some() {
            for c in chars.by_ref() {
                if ('@'..='~').contains(&c) {
                    break;
                }
            }
        } else {
            chars.next();
        }
    }
    out
}

/// Directory holding per-command log files: `$XDG_CACHE_HOME/dotfiles`, or
/// `<home>/.cache/dotfiles` when the variable is unset or empty.
fn log_dir_from(xdg_cache_home: Option<OsString>, home: Option<&Path>) -> Option<PathBuf> {
    let cache = match xdg_cache_home.filter(|v| !v.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => home?.join(".cache"),
    };
    Some(cache.join("dotfiles"))
}

/// Log file for `command`, creating its directory.
///
/// Returns `None` when no location can be determined or created; the run
/// then logs to the console only.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    let dir = log_dir_from(
        std::env::var_os("XDG_CACHE_HOME"),
        dirs::home_dir().as_deref(),
    )?;
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir.join(format!("{command}.log")))
}

/// `YYYY-MM-DD HH:MM:SS` in UTC, for the run header.
pub(super) fn format_utc_datetime() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// `HH:MM:SS` in UTC, for each log line.
pub(super) fn format_utc_time() -> String {
    chrono::Utc::now().format("%H:%M:%S").to_string()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn strip_ansi_removes_styling() {
        assert_eq!(strip_ansi("\x1b[33mWARN\x1b[0m  zshrc missing"), "WARN  zshrc missing");
        assert_eq!(
            strip_ansi("\x1b[1;34m==>\x1b[0m \x1b[1mRestore configuration\x1b[0m"),
            "==> Restore configuration"
        );
        assert_eq!(strip_ansi("plain"), "plain");
        assert_eq!(strip_ansi(""), "");
    }

    #[test]
    fn strip_ansi_drops_non_csi_escapes() {
        assert_eq!(strip_ansi("\x1b7saved"), "saved");
        assert_eq!(strip_ansi("\x1b[2Kcleared"), "cleared");
    }

    #[test]
    fn log_dir_prefers_xdg_cache_home() {
        let dir = log_dir_from(Some("/var/cache".into()), Some(Path::new("/Users/me")));
        assert_eq!(dir, Some(PathBuf::from("/var/cache/dotfiles")));
    }

    #[test]
    fn log_dir_falls_back_to_home_cache() {
        let home = Some(Path::new("/Users/me"));
        let expected = Some(PathBuf::from("/Users/me/.cache/dotfiles"));
        assert_eq!(log_dir_from(None, home), expected);
        assert_eq!(log_dir_from(Some(OsString::new()), home), expected);
        assert_eq!(log_dir_from(None, None), None);
    }

    #[test]
    fn timestamps_have_fixed_width() {
        let time = format_utc_time();
        assert_eq!(time.len(), 8);
        assert_eq!(&time[2..3], ":");
        let datetime = format_utc_datetime();
        assert_eq!(datetime.len(), 19);
        assert_eq!(&datetime[10..11], " ");
    }
}
