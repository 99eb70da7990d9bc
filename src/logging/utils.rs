//! Log file location, ANSI stripping and timestamps.
use std::path::PathBuf;

/// Remove CSI escape sequences (`ESC [ ... final`) and drop any other
/// escape together with the character after it.
pub(super) fn strip_ansi(s: &str) -> String {
    #[derive(Clone, Copy)]
    enum State {
        Text,
        Escape,
        Csi,
    }

    let mut state = State::Text;
    s.chars()
        .filter(|&c| {
            let (next, keep) = match (state, c) {
                (State::Text, '\x1b') => (State::Escape, false),
                (State::Text, _) => (State::Text, true),
                (State::Escape, '[') => (State::Csi, false),
                (State::Escape, _) => (State::Text, false),
                (State::Csi, '@'..='~') => (State::Text, false),
                (State::Csi, _) => (State::Csi, false),
            };
            state = next;
            keep
        })
        .collect()
}

/// `$XDG_CACHE_HOME/tokens`, falling back to `~/.cache/tokens`. Created on
/// first use.
fn log_dir() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CACHE_HOME").map_or_else(
        || {
            std::env::var_os("HOME")
                .or_else(|| std::env::var_os("USERPROFILE"))
                .map_or_else(|| PathBuf::from("."), PathBuf::from)
                .join(".cache")
        },
        PathBuf::from,
    );
    let dir = base.join("tokens");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

/// `<log dir>/<command>.log`.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    log_dir().map(|dir| dir.join(format!("{command}.log")))
}

/// Current UTC time in a `chrono` strftime `format`.
pub(super) fn timestamp(format: &str) -> String {
    chrono::Utc::now().format(format).to_string()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn strip_ansi_removes_sgr_colors() {
        assert_eq!(strip_ansi("\x1b[31mERROR\x1b[0m boom"), "ERROR boom");
        assert_eq!(
            strip_ansi("\x1b[1;34m==>\x1b[0m \x1b[1mProcessing [web] [a]\x1b[0m"),
            "==> Processing [web] [a]"
        );
        assert_eq!(strip_ansi("plain"), "plain");
    }

    #[test]
    fn strip_ansi_removes_other_escapes() {
        assert_eq!(strip_ansi("\x1b[2Jcleared"), "cleared");
        assert_eq!(strip_ansi("\x1bMreverse"), "reverse");
        assert_eq!(strip_ansi("✓ web/brand#1"), "✓ web/brand#1");
    }

    #[test]
    fn log_file_lives_in_cache_dir() {
        let _lock = crate::logging::TEST_ENV_MUTEX
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let tmp = tempfile::tempdir().unwrap();
        // SAFETY: Protected by TEST_ENV_MUTEX; restored before the lock is released.
        #[allow(unsafe_code)]
        unsafe {
            std::env::set_var("XDG_CACHE_HOME", tmp.path());
        }
        let path = log_file_path("build");
        #[allow(unsafe_code)]
        unsafe {
            std::env::remove_var("XDG_CACHE_HOME");
        }
        assert_eq!(path, Some(tmp.path().join("tokens/build.log")));
    }

    #[test]
    fn timestamps_follow_the_format() {
        let time = timestamp("%H:%M:%S");
        assert_eq!(time.len(), 8);
        assert_eq!(&time[2..3], ":");
        assert_eq!(timestamp("%Y-%m-%d %H:%M:%S").len(), 19);
    }
}
