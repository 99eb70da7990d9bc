//! Committing rendered artifacts to disk.
//!
//! Every write goes to a temporary file in the destination directory that is
//! then renamed over the destination, so an artifact on disk is always either
//! the previous content or the new content.
use std::io::Write as _;
use std::path::Path;

use crate::error::TokenError;

/// How an artifact on disk compares with its rendered content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiskState {
    /// No file at the destination.
    Missing,
    /// A file exists with different content.
    Stale,
    /// The file already holds the rendered content.
    Current,
}

/// Compare the file at `path` with `content`.
#[must_use]
pub fn disk_state(path: &Path, content: &str) -> DiskState {
    match std::fs::read(path) {
        Ok(existing) if existing == content.as_bytes() => DiskState::Current,
        Ok(_) => DiskState::Stale,
        Err(_) => DiskState::Missing,
    }
}

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns [`TokenError::Io`] if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<(), TokenError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| TokenError::io(parent, e))?;
    }
    Ok(())
}

/// Write `content` to `path` through a temporary sibling file.
///
/// Returns `false` without touching the file when it already holds
/// `content`.
///
/// # Errors
///
/// Returns [`TokenError::Io`] if the directory, the temporary file or the
/// rename fails. A failed rename leaves the previous file in place.
pub fn commit(path: &Path, content: &str) -> Result<bool, TokenError> {
    if disk_state(path, content) == DiskState::Current {
        return Ok(false);
    }

    ensure_parent_dir(path)?;
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::Builder::new()
        .prefix(".tokens-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| TokenError::io(dir, e))?;
    tmp.write_all(content.as_bytes())
        .and_then(|()| tmp.flush())
        .map_err(|e| TokenError::io(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| TokenError::io(path, e.error))?;
    Ok(true)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn commit_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output/web/acme/tokens.scss");
        assert!(commit(&path, "$a: 1;\n").unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "$a: 1;\n");
    }

    #[test]
    fn commit_skips_identical_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        assert!(commit(&path, "[]\n").unwrap());
        let before = std::fs::metadata(&path).unwrap().modified().unwrap();
        assert!(!commit(&path, "[]\n").unwrap());
        let after = std::fs::metadata(&path).unwrap().modified().unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn commit_replaces_changed_content_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        commit(&path, "old").unwrap();
        assert!(commit(&path, "new").unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty(), "temporary files left behind");
    }

    #[test]
    fn disk_states() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        assert_eq!(disk_state(&path, "x"), DiskState::Missing);
        std::fs::write(&path, "x").unwrap();
        assert_eq!(disk_state(&path, "x"), DiskState::Current);
        assert_eq!(disk_state(&path, "y"), DiskState::Stale);
    }
}
