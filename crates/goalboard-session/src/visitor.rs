//! Anonymous visitor identity
//!
//! A random id generated once and kept in a small key/value file, one
//! cookie-style entry per line:
//!
//! ```text
//! visitor_id=0f8c2d9e-6c1b-4f7e-9a55-3d2b1e0c4a77; max-age=2147483647
//! ```
//!
//! The id is informational only; nothing is keyed on it.

use crate::error::VisitorError;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

/// Entry key
pub const VISITOR_KEY: &str = "visitor_id";

/// Lifetime written with the entry, in seconds
pub const VISITOR_MAX_AGE: u64 = 2_147_483_647;

/// Anonymous visitor id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisitorId(Uuid);

impl VisitorId {
    /// Generate a fresh random id
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Underlying UUID
    #[inline]
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for VisitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// File-backed visitor id store
#[derive(Debug, Clone)]
pub struct VisitorStore {
    path: PathBuf,
}

impl VisitorStore {
    /// Create new store backed by `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored id, if the file holds a valid entry
    ///
    /// # Errors
    /// Returns [`VisitorError::Io`] if the file exists but cannot be read
    pub fn get(&self) -> Result<Option<VisitorId>, VisitorError> {
        Ok(self.read_entries()?.iter().find_map(|line| parse_entry(line)))
    }

    /// Return the stored id, generating and persisting one on first use
    ///
    /// Other entries in the file are preserved; an unreadable visitor entry
    /// is replaced.
    ///
    /// # Errors
    /// Returns [`VisitorError::Io`] if the file cannot be read or written
    pub fn get_or_create(&self) -> Result<VisitorId, VisitorError> {
        let mut lines = self.read_entries()?;
        if let Some(id) = lines.iter().find_map(|line| parse_entry(line)) {
            debug!(%id, "reusing visitor id");
            return Ok(id);
        }

        let id = VisitorId::generate();
        lines.retain(|line| entry_key(line) != Some(VISITOR_KEY));
        lines.push(format_entry(&id));
        self.write_entries(&lines)?;
        info!(%id, path = %self.path.display(), "created visitor id");
        Ok(id)
    }

    fn read_entries(&self) -> Result<Vec<String>, VisitorError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(text
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string)
                .collect()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(source) => Err(self.io_error(source)),
        }
    }

    fn write_entries(&self, lines: &[String]) -> Result<(), VisitorError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let mut text = lines.join("\n");
        text.push('\n');
        fs::write(&self.path, text).map_err(|e| self.io_error(e))
    }

    fn io_error(&self, source: std::io::Error) -> VisitorError {
        VisitorError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

fn entry_key(line: &str) -> Option<&str> {
    let pair = line.split(';').next()?;
    let (key, _) = pair.split_once('=')?;
    Some(key.trim())
}

fn parse_entry(line: &str) -> Option<VisitorId> {
    let pair = line.split(';').next()?;
    let (key, value) = pair.split_once('=')?;
    if key.trim() != VISITOR_KEY {
        return None;
    }
    Uuid::parse_str(value.trim()).ok().map(VisitorId)
}

fn format_entry(id: &VisitorId) -> String {
    format!("{VISITOR_KEY}={id}; max-age={VISITOR_MAX_AGE}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_once_then_reused() {
        let dir = tempfile::tempdir().unwrap();
        let store = VisitorStore::new(dir.path().join("visitor"));

        assert_eq!(store.get().unwrap(), None);
        let first = store.get_or_create().unwrap();
        let second = store.get_or_create().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.as_uuid().get_version_num(), 4);

        let text = fs::read_to_string(store.path()).unwrap();
        assert_eq!(text, format!("visitor_id={first}; max-age=2147483647\n"));
    }

    #[test]
    fn other_entries_survive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies");
        fs::write(&path, "theme=dark\nvisitor_id=garbage; max-age=1\n").unwrap();

        let store = VisitorStore::new(&path);
        let id = store.get_or_create().unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("theme=dark\n"));
        assert!(!text.contains("garbage"));
        assert_eq!(store.get().unwrap(), Some(id));
    }

    #[test]
    fn nested_directories_are_created() {
        let dir = tempfile::tempdir().unwrap();
        let store = VisitorStore::new(dir.path().join("a/b/visitor"));
        assert!(store.get_or_create().is_ok());
    }

    #[test]
    fn unreadable_path_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = VisitorStore::new(dir.path());

        let err = store.get_or_create().unwrap_err();
        assert_eq!(err.path(), dir.path());
    }
}
