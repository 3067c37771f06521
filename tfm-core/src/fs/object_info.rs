//! `src/fs/object_info.rs`
//! ============================================================
//! Immutable metadata for one child of a directory listing.
//!
//! Entries are built once per reload and never patched; a listing that
//! changes is rebuilt from scratch. Metadata failures do not fail the
//! listing, they produce an entry with `readable == false`.

use std::ffi::OsStr;
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use compact_str::CompactString;

/// Name given to the synthetic parent entry.
pub const PARENT_NAME: &str = "..";

// ------------------------------------------------------------
// DirectoryEntry
// ------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub path: PathBuf,
    pub name: CompactString,
    pub size: u64,
    pub modified: DateTime<Local>,
    pub created: DateTime<Local>,
    pub is_dir: bool,
    pub is_hidden: bool,
    pub is_executable: bool,
    pub readable: bool,
}

impl DirectoryEntry {
    /// Entry with no metadata beyond the directory flag.
    #[must_use]
    pub fn new(path: PathBuf, is_dir: bool) -> Self {
        let name = display_name(&path);
        let now = Local::now();
        Self {
            is_hidden: name.starts_with('.'),
            name,
            path,
            size: 0,
            modified: now,
            created: now,
            is_dir,
            is_executable: false,
            readable: true,
        }
    }

    /// Stat `path` (following symlinks). Never fails; an entry whose
    /// metadata cannot be read is marked unreadable.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match fs::metadata(path) {
            Ok(meta) => Self::from_metadata(path, &meta),
            Err(e) => {
                tracing::debug!("metadata unavailable for {}: {e}", path.display());
                let mut entry = Self::new(path.to_path_buf(), path.is_dir());
                entry.readable = false;
                entry
            }
        }
    }

    fn from_metadata(path: &Path, meta: &Metadata) -> Self {
        let modified: DateTime<Local> = meta
            .modified()
            .map_or_else(|_| Local::now(), DateTime::from);
        let created: DateTime<Local> = meta.created().map_or(modified, DateTime::from);

        let mut entry = Self::new(path.to_path_buf(), meta.is_dir());
        entry.size = meta.len();
        entry.modified = modified;
        entry.created = created;
        entry.is_executable = !meta.is_dir() && is_executable(meta);
        entry
    }

    /// Rename into the synthetic `..` entry.
    #[must_use]
    pub fn into_parent(mut self) -> Self {
        self.name = CompactString::const_new(PARENT_NAME);
        self.is_hidden = false;
        self
    }

    #[inline]
    #[must_use]
    pub fn is_parent(&self) -> bool {
        self.name == PARENT_NAME
    }

    /// Lower-case extension, if any.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .and_then(OsStr::to_str)
            .map(str::to_lowercase)
    }
}

fn display_name(path: &Path) -> CompactString {
    match path.file_name().and_then(OsStr::to_str) {
        Some(name) => CompactString::new(name),
        None => match path.file_name() {
            Some(raw) => CompactString::new(raw.to_string_lossy()),
            // "/" and friends
            None => CompactString::new(path.to_string_lossy()),
        },
    }
}

#[cfg(unix)]
fn is_executable(meta: &Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_meta: &Metadata) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_fills_size_and_flags() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join(".hidden.txt");
        fs::write(&file, b"hello").expect("write");

        let entry = DirectoryEntry::from_path(&file);
        assert_eq!(entry.name, ".hidden.txt");
        assert_eq!(entry.size, 5);
        assert!(entry.is_hidden);
        assert!(!entry.is_dir);
        assert!(entry.readable);
        assert_eq!(entry.extension().as_deref(), Some("txt"));
    }

    #[test]
    fn missing_path_is_unreadable_not_an_error() {
        let entry = DirectoryEntry::from_path(Path::new("/definitely/not/here"));
        assert!(!entry.readable);
        assert_eq!(entry.size, 0);
        assert_eq!(entry.name, "here");
    }

    #[test]
    fn parent_entry_is_renamed_and_visible() {
        let entry = DirectoryEntry::new(PathBuf::from("/home/.config"), true).into_parent();
        assert!(entry.is_parent());
        assert!(!entry.is_hidden);
        assert_eq!(entry.path, PathBuf::from("/home/.config"));
    }
}
