//! ``src/fs/dir_scanner.rs``
//!
//! # `DirSource`: where directory listings come from
//!
//! The directory cache never touches `std::fs` directly; it asks a
//! [`DirSource`] for the directory's modification time and its children.
//! [`OsDirSource`] is the real implementation, tests inject fakes that count
//! reads.

use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;

use tracing::debug;

use crate::fs::object_info::DirectoryEntry;

pub trait DirSource {
    /// Modification time of the directory itself.
    fn modified(&self, dir: &Path) -> io::Result<SystemTime>;

    /// All children of `dir`, unfiltered and unsorted.
    fn read_children(&self, dir: &Path) -> io::Result<Vec<DirectoryEntry>>;

    /// Metadata for a single path (used for the `..` entry).
    fn entry(&self, path: &Path) -> DirectoryEntry;
}

/// Directory access through the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsDirSource;

impl DirSource for OsDirSource {
    fn modified(&self, dir: &Path) -> io::Result<SystemTime> {
        fs::metadata(dir)?.modified()
    }

    fn read_children(&self, dir: &Path) -> io::Result<Vec<DirectoryEntry>> {
        let mut entries = Vec::new();

        for child in fs::read_dir(dir)? {
            match child {
                Ok(child) => entries.push(DirectoryEntry::from_path(&child.path())),
                // Log the error but continue processing other entries
                Err(e) => debug!("skipping unreadable child of {}: {e}", dir.display()),
            }
        }

        Ok(entries)
    }

    fn entry(&self, path: &Path) -> DirectoryEntry {
        DirectoryEntry::from_path(path)
    }
}
