//! ``src/model/dir_cache.rs``
//! ============================================================================
//! # `DirectoryCache`: the tree panel's listing
//!
//! Owns the working directory, its filtered and sorted entries, and the tree
//! panel's scroll state. `refresh(false)` is cheap: it only stats the
//! directory and rebuilds when the modification time moved.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, info};

use crate::fs::dir_scanner::{DirSource, OsDirSource};
use crate::fs::object_info::DirectoryEntry;
use crate::model::panel_focus::ScrollState;

#[derive(Debug)]
pub struct DirectoryCache<S: DirSource = OsDirSource> {
    source: S,
    cwd: PathBuf,
    entries: Vec<DirectoryEntry>,
    last_modified: Option<SystemTime>,
    show_hidden: bool,
    search: Option<String>,
    pub scroll: ScrollState,
}

impl<S: DirSource> DirectoryCache<S> {
    /// Build the cache and load `cwd` immediately.
    pub fn new(source: S, cwd: PathBuf, show_hidden: bool) -> Self {
        let mut cache = Self {
            source,
            cwd,
            entries: Vec::new(),
            last_modified: None,
            show_hidden,
            search: None,
            scroll: ScrollState::default(),
        };
        cache.refresh(true);
        cache
    }

    #[must_use]
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    #[must_use]
    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    #[must_use]
    pub fn selected(&self) -> usize {
        self.scroll.selected
    }

    #[must_use]
    pub fn selected_entry(&self) -> Option<&DirectoryEntry> {
        self.entries.get(self.scroll.selected)
    }

    #[must_use]
    pub const fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    #[must_use]
    pub fn is_at_root(&self) -> bool {
        self.cwd.parent().is_none()
    }

    /// Rebuild the listing if forced or if the directory changed on disk.
    /// Returns whether a rebuild happened.
    pub fn refresh(&mut self, force: bool) -> bool {
        let modified = self.source.modified(&self.cwd).ok();
        if !force && modified == self.last_modified && !self.entries.is_empty() {
            return false;
        }

        self.last_modified = modified;
        self.entries = self.build_listing();
        self.scroll.clamp(self.entries.len());
        debug!(
            marker = "DIR_RELOAD",
            "loaded {} entries from {}",
            self.entries.len(),
            self.cwd.display()
        );
        true
    }

    fn build_listing(&self) -> Vec<DirectoryEntry> {
        let children = match self.source.read_children(&self.cwd) {
            Ok(children) => children,
            Err(e) => {
                info!(marker = "DIR_UNREADABLE", "{}: {e}", self.cwd.display());
                Vec::new()
            }
        };

        let needle = self.search.as_deref().map(str::to_lowercase);
        let mut entries: Vec<DirectoryEntry> = children
            .into_iter()
            .filter(|e| self.show_hidden || !e.is_hidden)
            .filter(|e| {
                needle
                    .as_deref()
                    .is_none_or(|n| e.name.to_lowercase().contains(n))
            })
            .collect();
        entries.sort_by(compare_entries);

        if let Some(parent) = self.cwd.parent() {
            entries.insert(0, self.source.entry(parent).into_parent());
        }
        entries
    }

    /// Move the selection by `delta`, wrapping at both ends.
    pub fn move_selection(&mut self, delta: isize) {
        self.scroll.move_by(delta, self.entries.len());
    }

    pub fn select(&mut self, index: usize) {
        self.scroll.select(index, self.entries.len());
    }

    /// Enter the selected directory. Returns `false` when the selection is a
    /// file (or there is no selection).
    pub fn enter(&mut self) -> bool {
        let Some(entry) = self.selected_entry().filter(|e| e.is_dir) else {
            return false;
        };
        let target = if entry.is_parent() {
            self.cwd.parent().map(Path::to_path_buf)
        } else {
            Some(entry.path.clone())
        };
        match target {
            Some(target) => {
                self.change_dir(target);
                true
            }
            None => false,
        }
    }

    /// Go to the parent directory; nothing happens at the root.
    pub fn ascend(&mut self) {
        if let Some(parent) = self.cwd.parent().map(Path::to_path_buf) {
            self.change_dir(parent);
        }
    }

    /// Jump to `path` (shortcut or mount point), dropping any search.
    pub fn open(&mut self, path: PathBuf) {
        self.search = None;
        self.change_dir(path);
    }

    pub fn toggle_hidden(&mut self) {
        self.show_hidden = !self.show_hidden;
        self.scroll.reset();
        self.refresh(true);
    }

    /// Set or clear (empty string) the search filter.
    pub fn set_search(&mut self, query: &str) {
        let query = query.trim();
        self.search = (!query.is_empty()).then(|| query.to_string());
        self.scroll.reset();
        self.refresh(true);
    }

    fn change_dir(&mut self, path: PathBuf) {
        info!(marker = "DIR_CHANGE", "{} -> {}", self.cwd.display(), path.display());
        self.cwd = path;
        self.scroll.reset();
        self.refresh(true);
    }
}

/// Directories first, then case-insensitive name.
fn compare_entries(a: &DirectoryEntry, b: &DirectoryEntry) -> Ordering {
    b.is_dir
        .cmp(&a.is_dir)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
}
