//! src/view/icons.rs
//! ============================================================================
//! # Filesystem Icons (Nerd Fonts)
//!
//! Nerd Font icons for the entries of each panel.

use crate::fs::object_info::DirectoryEntry;

pub const FOLDER_ICON: &str = "\u{f115}";
pub const FILE_ICON: &str = "\u{f15b}";
pub const EXECUTABLE_ICON: &str = "\u{f489}";
pub const PARENT_ICON: &str = "\u{f062}";
pub const SHORTCUT_ICON: &str = "\u{f02e}";
pub const DRIVE_ICON: &str = "\u{f0a0}";
pub const MOUNTED_ICON: &str = "\u{f287}";

/// Icon for a row of the directory tree.
#[must_use]
pub fn entry_icon(entry: &DirectoryEntry) -> &'static str {
    if entry.is_parent() {
        PARENT_ICON
    } else if entry.is_dir {
        FOLDER_ICON
    } else if entry.is_executable {
        EXECUTABLE_ICON
    } else {
        FILE_ICON
    }
}
