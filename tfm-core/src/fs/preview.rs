//! ``src/fs/preview.rs``
//!
//! Text preview of the selected file, cached per path so the renderer never
//! reads from disk.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::fs::object_info::DirectoryEntry;

const TEXT_EXTENSIONS: &[&str] = &[
    "txt", "py", "java", "c", "cpp", "h", "js", "html", "css", "md", "json", "xml", "yml", "yaml",
    "sh", "conf", "cfg", "rs", "toml", "log", "ini",
];

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "tiff", "webp"];

/// Bytes read from the head of a file for previewing.
const PREVIEW_BYTES: u64 = 64 * 1024;

/// Lines kept per preview; the renderer crops to the panel height.
const PREVIEW_LINES: usize = 200;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preview {
    path: Option<PathBuf>,
    lines: Vec<String>,
}

impl Preview {
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Rebuild for `entry` unless it is already the previewed path.
    pub fn sync(&mut self, entry: Option<&DirectoryEntry>) {
        let target = entry.filter(|e| !e.is_dir);
        if target.map(|e| &e.path) == self.path.as_ref() {
            return;
        }

        match target {
            None => *self = Self::default(),
            Some(entry) => {
                self.path = Some(entry.path.clone());
                self.lines = build_preview(entry);
            }
        }
    }

    /// Forget the cached preview so the next `sync` re-reads the file.
    pub fn invalidate(&mut self) {
        *self = Self::default();
    }
}

fn build_preview(entry: &DirectoryEntry) -> Vec<String> {
    let ext = entry.extension().unwrap_or_default();

    if TEXT_EXTENSIONS.contains(&ext.as_str()) {
        text_preview(&entry.path)
    } else if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        vec!["[Image preview unavailable]".to_string()]
    } else {
        vec![
            "[No preview available]".to_string(),
            format!("File type: {}", if ext.is_empty() { "none" } else { &ext }),
        ]
    }
}

fn text_preview(path: &Path) -> Vec<String> {
    let mut buf = Vec::new();
    let read = File::open(path).and_then(|f| f.take(PREVIEW_BYTES).read_to_end(&mut buf));
    if read.is_err() {
        return vec!["[Cannot preview file]".to_string()];
    }

    String::from_utf8_lossy(&buf)
        .lines()
        .take(PREVIEW_LINES)
        .map(|l| l.trim_end().replace('\t', "    "))
        .collect()
}
