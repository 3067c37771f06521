//! Entries of the shortcuts panel.

use std::path::{Path, PathBuf};

use crate::config::ShortcutConfig;

const DEFAULT_FOLDERS: [&str; 5] = ["Downloads", "Pictures", "Videos", "Documents", "Desktop"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    pub label: String,
    pub path: PathBuf,
}

impl Shortcut {
    /// Missing targets are listed but cannot be opened.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_dir()
    }

    /// Configured shortcuts with relative paths resolved against `home`, or
    /// the standard home folders when none are configured.
    #[must_use]
    pub fn resolve_all(configured: &[ShortcutConfig], home: &Path) -> Vec<Self> {
        if configured.is_empty() {
            return DEFAULT_FOLDERS
                .iter()
                .map(|name| Self {
                    label: (*name).to_string(),
                    path: home.join(name),
                })
                .collect();
        }

        configured
            .iter()
            .map(|c| Self {
                label: c.label.clone(),
                path: if c.path.is_absolute() {
                    c.path.clone()
                } else {
                    home.join(&c.path)
                },
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_relative_paths() {
        let home = Path::new("/home/u");
        let defaults = Shortcut::resolve_all(&[], home);
        assert_eq!(defaults.len(), 5);
        assert_eq!(defaults[0].path, PathBuf::from("/home/u/Downloads"));

        let configured = Shortcut::resolve_all(
            &[
                ShortcutConfig {
                    label: "Src".into(),
                    path: PathBuf::from("src"),
                },
                ShortcutConfig {
                    label: "Tmp".into(),
                    path: PathBuf::from("/tmp"),
                },
            ],
            home,
        );
        assert_eq!(configured[0].path, PathBuf::from("/home/u/src"));
        assert_eq!(configured[1].path, PathBuf::from("/tmp"));
    }
}
