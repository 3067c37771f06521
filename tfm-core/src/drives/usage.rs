//! Free space of the filesystem holding the working directory.

use std::path::{Path, PathBuf};

use sysinfo::Disks;

use crate::util::humanize::gib;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskUsage {
    pub mount_point: PathBuf,
    pub total: u64,
    pub available: u64,
}

impl DiskUsage {
    #[must_use]
    pub const fn used(&self) -> u64 {
        self.total.saturating_sub(self.available)
    }

    #[must_use]
    pub fn percent_used(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.used() as f64 * 100.0 / self.total as f64
        }
    }

    /// `[#####---------------] 25.0% used, 12.3 GiB free`
    #[must_use]
    pub fn summary(&self, bar_width: usize) -> String {
        let filled = ((self.percent_used() / 100.0) * bar_width as f64).round() as usize;
        let filled = filled.min(bar_width);
        format!(
            "[{}{}] {:.1}% used, {:.1} GiB free",
            "#".repeat(filled),
            "-".repeat(bar_width - filled),
            self.percent_used(),
            gib(self.available)
        )
    }
}

/// Usage of the mounted filesystem whose mount point is the longest prefix
/// of `path`.
#[must_use]
pub fn disk_usage_for(path: &Path) -> Option<DiskUsage> {
    let disks = Disks::new_with_refreshed_list();
    closest_mount(
        disks.list().iter().map(|d| DiskUsage {
            mount_point: d.mount_point().to_path_buf(),
            total: d.total_space(),
            available: d.available_space(),
        }),
        path,
    )
}

fn closest_mount(candidates: impl Iterator<Item = DiskUsage>, path: &Path) -> Option<DiskUsage> {
    candidates
        .filter(|d| path.starts_with(&d.mount_point))
        .max_by_key(|d| d.mount_point.components().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(mount: &str, total: u64, available: u64) -> DiskUsage {
        DiskUsage {
            mount_point: PathBuf::from(mount),
            total,
            available,
        }
    }

    #[test]
    fn picks_the_deepest_containing_mount() {
        let mounts = vec![
            usage("/", 100, 50),
            usage("/home", 100, 10),
            usage("/home/user/media", 100, 90),
        ];
        let hit = closest_mount(mounts.into_iter(), Path::new("/home/user/docs"));
        assert_eq!(hit.map(|d| d.mount_point), Some(PathBuf::from("/home")));
    }

    #[test]
    fn summary_bar() {
        let u = usage("/", 4 * 1024 * 1024 * 1024, 3 * 1024 * 1024 * 1024);
        assert_eq!(u.summary(20), "[#####---------------] 25.0% used, 3.0 GiB free");
        assert_eq!(usage("/", 0, 0).percent_used(), 0.0);
    }
}
