//! ``src/drives/drive.rs``
//!
//! Block-device partitions as reported by `lsblk -J`.

use compact_str::CompactString;
use serde::Deserialize;

use crate::error::AppError;

/// One mountable partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drive {
    pub name: CompactString,
    pub dev_type: CompactString,
    pub size: u64,
    pub mountpoint: Option<String>,
    pub label: Option<String>,
    pub model: Option<String>,
}

impl Drive {
    #[inline]
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mountpoint.as_deref().is_some_and(|m| !m.is_empty())
    }

    /// Label, else model, else device name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        [self.label.as_deref(), self.model.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .unwrap_or(&self.name)
    }

    #[must_use]
    pub fn device_path(&self) -> String {
        format!("/dev/{}", self.name)
    }
}

// ------------------------------------------------------------
// lsblk JSON
// ------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct LsblkOutput {
    #[serde(default)]
    blockdevices: Vec<LsblkDevice>,
}

#[derive(Debug, Deserialize)]
struct LsblkDevice {
    name: CompactString,
    #[serde(rename = "type", default)]
    dev_type: CompactString,
    #[serde(default)]
    size: Option<SizeField>,
    #[serde(default)]
    mountpoint: Option<String>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    children: Vec<LsblkDevice>,
}

/// Older `lsblk` releases print `-b` sizes as strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SizeField {
    Number(u64),
    Text(String),
}

impl SizeField {
    fn bytes(&self) -> u64 {
        match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse().unwrap_or(0),
        }
    }
}

impl From<LsblkDevice> for Drive {
    fn from(dev: LsblkDevice) -> Self {
        Self {
            size: dev.size.as_ref().map_or(0, SizeField::bytes),
            name: dev.name,
            dev_type: dev.dev_type,
            mountpoint: dev.mountpoint.filter(|m| !m.is_empty()),
            label: dev.label,
            model: dev.model,
        }
    }
}

/// Partitions (`part`/`loop`) of top-level `disk`/`loop` devices, sorted by
/// device name.
pub fn parse_lsblk(json: &str) -> Result<Vec<Drive>, AppError> {
    let output: LsblkOutput = serde_json::from_str(json)?;

    let mut drives: Vec<Drive> = output
        .blockdevices
        .into_iter()
        .filter(|dev| matches!(dev.dev_type.as_str(), "disk" | "loop"))
        .flat_map(|dev| dev.children)
        .filter(|part| matches!(part.dev_type.as_str(), "part" | "loop"))
        .map(Drive::from)
        .collect();

    drives.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(drives)
}
