//! ``src/fs/file_ops.rs``
//!
//! Thin wrappers over the OS filesystem calls used by the tree panel:
//! delete, create, copy, move and the collision-free paste target.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;
use walkdir::WalkDir;

use crate::error::AppError;

/// What the `n` prompt asked to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewKind {
    File,
    Directory,
}

/// Parse the create prompt: `f name` makes a file, `d name` a directory.
pub fn parse_new_request(input: &str) -> Result<(NewKind, &str), AppError> {
    let (kind, name) = if let Some(name) = input.strip_prefix("f ") {
        (NewKind::File, name)
    } else if let Some(name) = input.strip_prefix("d ") {
        (NewKind::Directory, name)
    } else {
        return Err(AppError::invalid_input("create", "Use 'f name' or 'd name'"));
    };

    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::invalid_input("create", "Name must not be empty"));
    }
    Ok((kind, name))
}

pub fn delete(path: &Path) -> Result<(), AppError> {
    info!(marker = "FILE_DELETE", "deleting {}", path.display());
    let meta = fs::symlink_metadata(path).map_err(|e| AppError::from_io("delete", path, e))?;
    let result = if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    result.map_err(|e| AppError::from_io("delete", path, e))
}

pub fn create(path: &Path, kind: NewKind) -> Result<(), AppError> {
    info!(marker = "FILE_CREATE", "creating {:?} {}", kind, path.display());
    let result = match kind {
        NewKind::Directory => fs::create_dir_all(path),
        NewKind::File => fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map(drop),
    };
    result.map_err(|e| AppError::from_io("create", path, e))
}

/// Copy a file, or a directory tree recursively.
pub fn copy(src: &Path, dst: &Path) -> Result<(), AppError> {
    info!(marker = "FILE_COPY", "copying {} -> {}", src.display(), dst.display());
    let meta = fs::metadata(src).map_err(|e| AppError::from_io("copy", src, e))?;
    if !meta.is_dir() {
        return fs::copy(src, dst)
            .map(drop)
            .map_err(|e| AppError::from_io("copy", src, e));
    }

    if dst.starts_with(src) {
        return Err(AppError::file_operation_failed(
            "copy",
            src,
            "cannot copy a directory into itself",
        ));
    }

    for item in WalkDir::new(src) {
        let item = item.map_err(|e| AppError::file_operation_failed("copy", src, e.to_string()))?;
        let rel = item
            .path()
            .strip_prefix(src)
            .map_err(|e| AppError::file_operation_failed("copy", item.path(), e.to_string()))?;
        let target = dst.join(rel);

        if item.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| AppError::from_io("copy", &target, e))?;
        } else {
            fs::copy(item.path(), &target).map_err(|e| AppError::from_io("copy", item.path(), e))?;
        }
    }
    Ok(())
}

/// Rename, falling back to copy + delete across filesystems.
pub fn move_to(src: &Path, dst: &Path) -> Result<(), AppError> {
    info!(marker = "FILE_MOVE", "moving {} -> {}", src.display(), dst.display());
    if fs::rename(src, dst).is_ok() {
        return Ok(());
    }
    copy(src, dst)?;
    delete(src)
}

/// First of `dir/name`, `dir/stem_1.ext`, `dir/stem_2.ext`, … that does not exist.
#[must_use]
pub fn unique_destination(dir: &Path, source: &Path) -> PathBuf {
    let name = source.file_name().map(PathBuf::from).unwrap_or_default();
    let candidate = dir.join(&name);
    if !candidate.exists() {
        return candidate;
    }

    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = source
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    (1u32..)
        .map(|n| dir.join(format!("{stem}_{n}{suffix}")))
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}
