// src/tasks/mod.rs

//! The task bodies: one module per pipeline task, plus the executor that
//! runs them and reports outcomes back to the runtime.
//!
//! Every transform follows the same contract: enumerate matching source
//! files, apply exactly one transform per file, write to the mirrored
//! destination subpath, and (via the executor) notify the reload server
//! after writing. A single file's failure aborts that task's current run.

pub mod cache;
pub mod clean;
pub mod executor;
pub mod fonts;
pub mod images;
pub mod pages;
pub mod scripts;
pub mod styles;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::errors::TaskError;

/// All regular files under `root`, in walk order.
///
/// A missing root is an empty source set, not an error; unreadable entries
/// are logged and skipped.
pub(crate) fn files_under(root: &Path) -> Vec<PathBuf> {
    if !root.exists() {
        return Vec::new();
    }

    WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) if e.file_type().is_file() => Some(e.into_path()),
            Ok(_) => None,
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                None
            }
        })
        .collect()
}

/// Case-insensitive extension check.
pub(crate) fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// Write `bytes` to `path`, creating parent directories as needed.
pub(crate) fn write_file(path: &Path, bytes: &[u8]) -> Result<(), TaskError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| TaskError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, bytes).map_err(|source| TaskError::Write {
        path: path.to_path_buf(),
        source,
    })
}
