// src/tasks/clean.rs

//! Clean task: reset the destination tree.
//!
//! `KeepCached` removes everything under the destination root except the
//! configured preserve list, so the processed-image subtree survives
//! rebuilds. `Full` removes the whole root and the image transform cache.
//! Both modes leave an existing (possibly empty) destination root behind
//! and are terminal-stable: cleaning an already-clean tree succeeds.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::SiteConfig;
use crate::errors::TaskError;
use crate::tasks::cache::ImageCache;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanMode {
    /// Remove the destination root and the image cache.
    Full,
    /// Remove the destination tree except the preserve list.
    KeepCached,
}

pub fn run(config: &SiteConfig, mode: CleanMode) -> Result<(), TaskError> {
    let root = config.dest_root();

    match mode {
        CleanMode::Full => {
            if root.exists() {
                fs::remove_dir_all(&root).map_err(|source| TaskError::Remove {
                    path: root.clone(),
                    source,
                })?;
            }

            let cache_path = config.image_cache_file();
            ImageCache::clear(&cache_path).map_err(|source| TaskError::Remove {
                path: cache_path,
                source,
            })?;

            info!(root = ?root, "destination tree and image cache removed");
        }
        CleanMode::KeepCached => {
            if root.exists() {
                let preserve: Vec<PathBuf> =
                    config.dest.preserve.iter().map(|p| root.join(p)).collect();
                remove_except(&root, &preserve)?;
            }

            info!(root = ?root, preserve = ?config.dest.preserve, "destination tree cleaned");
        }
    }

    fs::create_dir_all(&root).map_err(|source| TaskError::CreateDir { path: root, source })
}

/// Remove everything under `dir` except the preserved subpaths.
///
/// Directories that contain a preserved subtree deeper down are kept and
/// recursed into; everything else goes.
fn remove_except(dir: &Path, preserve: &[PathBuf]) -> Result<(), TaskError> {
    let entries = fs::read_dir(dir).map_err(|source| TaskError::Read {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| TaskError::Read {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        if preserve.iter().any(|p| *p == path) {
            debug!(path = ?path, "preserved");
            continue;
        }

        if preserve.iter().any(|p| p.starts_with(&path)) {
            if path.is_dir() {
                remove_except(&path, preserve)?;
            }
            continue;
        }

        let removal = if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        removal.map_err(|source| TaskError::Remove { path, source })?;
    }

    Ok(())
}
