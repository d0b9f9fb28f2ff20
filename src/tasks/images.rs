// src/tasks/images.rs

//! Image task: optimize and copy images, with a content-hash cache.
//!
//! PNGs are recompressed losslessly; other formats copy through unchanged.
//! The cache keys on file content, so an edited image reprocesses
//! automatically while untouched ones are skipped across runs.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::context::PipelineContext;
use crate::errors::TaskError;
use crate::tasks::cache::{self, ImageCache};
use crate::tasks::{files_under, has_extension, write_file};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg"];

/// Process every image into the mirrored destination path, skipping files
/// whose content hash is cached and whose output already exists. Returns
/// the number of files (re)written.
pub fn run(ctx: &PipelineContext) -> Result<usize, TaskError> {
    let src_dir = ctx.config.images_dir();
    let out_dir = ctx.config.images_out_dir();
    let cache_path = ctx.config.image_cache_file();

    let mut cache = match ImageCache::load(&cache_path) {
        Ok(cache) => cache,
        Err(err) => {
            warn!(error = %err, "image cache unreadable; rebuilding");
            ImageCache::default()
        }
    };

    let mut written = 0;
    let mut skipped = 0;

    for path in files_under(&src_dir) {
        if !is_image(&path) {
            continue;
        }
        let Ok(rel) = path.strip_prefix(&src_dir) else {
            continue;
        };
        let rel_key = rel.to_string_lossy().replace('\\', "/");

        let hash = cache::hash_file(&path).map_err(|source| TaskError::Read {
            path: path.clone(),
            source,
        })?;

        let dest = out_dir.join(rel);
        if cache.is_fresh(&rel_key, &hash) && dest.exists() {
            debug!(image = %rel_key, "unchanged; skipping");
            skipped += 1;
            continue;
        }

        let bytes = fs::read(&path).map_err(|source| TaskError::Read {
            path: path.clone(),
            source,
        })?;

        let bytes = if has_extension(&path, "png") {
            optimize_png(&path, &bytes)?
        } else {
            bytes
        };

        write_file(&dest, &bytes)?;
        cache.record(rel_key, hash);
        written += 1;
    }

    if written > 0 {
        if let Err(err) = cache.save(&cache_path) {
            warn!(error = %err, "failed to persist image cache");
        }
    }

    debug!(written, skipped, "image task finished");
    Ok(written)
}

fn is_image(path: &Path) -> bool {
    IMAGE_EXTENSIONS.iter().any(|ext| has_extension(path, ext))
}

fn optimize_png(path: &Path, bytes: &[u8]) -> Result<Vec<u8>, TaskError> {
    oxipng::optimize_from_memory(bytes, &oxipng::Options::from_preset(2)).map_err(|err| {
        TaskError::ImageOptimize {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    })
}
