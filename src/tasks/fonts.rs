// src/tasks/fonts.rs

//! Font task: mirror the font tree into the destination verbatim.

use std::fs;

use tracing::debug;

use crate::context::PipelineContext;
use crate::errors::TaskError;
use crate::tasks::files_under;

/// Copy every font file into the mirrored destination path. Returns the
/// number of files copied.
pub fn run(ctx: &PipelineContext) -> Result<usize, TaskError> {
    let src_dir = ctx.config.fonts_dir();
    let out_dir = ctx.config.fonts_out_dir();

    let mut copied = 0;
    for path in files_under(&src_dir) {
        let Ok(rel) = path.strip_prefix(&src_dir) else {
            continue;
        };
        let dest = out_dir.join(rel);

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|source| TaskError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::copy(&path, &dest).map_err(|source| TaskError::Copy {
            src: path.clone(),
            dst: dest.clone(),
            source,
        })?;
        debug!(src = ?path, dest = ?dest, "font copied");
        copied += 1;
    }

    Ok(copied)
}
