// src/tasks/scripts.rs

//! Script task: copy scripts, minifying them in production.

use std::fs;
use std::path::Path;

use minify_js::{Session, TopLevelMode};
use tracing::debug;

use crate::context::PipelineContext;
use crate::errors::TaskError;
use crate::tasks::{files_under, has_extension, write_file};

/// Process every script into the mirrored destination path. Returns the
/// number of files written.
pub fn run(ctx: &PipelineContext) -> Result<usize, TaskError> {
    let src_dir = ctx.config.scripts_dir();
    let out_dir = ctx.config.scripts_out_dir();

    let mut written = 0;
    for path in files_under(&src_dir) {
        if !has_extension(&path, "js") {
            continue;
        }

        let source = fs::read_to_string(&path).map_err(|source| TaskError::Read {
            path: path.clone(),
            source,
        })?;

        let bytes = if ctx.production {
            minify_script(&path, &source)?
        } else {
            source.into_bytes()
        };

        let Ok(rel) = path.strip_prefix(&src_dir) else {
            continue;
        };
        let dest = out_dir.join(rel);
        write_file(&dest, &bytes)?;
        debug!(src = ?path, dest = ?dest, "script written");
        written += 1;
    }

    Ok(written)
}

fn minify_script(path: &Path, source: &str) -> Result<Vec<u8>, TaskError> {
    let session = Session::new();
    let mut out = Vec::new();
    minify_js::minify(&session, TopLevelMode::Global, source.as_bytes(), &mut out).map_err(
        |err| TaskError::ScriptMinify {
            path: path.to_path_buf(),
            message: format!("{err:?}"),
        },
    )?;
    Ok(out)
}
