// src/tasks/styles.rs

//! Stylesheet task: compile SASS sources to CSS.
//!
//! Partials (names starting with `_`) are compiled into their importers and
//! produce no output of their own. In production the compiled CSS goes
//! through an extra minification pass with browser-target lowering.

use std::path::Path;

use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};
use tracing::debug;

use crate::context::PipelineContext;
use crate::errors::TaskError;
use crate::tasks::{files_under, has_extension, write_file};

/// Compile every non-partial stylesheet into the mirrored destination path.
/// Returns the number of files written.
pub fn run(ctx: &PipelineContext) -> Result<usize, TaskError> {
    let src_dir = ctx.config.styles_dir();
    let out_dir = ctx.config.styles_out_dir();

    let options = grass::Options::default().load_path(&src_dir);
    let mut written = 0;

    for path in files_under(&src_dir) {
        if !has_extension(&path, "scss") || is_partial(&path) {
            continue;
        }

        let css = grass::from_path(&path, &options).map_err(|err| TaskError::StyleCompile {
            path: path.clone(),
            message: err.to_string(),
        })?;

        let css = if ctx.production {
            optimize_css(&path, &css, &ctx.config.browsers.targets)?
        } else {
            css
        };

        let Ok(rel) = path.strip_prefix(&src_dir) else {
            continue;
        };
        let dest = out_dir.join(rel).with_extension("css");
        write_file(&dest, css.as_bytes())?;
        debug!(src = ?path, dest = ?dest, "stylesheet compiled");
        written += 1;
    }

    Ok(written)
}

fn is_partial(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('_'))
}

/// Production pass: minify and lower the CSS for the configured browser
/// targets.
fn optimize_css(path: &Path, css: &str, target_queries: &[String]) -> Result<String, TaskError> {
    let compile_err = |message: String| TaskError::StyleCompile {
        path: path.to_path_buf(),
        message,
    };

    let browsers =
        Browsers::from_browserslist(target_queries).map_err(|err| compile_err(err.to_string()))?;
    let targets = Targets {
        browsers,
        ..Targets::default()
    };

    let mut sheet = StyleSheet::parse(css, ParserOptions::default())
        .map_err(|err| compile_err(err.to_string()))?;
    sheet
        .minify(MinifyOptions {
            targets,
            ..MinifyOptions::default()
        })
        .map_err(|err| compile_err(err.to_string()))?;

    let output = sheet
        .to_css(PrinterOptions {
            minify: true,
            targets,
            ..PrinterOptions::default()
        })
        .map_err(|err| compile_err(err.to_string()))?;

    Ok(output.code)
}
