// src/tasks/pages.rs

//! Template task: render page templates to HTML.
//!
//! All files under the templates dir are registered under their relative
//! names so pages can `{% extends %}` and `{% include %}` them; pages
//! themselves are registered under a `pages/` prefix to avoid name clashes.
//! The JSON data file is read fresh on every run.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use tera::Tera;
use tracing::debug;

use crate::context::PipelineContext;
use crate::errors::TaskError;
use crate::serve::LIVERELOAD_SNIPPET;
use crate::tasks::{files_under, has_extension, write_file};

/// Render every page into the destination root, mirroring its path under
/// the pages dir. Returns the number of pages written.
pub fn run(ctx: &PipelineContext) -> Result<usize, TaskError> {
    let pages_dir = ctx.config.pages_dir();
    let templates_dir = ctx.config.templates_dir();
    let out_root = ctx.config.dest_root();

    let mut files: Vec<(PathBuf, Option<String>)> = Vec::new();
    for path in files_under(&templates_dir) {
        if let Some(name) = relative_name(&templates_dir, &path) {
            files.push((path, Some(name)));
        }
    }

    let mut page_names: Vec<String> = Vec::new();
    for path in files_under(&pages_dir) {
        if !has_extension(&path, "html") {
            continue;
        }
        if let Some(name) = relative_name(&pages_dir, &path) {
            files.push((path, Some(format!("pages/{name}"))));
            page_names.push(name);
        }
    }

    let mut tera = Tera::default();
    tera.add_template_files(files)
        .map_err(|source| TaskError::TemplateLoad { source })?;

    let data = load_data(&ctx.config.data_file())?;

    // `</body>` is where browsers expect late scripts; fall back to
    // appending when a page has no body tag.
    let body_close = Regex::new(r"(?i)</body>").ok();

    let mut written = 0;
    for name in page_names {
        let mut html = tera
            .render(&format!("pages/{name}"), &data)
            .map_err(|source| TaskError::TemplateRender {
                name: name.clone(),
                source,
            })?;

        if ctx.live_reload {
            html = inject_livereload(&html, body_close.as_ref());
        }

        let dest = out_root.join(&name);
        write_file(&dest, html.as_bytes())?;
        debug!(page = %name, dest = ?dest, "page rendered");
        written += 1;
    }

    Ok(written)
}

/// Read the template data file into a render context.
///
/// A missing file is an empty context; a malformed one fails the run.
fn load_data(path: &Path) -> Result<tera::Context, TaskError> {
    if !path.exists() {
        return Ok(tera::Context::new());
    }

    let raw = fs::read_to_string(path).map_err(|source| TaskError::DataRead {
        path: path.to_path_buf(),
        source,
    })?;

    let value: serde_json::Value =
        serde_json::from_str(&raw).map_err(|source| TaskError::DataParse {
            path: path.to_path_buf(),
            source,
        })?;

    tera::Context::from_serialize(value).map_err(|source| TaskError::DataContext {
        path: path.to_path_buf(),
        source,
    })
}

/// Insert the live-reload snippet before `</body>`, or append it when the
/// page has no closing body tag.
fn inject_livereload(html: &str, body_close: Option<&Regex>) -> String {
    if let Some(m) = body_close.and_then(|re| re.find(html)) {
        let mut out = String::with_capacity(html.len() + LIVERELOAD_SNIPPET.len() + 1);
        out.push_str(&html[..m.start()]);
        out.push_str(LIVERELOAD_SNIPPET);
        out.push('\n');
        out.push_str(&html[m.start()..]);
        out
    } else {
        let mut out = html.to_string();
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(LIVERELOAD_SNIPPET);
        out.push('\n');
        out
    }
}

/// Template name for a file: its path relative to `base`, forward slashes.
fn relative_name(base: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(base).ok()?;
    Some(rel.to_string_lossy().replace('\\', "/"))
}
