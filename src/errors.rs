// src/errors.rs

//! Task-level error taxonomy.
//!
//! Orchestration code propagates `anyhow::Result`; the task bodies use this
//! structured enum so a failed transform names the file it choked on.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the transform and clean tasks.
///
/// A `TaskError` is task-local: it fails the current run of one task and is
/// logged, but it never tears down a watch session. The one exception is the
/// clean task, whose failure the runtime treats as fatal.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("stylesheet {path:?} failed to compile: {message}")]
    StyleCompile { path: PathBuf, message: String },

    #[error("failed to load templates")]
    TemplateLoad {
        #[source]
        source: tera::Error,
    },

    #[error("failed to render page '{name}'")]
    TemplateRender {
        name: String,
        #[source]
        source: tera::Error,
    },

    #[error("failed to read template data {path:?}")]
    DataRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("template data {path:?} is not valid JSON")]
    DataParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("template data {path:?} cannot be used as a render context")]
    DataContext {
        path: PathBuf,
        #[source]
        source: tera::Error,
    },

    #[error("image optimization failed for {path:?}: {message}")]
    ImageOptimize { path: PathBuf, message: String },

    #[error("script minification failed for {path:?}: {message}")]
    ScriptMinify { path: PathBuf, message: String },

    #[error("failed to read {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to copy {src:?} to {dst:?}")]
    Copy {
        src: PathBuf,
        dst: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create directory {path:?}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to remove {path:?}")]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
