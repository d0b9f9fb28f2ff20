// src/watch/patterns.rs

use std::fmt;

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::warn;

use crate::config::SiteConfig;
use crate::pipeline::TaskKind;

/// Compiled watch glob patterns for a single task.
///
/// Patterns are relative to the source root; the watcher passes relative
/// paths (e.g. `"assets/scss/main.scss"`) into [`TaskWatchProfile::matches`].
#[derive(Clone)]
pub struct TaskWatchProfile {
    task: TaskKind,
    set: GlobSet,
}

impl fmt::Debug for TaskWatchProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskWatchProfile")
            .field("task", &self.task)
            .finish_non_exhaustive()
    }
}

impl TaskWatchProfile {
    /// The task this profile triggers.
    pub fn task(&self) -> TaskKind {
        self.task
    }

    /// Returns true if this task owns the given path (relative to the
    /// source root).
    pub fn matches(&self, rel_path: &str) -> bool {
        self.set.is_match(rel_path)
    }
}

/// Build the watch profile of every transform task from the path registry.
///
/// The pages task additionally owns the shared template include path and the
/// JSON data file, since a change to either invalidates every rendered page.
pub fn build_watch_profiles(cfg: &SiteConfig) -> Vec<TaskWatchProfile> {
    let src = &cfg.source;

    vec![
        profile(TaskKind::Styles, &[format!("{}/**/*.scss", src.styles)]),
        profile(
            TaskKind::Pages,
            &[
                format!("{}/**/*.html", src.pages),
                format!("{}/**/*", src.templates),
                src.data.clone(),
            ],
        ),
        profile(
            TaskKind::Images,
            &[format!("{}/**/*.{{png,jpg,jpeg,gif,svg}}", src.images)],
        ),
        profile(TaskKind::Fonts, &[format!("{}/**/*", src.fonts)]),
        profile(TaskKind::Scripts, &[format!("{}/**/*.js", src.scripts)]),
    ]
}

fn profile(task: TaskKind, patterns: &[String]) -> TaskWatchProfile {
    TaskWatchProfile {
        task,
        set: lenient_globset(patterns),
    }
}

/// Build a `GlobSet` from string patterns, degrading instead of failing.
///
/// A malformed pattern is logged and skipped, so it yields an empty match
/// set rather than an error.
pub fn lenient_globset(patterns: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        match Glob::new(pat) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(err) => {
                warn!(pattern = %pat, error = %err, "ignoring invalid watch pattern");
            }
        }
    }

    builder.build().unwrap_or_else(|err| {
        warn!(error = %err, "failed to build watch globset; matching nothing");
        GlobSet::empty()
    })
}
