// src/config/validate.rs

use std::path::Component;
use std::path::Path;

use anyhow::{Result, anyhow};

use crate::config::model::SiteConfig;

/// Run startup validation against a loaded configuration.
///
/// This checks:
/// - source and destination roots are set and distinct
/// - the destination root is not inside the source root (a watch session
///   would otherwise re-trigger on its own output)
/// - the server port is non-zero
/// - the browser target list is non-empty
/// - `preserve` entries are plain relative subpaths
///
/// It does **not** validate glob matching: an asset category that matches no
/// files is an empty task run, not an error.
pub fn validate_config(cfg: &SiteConfig) -> Result<()> {
    if cfg.source.root.trim().is_empty() {
        return Err(anyhow!("[source].root must not be empty"));
    }
    if cfg.dest.root.trim().is_empty() {
        return Err(anyhow!("[dest].root must not be empty"));
    }

    let source = cfg.source_root();
    let dest = cfg.dest_root();
    if source == dest {
        return Err(anyhow!(
            "[source].root and [dest].root must differ (both are {source:?})"
        ));
    }
    if dest.starts_with(&source) {
        return Err(anyhow!(
            "[dest].root {dest:?} must not live inside [source].root {source:?}"
        ));
    }

    if cfg.server.port == 0 {
        return Err(anyhow!("[server].port must be non-zero"));
    }

    if cfg.browsers.targets.is_empty() {
        return Err(anyhow!("[browsers].targets must list at least one query"));
    }

    for entry in &cfg.dest.preserve {
        if !is_plain_subpath(entry) {
            return Err(anyhow!(
                "[dest].preserve entry '{entry}' must be a relative subpath of the destination root"
            ));
        }
    }

    Ok(())
}

fn is_plain_subpath(entry: &str) -> bool {
    if entry.trim().is_empty() {
        return false;
    }
    Path::new(entry)
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
}
