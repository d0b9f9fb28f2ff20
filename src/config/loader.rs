// src/config/loader.rs

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::model::SiteConfig;
use crate::config::validate::validate_config;

/// Default config path, relative to the current working directory.
pub const DEFAULT_CONFIG_PATH: &str = "Sitepipe.toml";

/// Load a configuration file from a given path and return the raw
/// `SiteConfig`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_or_default`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<SiteConfig> {
    let path = path.as_ref();
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading config file at {path:?}"))?;

    let config: SiteConfig = toml::from_str(&contents)
        .with_context(|| format!("parsing TOML config from {path:?}"))?;

    Ok(config)
}

/// Resolve, load and validate the configuration.
///
/// - With an explicit `path`, the file must exist and parse.
/// - Without one, `Sitepipe.toml` is used when present, otherwise the
///   built-in defaults apply.
///
/// This is the entry point the rest of the application uses.
pub fn load_or_default(path: Option<&Path>) -> Result<SiteConfig> {
    let config = match path {
        Some(p) => load_from_path(p)?,
        None => {
            let default = Path::new(DEFAULT_CONFIG_PATH);
            if default.exists() {
                load_from_path(default)?
            } else {
                debug!("no {DEFAULT_CONFIG_PATH} found; using built-in layout");
                SiteConfig::default()
            }
        }
    };

    validate_config(&config)?;
    Ok(config)
}
