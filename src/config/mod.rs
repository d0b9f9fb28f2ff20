// src/config/mod.rs

//! Configuration loading and validation for sitepipe.
//!
//! Responsibilities:
//! - Define the TOML-backed path/glob registry (`model.rs`).
//! - Load a config file from disk, or fall back to the built-in layout
//!   (`loader.rs`).
//! - Validate startup invariants like disjoint source/destination roots
//!   (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_from_path, load_or_default};
pub use model::{BrowserSection, DestSection, ServerSection, SiteConfig, SourceSection};
pub use validate::validate_config;
