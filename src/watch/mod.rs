// src/watch/mod.rs

//! File watching and change-to-task mapping.
//!
//! This module is responsible for:
//! - Compiling the per-task watch glob patterns from the path registry.
//! - Wiring up a cross-platform filesystem watcher (`notify`).
//!
//! It does **not** know about the task graph; it only turns filesystem
//! changes into task-level triggers.

pub mod patterns;
pub mod watcher;

pub use patterns::{TaskWatchProfile, build_watch_profiles, lenient_globset};
pub use watcher::{WatcherHandle, spawn_watcher};
