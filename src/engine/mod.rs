// src/engine/mod.rs

//! Orchestration engine for sitepipe.
//!
//! This module ties together:
//! - the task scheduler
//! - the pending-trigger set (changes arriving while a run is active)
//! - the main runtime event loop that reacts to:
//!   - file-watch triggers
//!   - task completion events
//!   - shutdown signals

pub mod pending;
pub mod runtime;

pub use pending::PendingTriggers;
pub use runtime::{PipelineEvent, Runtime, RuntimeOptions, TaskOutcome, TriggerReason};
