// src/pipeline/mod.rs

//! Task graph and scheduling.
//!
//! - [`graph`] declares the fixed set of pipeline tasks and builds the
//!   directed acyclic dependency graph for each invocation mode.
//! - [`scheduler`] contains the per-run state machine that decides which
//!   tasks are ready to run, and when dependents can be scheduled.

pub mod graph;
pub mod scheduler;

pub use graph::{PipelineMode, TaskGraph, TaskKind};
pub use scheduler::Scheduler;
