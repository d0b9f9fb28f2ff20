// src/engine/pending.rs

use std::collections::BTreeSet;

use tracing::debug;

use crate::pipeline::TaskKind;

/// Triggers that arrived while their task was already part of an active run.
///
/// Changes to the same watched category serialize: the re-trigger is
/// remembered here and becomes part of the next run once the current one
/// finishes. Repeated triggers for one task coalesce into a single rerun
/// (last-write-wins).
#[derive(Debug, Default)]
pub struct PendingTriggers {
    tasks: BTreeSet<TaskKind>,
}

impl PendingTriggers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Remember that a task must run again after the current run.
    pub fn record(&mut self, task: TaskKind) {
        let inserted = self.tasks.insert(task);
        debug!(task = %task, inserted, "trigger recorded for next run");
    }

    /// Take every pending task, leaving the set empty.
    pub fn drain(&mut self) -> Vec<TaskKind> {
        let tasks: Vec<TaskKind> = std::mem::take(&mut self.tasks).into_iter().collect();
        debug!(drained = tasks.len(), "drained pending triggers into new run");
        tasks
    }
}
