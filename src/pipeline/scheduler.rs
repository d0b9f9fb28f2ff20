// src/pipeline/scheduler.rs

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::engine::TaskOutcome;
use crate::pipeline::graph::{TaskGraph, TaskKind};

/// Per-run state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    /// Task was triggered for this run but is waiting on dependencies.
    Pending,
    /// Task has been dispatched to the executor and is currently running.
    Running,
    /// Task completed successfully in this run.
    DoneSuccess,
    /// Task failed in this run (or was blocked by a failed dependency).
    DoneFailed,
}

/// Per-task bookkeeping: static dependency list plus run-scoped state.
#[derive(Debug, Clone)]
struct TaskEntry {
    deps: Vec<TaskKind>,

    /// Per-run state (`None` if not participating in the current run).
    run_state: Option<RunState>,

    /// Last run ID in which this task succeeded.
    ///
    /// A dependency that is not part of the current run counts as satisfied
    /// when it has a recorded success; this is what lets a file-change run
    /// re-render one task without restarting the reload server it depends on.
    last_successful_run: Option<u64>,
}

/// Scheduler holds the immutable task graph plus mutable per-run state.
///
/// It is responsible for:
/// - remembering which tasks are part of the current run
/// - deciding when a triggered task is "ready" to run (deps satisfied)
/// - scheduling dependents as their dependencies complete
/// - failing dependents when a task fails
pub struct Scheduler {
    graph: TaskGraph,
    entries: HashMap<TaskKind, TaskEntry>,

    /// Monotonically increasing run ID.
    run_counter: u64,
    /// Currently active run ID, or `None` if there is no active run.
    current_run_id: Option<u64>,
}

impl Scheduler {
    pub fn new(graph: TaskGraph) -> Self {
        let entries = graph
            .tasks()
            .map(|task| {
                let entry = TaskEntry {
                    deps: graph.dependencies_of(task),
                    run_state: None,
                    last_successful_run: None,
                };
                (task, entry)
            })
            .collect();

        Self {
            graph,
            entries,
            run_counter: 0,
            current_run_id: None,
        }
    }

    /// Returns `true` if there is currently no active run.
    pub fn is_idle(&self) -> bool {
        self.current_run_id.is_none()
    }

    /// Whether the task has any state in the current run.
    pub fn is_participating(&self, task: TaskKind) -> bool {
        self.entries
            .get(&task)
            .is_some_and(|entry| entry.run_state.is_some())
    }

    /// Whether a failure of this task halts the process.
    pub fn is_fatal(&self, task: TaskKind) -> bool {
        self.graph.is_fatal(task)
    }

    /// Start a new run, resetting per-run state but keeping historical
    /// success information for dependency satisfaction on later runs.
    pub fn start_new_run(&mut self) {
        self.run_counter += 1;
        self.current_run_id = Some(self.run_counter);

        for entry in self.entries.values_mut() {
            entry.run_state = None;
        }

        debug!(run_id = self.run_counter, "scheduler: starting new run");
    }

    /// Admit a task into the current run.
    ///
    /// Called by the runtime whenever a task should participate in the
    /// current run (at startup, or on a file-change trigger). Returns the
    /// tasks that are now ready to be executed.
    pub fn handle_trigger(&mut self, task: TaskKind) -> Vec<TaskKind> {
        if self.current_run_id.is_none() {
            self.start_new_run();
        }

        match self.entries.get_mut(&task) {
            Some(entry) => match entry.run_state {
                None => {
                    entry.run_state = Some(RunState::Pending);
                    debug!(task = %task, "task marked as Pending in this run");
                }
                Some(_) => {
                    debug!(
                        task = %task,
                        "task already participating in current run; ignoring trigger"
                    );
                }
            },
            None => {
                warn!(task = %task, "trigger for task outside the graph; ignoring");
            }
        }

        let ready = self.collect_new_ready_tasks();
        self.maybe_finish_run();
        ready
    }

    /// Handle completion of a task with a concrete outcome.
    ///
    /// On success the task's historical success is recorded and dependents
    /// whose dependencies are now satisfied become ready. On failure all
    /// participating dependents in this run fail transitively.
    pub fn handle_completion(&mut self, task: TaskKind, outcome: TaskOutcome) -> Vec<TaskKind> {
        let run_id = match self.current_run_id {
            Some(id) => id,
            None => {
                warn!(task = %task, "completion with no active run; ignoring");
                return Vec::new();
            }
        };

        let mut newly_ready = Vec::new();

        match self.entries.get_mut(&task) {
            Some(entry) => match outcome {
                TaskOutcome::Success => {
                    entry.run_state = Some(RunState::DoneSuccess);
                    entry.last_successful_run = Some(run_id);
                    debug!(task = %task, "task completed successfully");
                    newly_ready.extend(self.collect_new_ready_tasks());
                }
                TaskOutcome::Failed => {
                    entry.run_state = Some(RunState::DoneFailed);
                    warn!(task = %task, "task failed; failing dependents in this run");
                    self.mark_dependents_failed(task);
                }
            },
            None => {
                warn!(task = %task, "completion for task outside the graph; ignoring");
            }
        }

        self.maybe_finish_run();
        newly_ready
    }

    /// Clear `current_run_id` once every participating task is terminal.
    fn maybe_finish_run(&mut self) {
        if self.current_run_id.is_none() {
            return;
        }

        let any_active = self.entries.values().any(|entry| {
            matches!(
                entry.run_state,
                Some(RunState::Pending) | Some(RunState::Running)
            )
        });

        if !any_active {
            info!(run_id = self.current_run_id, "scheduler: run finished");
            self.current_run_id = None;
        }
    }

    /// Collect tasks that are `Pending` with satisfied dependencies, mark
    /// them `Running`, and return them in deterministic order.
    fn collect_new_ready_tasks(&mut self) -> Vec<TaskKind> {
        let mut ready: Vec<TaskKind> = self
            .entries
            .iter()
            .filter_map(|(task, entry)| {
                if matches!(entry.run_state, Some(RunState::Pending))
                    && self.deps_satisfied(entry)
                {
                    Some(*task)
                } else {
                    None
                }
            })
            .collect();
        ready.sort();

        for task in &ready {
            if let Some(entry) = self.entries.get_mut(task) {
                debug!(task = %task, "dependencies satisfied; marking Running");
                entry.run_state = Some(RunState::Running);
            }
        }

        ready
    }

    /// Check whether all dependencies of a task are satisfied for the
    /// current run.
    ///
    /// A dependency is satisfied when it completed successfully in this run,
    /// or when it is not participating in this run but succeeded in an
    /// earlier one. A failed or still-active dependency blocks the task.
    fn deps_satisfied(&self, entry: &TaskEntry) -> bool {
        for dep_name in &entry.deps {
            let Some(dep) = self.entries.get(dep_name) else {
                return false;
            };

            match dep.run_state {
                Some(RunState::DoneSuccess) => {}
                Some(RunState::DoneFailed) => return false,
                Some(RunState::Pending) | Some(RunState::Running) => return false,
                None => {
                    if dep.last_successful_run.is_none() {
                        return false;
                    }
                }
            }
        }

        true
    }

    /// Mark all participating dependents (transitively) of a failed task as
    /// `DoneFailed` for this run.
    fn mark_dependents_failed(&mut self, failed_task: TaskKind) {
        let mut stack = self.graph.dependents_of(failed_task);

        while let Some(task) = stack.pop() {
            if let Some(entry) = self.entries.get_mut(&task) {
                match entry.run_state {
                    Some(RunState::Pending) | Some(RunState::Running) => {
                        entry.run_state = Some(RunState::DoneFailed);
                        debug!(task = %task, "failing dependent due to upstream failure");
                        stack.extend(self.graph.dependents_of(task));
                    }
                    Some(RunState::DoneSuccess) | Some(RunState::DoneFailed) | None => {}
                }
            }
        }
    }
}
