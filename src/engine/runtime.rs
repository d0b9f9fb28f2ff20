// src/engine/runtime.rs

use anyhow::{Result, bail};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::engine::pending::PendingTriggers;
use crate::pipeline::{Scheduler, TaskKind};

/// Reason why a task was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerReason {
    /// Seeded at pipeline start.
    Startup,
    /// A watched source file changed.
    FileChange,
}

/// Result of a task body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Success,
    Failed,
}

/// Events sent into the runtime from watchers, the executor, or external
/// signals.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    TaskTriggered {
        task: TaskKind,
        reason: TriggerReason,
    },
    TaskCompleted {
        task: TaskKind,
        outcome: TaskOutcome,
    },
    ShutdownRequested,
}

/// Options that influence how the runtime behaves.
#[derive(Debug, Clone, Default)]
pub struct RuntimeOptions {
    /// If true, exit as soon as there is nothing left to run and no pending
    /// triggers. In watch mode this is `false`.
    pub exit_when_idle: bool,
}

/// The main orchestration runtime.
///
/// Responsibilities:
/// - Consume `PipelineEvent`s from watchers/executor/ctrl-c.
/// - Admit concurrent triggers for distinct tasks into the active run, while
///   serializing re-triggers of a task that is already participating.
/// - Drive the scheduler and send ready tasks to the executor.
pub struct Runtime {
    scheduler: Scheduler,
    pending: PendingTriggers,
    options: RuntimeOptions,

    /// Unified event stream from all producers.
    events_rx: mpsc::Receiver<PipelineEvent>,

    /// Channel to the executor: ready tasks are sent here.
    exec_tx: mpsc::Sender<TaskKind>,
}

impl Runtime {
    pub fn new(
        scheduler: Scheduler,
        pending: PendingTriggers,
        options: RuntimeOptions,
        events_rx: mpsc::Receiver<PipelineEvent>,
        exec_tx: mpsc::Sender<TaskKind>,
    ) -> Self {
        Self {
            scheduler,
            pending,
            options,
            events_rx,
            exec_tx,
        }
    }

    /// Main event loop.
    ///
    /// Returns when a shutdown is requested, when the pipeline goes idle in
    /// `exit_when_idle` mode, or with an error when a fatal task fails.
    pub async fn run(mut self) -> Result<()> {
        info!("pipeline runtime started");

        while let Some(event) = self.events_rx.recv().await {
            debug!(?event, "runtime received event");

            let keep_running = match event {
                PipelineEvent::TaskTriggered { task, reason } => {
                    self.handle_task_trigger(task, reason).await?
                }
                PipelineEvent::TaskCompleted { task, outcome } => {
                    self.handle_task_completion(task, outcome).await?
                }
                PipelineEvent::ShutdownRequested => {
                    info!("shutdown requested, stopping runtime");
                    false
                }
            };

            if !keep_running {
                break;
            }
        }

        info!("pipeline runtime exiting");
        Ok(())
    }

    /// Handle a trigger (startup seeding or a file-change event).
    async fn handle_task_trigger(&mut self, task: TaskKind, reason: TriggerReason) -> Result<bool> {
        info!(task = %task, ?reason, "task triggered");

        if self.scheduler.is_idle() {
            // Starting a new run: combine this trigger with anything that was
            // left pending by a previous run.
            let mut triggers = self.pending.drain();
            if !triggers.contains(&task) {
                triggers.push(task);
            }
            self.start_new_run(triggers).await?;
        } else if self.scheduler.is_participating(task) {
            // Same task again while it is part of the active run: serialize
            // by deferring to the next run.
            self.pending.record(task);
        } else {
            // A different task while a run is active: admit it into the
            // current run so unrelated changes never block each other.
            let ready = self.scheduler.handle_trigger(task);
            self.dispatch(ready).await?;
        }

        Ok(true)
    }

    /// Handle completion of a task body, success or failure.
    async fn handle_task_completion(
        &mut self,
        task: TaskKind,
        outcome: TaskOutcome,
    ) -> Result<bool> {
        match outcome {
            TaskOutcome::Success => info!(task = %task, "task completed"),
            TaskOutcome::Failed => {
                warn!(task = %task, "task failed");
                if self.scheduler.is_fatal(task) {
                    bail!("task '{task}' failed; aborting pipeline");
                }
            }
        }

        let newly_ready = self.scheduler.handle_completion(task, outcome);
        self.dispatch(newly_ready).await?;

        self.maybe_start_pending_run().await?;

        if self.options.exit_when_idle && self.scheduler.is_idle() && self.pending.is_empty() {
            info!("runtime idle and exit_when_idle=true, stopping");
            return Ok(false);
        }

        Ok(true)
    }

    /// Start a brand-new run from the given set of triggers.
    async fn start_new_run(&mut self, triggers: Vec<TaskKind>) -> Result<()> {
        if triggers.is_empty() {
            debug!("start_new_run called with empty trigger set; nothing to do");
            return Ok(());
        }

        info!(?triggers, "starting new run");

        self.scheduler.start_new_run();

        for task in triggers {
            let newly_ready = self.scheduler.handle_trigger(task);
            self.dispatch(newly_ready).await?;
        }

        Ok(())
    }

    /// If the scheduler is idle and there are pending triggers, start a new
    /// run from them.
    async fn maybe_start_pending_run(&mut self) -> Result<()> {
        if !self.scheduler.is_idle() {
            return Ok(());
        }

        let triggers = self.pending.drain();
        if triggers.is_empty() {
            return Ok(());
        }

        self.start_new_run(triggers).await
    }

    /// Send all ready tasks to the executor.
    async fn dispatch(&mut self, tasks: Vec<TaskKind>) -> Result<()> {
        for task in tasks {
            debug!(task = %task, "dispatching task to executor");
            if let Err(err) = self.exec_tx.send(task).await {
                error!(error = %err, "failed to send task to executor");
                return Err(err.into());
            }
        }
        Ok(())
    }
}
