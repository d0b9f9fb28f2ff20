// src/tasks/executor.rs

//! Task execution layer.
//!
//! Consumes ready tasks from the runtime, runs each body on its own tokio
//! task (file/CPU-bound transforms under `spawn_blocking`), and reports
//! `TaskCompleted` events back. On success the reload notification goes out
//! after the task has finished writing, never before.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::context::PipelineContext;
use crate::engine::{PipelineEvent, TaskOutcome};
use crate::errors::TaskError;
use crate::pipeline::TaskKind;
use crate::serve::{self, ReloadKind};
use crate::tasks::clean::{self, CleanMode};
use crate::tasks::{fonts, images, pages, scripts, styles};

/// Spawn the background executor loop.
///
/// The returned sender is what the runtime uses to dispatch ready tasks.
/// Each task runs on its own tokio task, so the transform group executes in
/// parallel.
pub fn spawn_executor(
    ctx: Arc<PipelineContext>,
    runtime_tx: mpsc::Sender<PipelineEvent>,
) -> mpsc::Sender<TaskKind> {
    let (tx, mut rx) = mpsc::channel::<TaskKind>(32);

    tokio::spawn(async move {
        info!("task executor started");
        while let Some(task) = rx.recv().await {
            let ctx = Arc::clone(&ctx);
            let runtime_tx = runtime_tx.clone();
            tokio::spawn(async move {
                let outcome = match run_task(task, &ctx).await {
                    Ok(()) => TaskOutcome::Success,
                    Err(err) => {
                        error!(task = %task, error = ?err, "task failed");
                        TaskOutcome::Failed
                    }
                };

                let _ = runtime_tx
                    .send(PipelineEvent::TaskCompleted { task, outcome })
                    .await;
            });
        }
        info!("task executor stopped (channel closed)");
    });

    tx
}

async fn run_task(task: TaskKind, ctx: &Arc<PipelineContext>) -> Result<()> {
    info!(task = %task, "running task");

    match task {
        TaskKind::Clean => {
            blocking(ctx, |ctx| clean::run(&ctx.config, CleanMode::KeepCached)).await?;
        }
        TaskKind::Styles => {
            let n = blocking(ctx, styles::run).await?;
            info!(files = n, "stylesheets compiled");
            serve::notify(&ctx.reload, ReloadKind::Page);
        }
        TaskKind::Pages => {
            let n = blocking(ctx, pages::run).await?;
            info!(files = n, "pages rendered");
            serve::notify(&ctx.reload, ReloadKind::Page);
        }
        TaskKind::Images => {
            let n = blocking(ctx, images::run).await?;
            info!(files = n, "images processed");
        }
        TaskKind::Fonts => {
            let n = blocking(ctx, fonts::run).await?;
            info!(files = n, "fonts copied");
            serve::notify(&ctx.reload, ReloadKind::Page);
        }
        TaskKind::Scripts => {
            let n = blocking(ctx, scripts::run).await?;
            info!(files = n, "scripts written");
            serve::notify(&ctx.reload, ReloadKind::Asset);
        }
        TaskKind::Serve => {
            serve::start(ctx).await?;
        }
    }

    Ok(())
}

/// Run a synchronous task body on the blocking pool.
async fn blocking<T, F>(ctx: &Arc<PipelineContext>, body: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&PipelineContext) -> Result<T, TaskError> + Send + 'static,
{
    let ctx = Arc::clone(ctx);
    let result = tokio::task::spawn_blocking(move || body(&ctx)).await?;
    result.map_err(Into::into)
}
