// src/lib.rs

pub mod cli;
pub mod config;
pub mod context;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod pipeline;
pub mod serve;
pub mod tasks;
pub mod watch;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::info;

use crate::cli::{CliArgs, Command};
use crate::config::{SiteConfig, load_or_default};
use crate::context::PipelineContext;
use crate::engine::{
    PendingTriggers, PipelineEvent, Runtime, RuntimeOptions, TriggerReason,
};
use crate::pipeline::{PipelineMode, Scheduler, TaskGraph, TaskKind};
use crate::tasks::clean::{self, CleanMode};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the task graph / scheduler / runtime
/// - the executor
/// - (in watch modes) the file watcher
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = args.config.as_deref().map(Path::new);
    let cfg = load_or_default(config_path)?;

    match args.command {
        Command::Clean => {
            clean::run(&cfg, CleanMode::Full).context("cleaning destination tree")?;
            Ok(())
        }
        Command::CleanDist => {
            clean::run(&cfg, CleanMode::KeepCached).context("cleaning destination tree")?;
            Ok(())
        }
        Command::Build => run_pipeline(cfg, PipelineMode::Build, args.production).await,
        Command::Watch => run_pipeline(cfg, PipelineMode::Watch, args.production).await,
        Command::Styles => {
            run_pipeline(cfg, PipelineMode::Single(TaskKind::Styles), args.production).await
        }
        Command::Pages => {
            run_pipeline(cfg, PipelineMode::Single(TaskKind::Pages), args.production).await
        }
        Command::Images => {
            run_pipeline(cfg, PipelineMode::Single(TaskKind::Images), args.production).await
        }
        Command::Fonts => {
            run_pipeline(cfg, PipelineMode::Single(TaskKind::Fonts), args.production).await
        }
        Command::Scripts => {
            run_pipeline(cfg, PipelineMode::Single(TaskKind::Scripts), args.production).await
        }
        Command::Serve => {
            run_pipeline(cfg, PipelineMode::Single(TaskKind::Serve), args.production).await
        }
    }
}

async fn run_pipeline(cfg: SiteConfig, mode: PipelineMode, production: bool) -> Result<()> {
    let graph = TaskGraph::for_mode(mode);
    let order = graph.topo_order()?;
    info!(
        order = ?order.iter().map(|t| t.name()).collect::<Vec<_>>(),
        production,
        "task pipeline resolved"
    );

    let scheduler = Scheduler::new(graph);

    // Runtime event channel.
    let (rt_tx, rt_rx) = mpsc::channel::<PipelineEvent>(64);

    let watching = matches!(mode, PipelineMode::Build | PipelineMode::Watch);
    let live_reload = watching && !production;
    let ctx = Arc::new(PipelineContext::new(cfg.clone(), production, live_reload));

    // Task executor.
    let exec_tx = tasks::executor::spawn_executor(Arc::clone(&ctx), rt_tx.clone());

    // File watcher (watch modes only).
    let _watcher_handle = if watching {
        let profiles = watch::build_watch_profiles(&cfg);
        Some(watch::spawn_watcher(cfg.source_root(), profiles, rt_tx.clone())?)
    } else {
        None
    };

    // Ctrl-C -> graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(PipelineEvent::ShutdownRequested).await;
        });
    }

    // Seed the initial run with every task in the graph, in dependency
    // order; the scheduler holds dependents back until their deps complete.
    for task in order {
        rt_tx
            .send(PipelineEvent::TaskTriggered {
                task,
                reason: TriggerReason::Startup,
            })
            .await?;
    }

    let options = RuntimeOptions {
        // Single-task invocations finish and exit; watch modes and the bare
        // server run until interrupted.
        exit_when_idle: matches!(mode, PipelineMode::Single(task) if task != TaskKind::Serve),
    };

    let runtime = Runtime::new(scheduler, PendingTriggers::new(), options, rt_rx, exec_tx);
    runtime.run().await
}
