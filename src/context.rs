// src/context.rs

use std::sync::atomic::AtomicBool;

use tokio::sync::broadcast;

use crate::config::SiteConfig;
use crate::serve::ReloadKind;

/// Shared, read-only state handed to every task body.
///
/// Built once at startup; nothing here mutates afterwards except the
/// reload channel and the server-started latch.
#[derive(Debug)]
pub struct PipelineContext {
    pub config: SiteConfig,

    /// Enables the production optimization passes.
    pub production: bool,

    /// Whether rendered pages get the live-reload client snippet.
    pub live_reload: bool,

    /// Fan-out channel for reload notifications to connected browsers.
    pub reload: broadcast::Sender<ReloadKind>,

    /// Latch making the reload server start idempotent within a session.
    pub server_started: AtomicBool,
}

impl PipelineContext {
    pub fn new(config: SiteConfig, production: bool, live_reload: bool) -> Self {
        let (reload, _) = broadcast::channel(16);
        Self {
            config,
            production,
            live_reload,
            reload,
            server_started: AtomicBool::new(false),
        }
    }
}
