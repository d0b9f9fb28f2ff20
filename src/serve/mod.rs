// src/serve/mod.rs

//! Development HTTP server with live reload.
//!
//! Serves the destination tree as static files and exposes a
//! server-sent-events endpoint that pushes reload notifications to
//! connected browser clients. Rendered pages reference the embedded client
//! script, which listens on that endpoint and refreshes the page (or just
//! its assets) when a transform task finishes writing.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::Ordering;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::get;
use futures::stream::{Stream, StreamExt};
use tokio::net::TcpListener;
use tokio_stream::wrappers::BroadcastStream;
use tower_http::services::ServeDir;
use tracing::{debug, error, info, trace};

use crate::context::PipelineContext;

/// SSE endpoint the client script subscribes to.
pub const LIVERELOAD_EVENTS_PATH: &str = "/__livereload";

/// Path serving the embedded client script.
pub const LIVERELOAD_SCRIPT_PATH: &str = "/__livereload.js";

/// Snippet injected into rendered pages in watch mode.
pub const LIVERELOAD_SNIPPET: &str = r#"<script src="/__livereload.js"></script>"#;

const CLIENT_SCRIPT: &str = include_str!("client.js");

/// What a reload notification asks connected clients to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadKind {
    /// Reload the whole page.
    Page,
    /// Refresh assets in place without a navigation.
    Asset,
}

impl ReloadKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ReloadKind::Page => "page",
            ReloadKind::Asset => "asset",
        }
    }
}

/// Push a reload notification to all connected clients.
///
/// A send with no connected clients is a no-op.
pub fn notify(tx: &tokio::sync::broadcast::Sender<ReloadKind>, kind: ReloadKind) {
    trace!(kind = kind.as_str(), "reload notification");
    let _ = tx.send(kind);
}

/// Start the reload server over the destination root.
///
/// Completes once the listener is bound; the server itself runs on a
/// background task for the rest of the process lifetime. Starting twice
/// within one session is a no-op.
pub async fn start(ctx: &PipelineContext) -> Result<()> {
    if ctx.server_started.swap(true, Ordering::SeqCst) {
        debug!("reload server already running; ignoring restart");
        return Ok(());
    }

    let addr = SocketAddr::from(([127, 0, 0, 1], ctx.config.server.port));
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            ctx.server_started.store(false, Ordering::SeqCst);
            return Err(err).with_context(|| format!("binding reload server to {addr}"));
        }
    };

    let root = ctx.config.dest_root();
    info!(%addr, root = ?root, "reload server listening");

    let app = router(root, ctx.reload.clone());
    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, app).await {
            error!(error = %err, "reload server terminated");
        }
    });

    Ok(())
}

fn router(root: PathBuf, reload_tx: tokio::sync::broadcast::Sender<ReloadKind>) -> Router {
    Router::new()
        .route(LIVERELOAD_EVENTS_PATH, get(reload_events))
        .route(LIVERELOAD_SCRIPT_PATH, get(client_script))
        .fallback_service(ServeDir::new(root))
        .with_state(reload_tx)
}

async fn client_script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        CLIENT_SCRIPT,
    )
}

async fn reload_events(
    State(reload_tx): State<tokio::sync::broadcast::Sender<ReloadKind>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = reload_tx.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|msg| async move {
        msg.ok()
            .map(|kind| Ok(Event::default().event("reload").data(kind.as_str())))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
