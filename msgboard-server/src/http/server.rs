//! Axum server setup
//!
//! Server skeleton with:
//! - Optional permissive CORS (off by default)
//! - Request logging and tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C with a bounded grace period

use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tokio::sync::{watch, Notify};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::middleware::{cut_off_when_forced, log_requests};
use super::routes;
use crate::config::listen_addr;
use crate::error::{Error, Result};
use crate::state::AppState;

/// In-flight requests get this long after the shutdown signal.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// How long cut-off connections get to flush their 503 and close.
pub const CUT_OFF_DRAIN: Duration = Duration::from_secs(1);

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: `:8080`, all interfaces)
    pub addr: String,

    /// Allow permissive CORS (default: false = no CORS headers)
    ///
    /// WARNING: Setting this to true allows any origin.
    pub cors_permissive: bool,

    pub shutdown_grace: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: ":8080".to_string(),
            cors_permissive: false,
            shutdown_grace: SHUTDOWN_GRACE,
        }
    }
}

/// Build the application router with all routes
pub fn build_router(state: AppState, cors_permissive: bool) -> Router {
    let router = Router::new()
        .merge(routes::health::router())
        .merge(routes::messages::router())
        .layer(middleware::from_fn(log_requests))
        .layer(TraceLayer::new_for_http());

    let router = if cors_permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    router.with_state(state)
}

/// How the server stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
    /// Every open connection finished within the grace period.
    Drained,
    /// The grace period ran out; in-flight handlers were cut off.
    Forced,
}

/// Bind the configured address and serve until `shutdown` resolves.
///
/// # Example
///
/// ```ignore
/// let state = AppState::new(Arc::new(PgMessageRepo::new(pool)));
/// run_server(state, ServerConfig::default(), shutdown_signal()).await?;
/// ```
pub async fn run_server<F>(state: AppState, config: ServerConfig, shutdown: F) -> Result<Shutdown>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state, config.cors_permissive);

    let addr = listen_addr(&config.addr);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| Error::Bind {
            addr: addr.clone(),
            source,
        })?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    serve_with_grace(listener, app, shutdown, config.shutdown_grace).await
}

/// Serve `app` on `listener`; after `shutdown` resolves stop accepting and
/// wait at most `grace` for open connections to finish.
///
/// When the grace period runs out every handler still running is dropped
/// and its client gets a 503. Dropping the handler drops whatever store
/// call it was awaiting, so pooled connections are released. Connections
/// that still have not closed after [`CUT_OFF_DRAIN`] are abandoned.
pub async fn serve_with_grace<F>(
    listener: TcpListener,
    app: Router,
    shutdown: F,
    grace: Duration,
) -> Result<Shutdown>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (cut_off, cut_off_rx) = watch::channel(false);
    let app = app.layer(middleware::from_fn_with_state(cut_off_rx, cut_off_when_forced));

    let draining = Arc::new(Notify::new());
    let signalled = Arc::clone(&draining);

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            signalled.notify_one();
        })
        .into_future();
    tokio::pin!(server);

    let outcome = tokio::select! {
        result = &mut server => {
            result?;
            Shutdown::Drained
        }
        _ = async {
            draining.notified().await;
            tokio::time::sleep(grace).await;
        } => {
            tracing::warn!(
                grace_secs = grace.as_secs_f64(),
                "Grace period elapsed, cutting off in-flight requests"
            );
            cut_off.send_replace(true);
            Shutdown::Forced
        }
    };

    if outcome == Shutdown::Forced
        && tokio::time::timeout(CUT_OFF_DRAIN, &mut server).await.is_err()
    {
        tracing::warn!("Connections still open after cut-off, abandoning them");
    }

    tracing::info!(?outcome, "Server shutdown complete");
    Ok(outcome)
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::warn!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::warn!("Received SIGTERM, starting shutdown");
        }
    }
}
