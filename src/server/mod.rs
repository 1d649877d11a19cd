//! HTTP front end of the vendoring daemon.
//!
//! One route: `POST /vendor/{zip|tar}` with a multipart body carrying a
//! `composer` file part. See [`handler`] for the per-request pipeline.
//!
//! Requests share nothing but the read-only [`ServerConfig`] and the
//! [`DependencyTool`], both behind `Arc`s in [`AppState`]. Each request works
//! in its own staging directory, so concurrent requests never touch the same
//! files.

pub mod download;
pub mod handler;
pub mod request;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use tokio::net::TcpListener;

use crate::composer::DependencyTool;
use crate::config::ServerConfig;
use crate::constants::MAX_UPLOAD_BYTES;

/// Shared, read-only state handed to every request.
pub struct AppState<T> {
    /// Resolved process configuration
    pub config: Arc<ServerConfig>,
    /// Dependency manager used for validate/install/archive
    pub tool: Arc<T>,
}

impl<T> AppState<T> {
    /// Wrap `config` and `tool` for sharing across requests.
    pub fn new(config: ServerConfig, tool: T) -> Self {
        Self {
            config: Arc::new(config),
            tool: Arc::new(tool),
        }
    }
}

// Manual impl: `T` itself need not be `Clone`.
impl<T> Clone for AppState<T> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            tool: Arc::clone(&self.tool),
        }
    }
}

/// Build the router with the vendor route and the upload size limit.
pub fn router<T: DependencyTool>(state: AppState<T>) -> Router {
    Router::new()
        .route("/vendor/:extension", post(handler::vendor_handler::<T>))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

/// Bind the configured address and serve until Ctrl-C.
///
/// # Errors
///
/// Fails if the bind address is invalid or cannot be bound.
pub async fn serve<T: DependencyTool>(config: ServerConfig, tool: T) -> Result<()> {
    let addr = config.bind_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    serve_with_listener(listener, config, tool).await
}

/// Serve on an already-bound listener until Ctrl-C.
///
/// # Errors
///
/// Fails if the server stops with an I/O error.
pub async fn serve_with_listener<T: DependencyTool>(
    listener: TcpListener,
    config: ServerConfig,
    tool: T,
) -> Result<()> {
    let local_addr: SocketAddr = listener.local_addr().context("Failed to read listener address")?;
    tracing::info!(
        addr = %local_addr,
        uploads_dir = %config.uploads_dir.display(),
        "Listening for vendor requests"
    );

    axum::serve(listener, router(AppState::new(config, tool)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
