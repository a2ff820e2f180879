//! Server startup helper for the portal binary.
//!
//! Provides [`spawn_api`] which binds the listener and then serves the
//! API on a background Tokio task, so the binary can run it alongside the
//! aggregation session and stop it on shutdown.

use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::server::{self, ServerConfig, ServerError};
use crate::state::AppState;

/// Errors that can occur when spawning the portal server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The server failed to bind or start.
    #[error("server start error: {0}")]
    Server(#[from] ServerError),
}

/// Spawn the portal HTTP server on a background Tokio task.
///
/// The listener is bound before the task is spawned, so a port already
/// in use is reported here rather than logged from the task. The server
/// stops accepting connections once `shutdown` resolves; await the
/// returned handle to wait for in-flight requests to drain.
///
/// # Errors
///
/// Returns [`StartupError::Server`] if the address is invalid or cannot
/// be bound.
pub async fn spawn_api<F>(
    config: &ServerConfig,
    state: Arc<AppState>,
    shutdown: F,
) -> Result<JoinHandle<()>, StartupError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = server::bind(config).await?;

    let handle = tokio::spawn(async move {
        if let Err(e) = server::serve(listener, state, shutdown).await {
            tracing::error!(error = %e, "Portal server exited with error");
        }
    });

    tracing::info!(port = config.port, "Portal server spawned on background task");

    Ok(handle)
}
