//! Server startup helper for embedding in the engine.
//!
//! Provides [`spawn_observer`] which binds the display surface and runs it
//! on a background Tokio task, so the HTTP API runs concurrently with the
//! poll loop.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::server::{ServerConfig, ServerError, bind, start_server};
use crate::state::AppState;

/// Handle to a running display surface.
#[derive(Debug)]
pub struct ObserverHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
    addr: std::net::SocketAddr,
}

impl ObserverHandle {
    /// The address the server is listening on.
    pub const fn local_addr(&self) -> std::net::SocketAddr {
        self.addr
    }

    /// Stop accepting connections and wait for in-flight requests.
    pub async fn shutdown(self) {
        let _ = self.stop.send(true);
        let _ = self.task.await;
    }
}

/// Bind the display surface and serve it on a background task.
///
/// The bind happens before spawning, so a taken port is reported to the
/// caller instead of only being logged.
///
/// # Errors
///
/// Returns [`ServerError::Bind`] if the server cannot bind to the
/// requested address.
pub async fn spawn_observer(
    config: &ServerConfig,
    state: Arc<AppState>,
) -> Result<ObserverHandle, ServerError> {
    let listener = bind(config).await?;
    let addr = listener
        .local_addr()
        .map_err(|e| ServerError::Bind(format!("listener has no local address: {e}")))?;

    let (stop, mut stopped) = watch::channel(false);
    let shutdown = async move {
        // Either an explicit stop or a dropped handle ends the server.
        let _ = stopped.wait_for(|stop| *stop).await;
    };

    let task = tokio::spawn(async move {
        if let Err(e) = start_server(listener, state, shutdown).await {
            tracing::error!(error = %e, "display surface exited with error");
        }
    });

    tracing::info!(%addr, "display surface spawned on background task");

    Ok(ObserverHandle { stop, task, addr })
}
