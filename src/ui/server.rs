//! UI server lifecycle: bind, spawn the axum server in the background,
//! hand back a handle with a shutdown channel.

use std::net::SocketAddr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::client::MatchingService;
use crate::session::Session;

use super::router::ui_router;

/// Why the UI server could not start.
#[derive(Debug, thiserror::Error)]
pub enum UiServerError {
    #[error("Cannot listen for the UI on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("UI listener has no local address: {0}")]
    LocalAddr(#[source] std::io::Error),
}

/// Metadata for a running UI server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiServerInfo {
    pub server_id: String,
    pub server_addr: String,
    pub port: u16,
    pub started_at: String,
}

/// Handle to a running UI server. Dropping it stops the server.
pub struct UiServer {
    pub info: UiServerInfo,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl UiServer {
    /// Ask the server to finish in-flight requests and stop. Idempotent.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!(server_id = %self.info.server_id, "UI server stopping");
        }
    }

    pub fn is_running(&self) -> bool {
        self.shutdown_tx.as_ref().is_some_and(|tx| !tx.is_closed())
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.info.server_addr)
    }
}

impl Drop for UiServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Start the UI server on `addr` (port 0 picks an ephemeral port).
pub async fn start_ui_server_on<S: MatchingService + 'static>(
    session: Arc<Session<S>>,
    addr: SocketAddr,
) -> Result<UiServer, UiServerError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| UiServerError::Bind { addr, source })?;
    let local = listener.local_addr().map_err(UiServerError::LocalAddr)?;

    let info = UiServerInfo {
        server_id: Uuid::new_v4().to_string(),
        server_addr: local.to_string(),
        port: local.port(),
        started_at: chrono::Utc::now().to_rfc3339(),
    };
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let server_id = info.server_id.clone();
    let app = ui_router(session);
    tokio::spawn(async move {
        tracing::info!(%local, %server_id, "UI server listening");
        // A dropped sender also ends the wait
        let stopped = async move {
            let _ = shutdown_rx.await;
        };
        match axum::serve(listener, app).with_graceful_shutdown(stopped).await {
            Ok(()) => tracing::info!(%server_id, "UI server stopped"),
            Err(e) => tracing::error!(%server_id, error = %e, "UI server failed"),
        }
    });

    Ok(UiServer {
        info,
        shutdown_tx: Some(shutdown_tx),
    })
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
