pub mod chat; // Scripted donor chat
pub mod client; // Matching service API client
pub mod commands;
pub mod config;
pub mod directory; // Patient directory cache
pub mod matching; // Request builder, response normalizer
pub mod models;
pub mod render; // Results list, map, graph
pub mod session;
pub mod ui; // axum UI adapter

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

/// Fatal startup or shutdown failure.
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error(transparent)]
    Client(#[from] client::ApiError),
    #[error(transparent)]
    Ui(#[from] ui::UiServerError),
    #[error("Failed to listen for shutdown signal: {0}")]
    Signal(#[source] std::io::Error),
}

pub fn run() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(serve(config::DEFAULT_UI_ADDR)) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

/// Resolve the matching service, warm the patient directory and serve the
/// UI until Ctrl-C.
async fn serve(ui_addr: SocketAddr) -> Result<(), ServeError> {
    let sources = config::BaseUrlSources::gather(ui_addr, ui::INDEX_HTML);
    let base_url = config::resolve_api_base_url(&sources);
    tracing::info!(%base_url, "Matching service base URL resolved");

    let client = client::ApiClient::new(&base_url)?;
    let session = Arc::new(session::Session::new(client));

    // The page reloads the list itself, so a failure here is not fatal
    match commands::load_patients(&session).await {
        Ok(list) => tracing::info!(patients = list.total, "Initial patient load complete"),
        Err(e) => tracing::warn!(error = %e, "Initial patient load failed"),
    }

    let mut server = ui::start_ui_server_on(Arc::clone(&session), ui_addr).await?;
    tracing::info!(url = %server.url(), "UI ready");

    tokio::signal::ctrl_c().await.map_err(ServeError::Signal)?;
    server.shutdown();
    Ok(())
}
