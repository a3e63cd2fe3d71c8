//! Server lifecycle - binding, serving and graceful shutdown.

use crate::{api, config::server::ServerConfig, errors::Result};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tracing::{error, info, instrument};

/// Serves the ticket API and client bundle until Ctrl+C or SIGTERM.
///
/// # Errors
/// Returns an error if the listener cannot be bound or the server fails.
#[instrument(skip_all, fields(address = %config.address()))]
pub async fn run_server(config: ServerConfig, database: DatabaseConnection) -> Result<()> {
    let state = Arc::new(api::AppState::new(database));
    let app = api::router(state, &config.static_dir);

    let address = config.address();
    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
