use std::future::IntoFuture;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
use tracing::info;

use crate::app::app;
use crate::config::AppConfig;
use crate::database::{Database, DatabaseManager};
use crate::state::AppState;

/// Run the HTTP server until SIGINT or SIGTERM, then close the store
pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    info!("Starting Recipes API in {:?} mode", config.environment);

    let db: Arc<dyn Database> = DatabaseManager::connect(&config.database)
        .await
        .context("failed to open the database")?;

    let bind_addr = config.bind_addr();
    let state = AppState::new(config, db.clone()).context("failed to build application state")?;

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!("Recipes API listening on http://{}", bind_addr);

    let served = close_after(
        db.as_ref(),
        axum::serve(listener, app(state)).with_graceful_shutdown(shutdown_signal()),
    )
    .await;
    served.context("server error")?;

    info!("Server shut down");
    Ok(())
}

/// Await `work`, then close the store whatever the outcome
async fn close_after<F>(db: &dyn Database, work: F) -> F::Output
where
    F: IntoFuture,
{
    let output = work.await;
    db.close().await;
    output
}

/// Create the Postgres tables and exit
pub async fn migrate(config: AppConfig) -> anyhow::Result<()> {
    let db = DatabaseManager::connect_postgres(&config.database)
        .await
        .context("failed to connect to postgres")?;
    db.ensure_schema().await.context("failed to create tables")?;
    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
