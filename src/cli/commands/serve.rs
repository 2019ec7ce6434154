//! Serve command implementation
//!
//! Loads the directory, connects the store and serves HTTP until Ctrl-C.
//! On Unix a SIGHUP reloads the station dataset without a restart.

use super::shared::{connect_store, load_directory, setup_logging};
use crate::Result;
use crate::app::services::sighting_store::PgSightingStore;
use crate::app::services::station_directory::DirectoryHandle;
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::server::{self, AppState};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Serve command runner
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    setup_logging(&args.logging)?;
    debug!("Serve arguments: {:?}", args);

    let config = Config {
        database: args.database.to_config(),
        directory: args.directory.to_config(),
        aggregation: args.aggregation.to_config(),
        server: args.server_config(),
    };
    config.validate()?;

    info!("Starting inspector sightings service");

    let directory = load_directory(&config.directory).await?;
    let store = connect_store(&config.database).await?;

    serve_on_store(&config, directory, store, !args.skip_schema).await
}

/// Serve until shutdown, closing the store's pool on every exit
async fn serve_on_store(
    config: &Config,
    directory: DirectoryHandle,
    store: Arc<PgSightingStore>,
    create_schema: bool,
) -> Result<()> {
    let result = serve_until_shutdown(config, directory, &store, create_schema).await;
    store.shutdown().await;
    info!("Sighting store closed");

    result
}

async fn serve_until_shutdown(
    config: &Config,
    directory: DirectoryHandle,
    store: &Arc<PgSightingStore>,
    create_schema: bool,
) -> Result<()> {
    if create_schema {
        store.ensure_schema().await?;
    }

    let reload_task = spawn_reload_on_hangup(directory.clone());

    let state = AppState::new(Arc::clone(store), directory, config.aggregation.clone());
    let result = server::serve(&config.server, state, shutdown_signal()).await;

    if let Some(task) = reload_task {
        task.abort();
    }
    result
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received CTRL+C, shutting down gracefully..."),
        Err(e) => {
            error!("Failed to install CTRL+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(unix)]
fn spawn_reload_on_hangup(directory: DirectoryHandle) -> Option<tokio::task::JoinHandle<()>> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut hangup = match signal(SignalKind::hangup()) {
        Ok(stream) => stream,
        Err(e) => {
            warn!("SIGHUP reload unavailable: {}", e);
            return None;
        }
    };

    Some(tokio::spawn(async move {
        while hangup.recv().await.is_some() {
            info!("Received SIGHUP, reloading station directory");
            match directory.reload().await {
                Ok(stats) => info!("{}", stats.summary()),
                Err(e) => error!("Reload failed, keeping current directory: {}", e),
            }
        }
    }))
}

#[cfg(not(unix))]
fn spawn_reload_on_hangup(_directory: DirectoryHandle) -> Option<tokio::task::JoinHandle<()>> {
    None
}
