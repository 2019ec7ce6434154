//! HTTP surface of the sightings service
//!
//! Routes:
//!
//! - `GET /recent` - the recent-sightings feed, honouring `If-Modified-Since`
//! - `POST /newInspector` - submit a rider report
//! - `GET /id?name=` and `GET /station?id=` - single station lookups
//! - `GET /stations` - station and line catalogue
//! - `GET /health` - liveness probe

pub mod error;
pub mod routes;

#[cfg(test)]
pub mod tests;

pub use routes::{AppState, create_router};

use crate::app::services::sighting_store::SightingStore;
use crate::config::ServerConfig;
use crate::{Error, Result};
use std::future::Future;
use tokio::net::TcpListener;
use tracing::info;

/// Bind the configured address and serve until `shutdown` resolves
///
/// In-flight requests are allowed to finish after `shutdown` fires.
pub async fn serve<S, F>(config: &ServerConfig, state: AppState<S>, shutdown: F) -> Result<()>
where
    S: SightingStore + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(&config.bind_address)
        .await
        .map_err(|e| Error::io(format!("Failed to bind {}", config.bind_address), e))?;
    let local_addr = listener.local_addr()?;
    info!("Listening on http://{}", local_addr);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| Error::io("HTTP server terminated unexpectedly", e))?;

    info!("HTTP server stopped");
    Ok(())
}
