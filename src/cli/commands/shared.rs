//! Shared components for CLI commands
//!
//! Logging set-up plus the start-up steps every command needs: loading the
//! station directory and connecting to the sighting store.

use crate::app::services::sighting_store::PgSightingStore;
use crate::app::services::station_directory::DirectoryHandle;
use crate::cli::args::LoggingArgs;
use crate::config::{DatabaseConfig, DirectoryConfig};
use crate::constants::LOG_TARGET;
use crate::{Error, Result};
use std::sync::Arc;
use tracing::{debug, warn};

/// Set up structured logging on stderr
///
/// `RUST_LOG` takes precedence over the level derived from the flags.
pub fn setup_logging(args: &LoggingArgs) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    // Create filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={}", LOG_TARGET, log_level)));

    let result = if args.quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        // Standard logging with timestamps
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    result.map_err(|e| Error::configuration(format!("Failed to initialize logging: {}", e)))?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load the station directory, warning about an inconsistent line catalogue
pub async fn load_directory(config: &DirectoryConfig) -> Result<DirectoryHandle> {
    let (handle, stats) = DirectoryHandle::load(config.clone()).await?;
    if stats.has_warnings() {
        warn!(
            "{} line entries reference unknown stations",
            stats.dangling_line_stations.len()
        );
    }

    Ok(handle)
}

/// Open the store's connection pool, shared between services
pub async fn connect_store(config: &DatabaseConfig) -> Result<Arc<PgSightingStore>> {
    let store = PgSightingStore::connect(config).await?;
    Ok(Arc::new(store))
}
