//! Recent command implementation
//!
//! Runs the aggregation pipeline once against the configured store and
//! prints the result, which is handy for checking a deployment's data.

use super::shared::{connect_store, load_directory, setup_logging};
use crate::app::services::recent_sightings::{RecentSightings, RecentSightingsAggregator};
use crate::cli::args::RecentArgs;
use crate::{Error, Result};
use std::io::Write;
use tracing::{debug, info};

/// Recent command runner
pub async fn run_recent(args: RecentArgs) -> Result<()> {
    setup_logging(&args.logging)?;
    debug!("Recent arguments: {:?}", args);

    let aggregation = args.aggregation.to_config();
    aggregation.validate()?;

    let directory = load_directory(&args.directory.to_config()).await?;
    let store = connect_store(&args.database.to_config()).await?;

    let aggregator = RecentSightingsAggregator::new(store.clone(), directory, aggregation);
    let result = aggregator.recent_sightings(args.since.as_deref()).await;
    store.shutdown().await;

    match result? {
        RecentSightings::NotModified => {
            info!("Nothing new since {}", args.since.as_deref().unwrap_or_default());
        }
        RecentSightings::Fresh {
            sightings,
            last_modified,
        } => {
            let mut stdout = std::io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &sightings)
                .map_err(|e| Error::io("Failed to write sightings", e.into()))?;
            writeln!(stdout)?;

            if let Some(latest) = last_modified {
                info!("Latest write: {}", latest.to_rfc3339());
            }
        }
    }

    Ok(())
}
