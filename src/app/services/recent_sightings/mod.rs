//! Recent-sightings aggregation
//!
//! This module builds the feed of recent inspector sightings shown on the
//! rider map.
//!
//! # Architecture
//!
//! - [`freshness`] - conditional-request check against the latest write
//! - [`backfill`] - historic stand-ins when live data is sparse
//! - [`resolver`] - station id to name and coordinate resolution
//! - [`ranking`] - one sighting per station, newest first
//! - [`aggregator`] - the pipeline tying the steps together
//!
//! # Processing Pipeline
//!
//! 1. **Freshness gate**: answer "not modified" when nothing new was written
//! 2. **Fetch**: live sightings within the configured window
//! 3. **Backfill**: top up to the target count with frequent stations
//! 4. **Resolve**: attach station and direction details, failing on unknown ids
//! 5. **Rank**: deduplicate per station and order for presentation
//!
//! # Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use inspector_sightings::app::services::recent_sightings::RecentSightingsAggregator;
//! use inspector_sightings::app::services::sighting_store::MemorySightingStore;
//! use inspector_sightings::app::services::station_directory::{DirectoryHandle, StationDirectory};
//! use inspector_sightings::config::AggregationConfig;
//!
//! # async fn example() -> inspector_sightings::Result<()> {
//! let store = Arc::new(MemorySightingStore::new());
//! let directory = DirectoryHandle::new(StationDirectory::new());
//! let aggregator = RecentSightingsAggregator::new(store, directory, AggregationConfig::default());
//!
//! let result = aggregator.recent_sightings(None).await?;
//! println!("{} sightings", result.sightings().len());
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod backfill;
pub mod freshness;
pub mod ranking;
pub mod resolver;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use aggregator::{RecentSightings, RecentSightingsAggregator};
pub use backfill::{backfill, merge_historic};
pub use freshness::{is_unchanged, is_unchanged_since, parse_client_timestamp};
pub use ranking::dedupe_and_rank;
pub use resolver::SightingResolver;
