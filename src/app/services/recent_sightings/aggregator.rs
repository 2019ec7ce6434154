//! Recent-sightings pipeline orchestration

use super::backfill::backfill;
use super::freshness::is_unchanged_since;
use super::ranking::dedupe_and_rank;
use super::resolver::SightingResolver;
use crate::Result;
use crate::app::models::ResolvedSighting;
use crate::app::services::sighting_store::SightingStore;
use crate::app::services::station_directory::DirectoryHandle;
use crate::config::AggregationConfig;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Outcome of a recent-sightings request
#[derive(Debug, Clone, PartialEq)]
pub enum RecentSightings {
    /// Nothing was written since the client's timestamp
    NotModified,

    /// Freshly aggregated feed
    Fresh {
        sightings: Vec<ResolvedSighting>,
        /// Latest write time read before the live fetch, for the client's
        /// next request
        last_modified: Option<DateTime<Utc>>,
    },
}

impl RecentSightings {
    /// Sightings of a fresh result; empty for `NotModified`
    pub fn sightings(&self) -> &[ResolvedSighting] {
        match self {
            Self::NotModified => &[],
            Self::Fresh { sightings, .. } => sightings,
        }
    }

    pub fn is_not_modified(&self) -> bool {
        matches!(self, Self::NotModified)
    }
}

/// Runs gate, fetch, backfill, resolve and ranking for one request
///
/// Each call works against a single directory snapshot, taken before any
/// store data is read.
#[derive(Debug)]
pub struct RecentSightingsAggregator<S> {
    store: Arc<S>,
    directory: DirectoryHandle,
    settings: AggregationConfig,
}

impl<S> Clone for RecentSightingsAggregator<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            directory: self.directory.clone(),
            settings: self.settings.clone(),
        }
    }
}

impl<S: SightingStore> RecentSightingsAggregator<S> {
    pub fn new(store: Arc<S>, directory: DirectoryHandle, settings: AggregationConfig) -> Self {
        Self {
            store,
            directory,
            settings,
        }
    }

    /// Aggregate the feed as of now
    pub async fn recent_sightings(&self, if_modified_since: Option<&str>) -> Result<RecentSightings> {
        self.recent_sightings_at(if_modified_since, Utc::now()).await
    }

    /// Aggregate the feed using `now` as the backfill reference time
    ///
    /// # Errors
    /// * `Error::MalformedClientTimestamp` for an unparsable `if_modified_since`
    /// * `Error::StoreUnavailable` when a store query fails or times out
    /// * `Error::StationNotFound` when any sighting references an unknown id
    pub async fn recent_sightings_at(
        &self,
        if_modified_since: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<RecentSightings> {
        let start_time = Instant::now();

        if is_unchanged_since(self.store.as_ref(), if_modified_since).await? {
            debug!("Client copy is current, skipping aggregation");
            return Ok(RecentSightings::NotModified);
        }

        let directory = self.directory.snapshot();

        // Read before the live fetch: a write landing in between must stay
        // newer than the stamp handed back to the client
        let last_modified = self.store.latest_write_time().await?;

        let live = self
            .store
            .fetch_recent(self.settings.live_window_minutes)
            .await?;
        let live_count = live.len();

        let augmented = backfill(
            self.store.as_ref(),
            live,
            self.settings.historic_target,
            self.settings.historic_limit,
            now,
            last_modified,
        )
        .await?;

        let resolved = SightingResolver::new(&directory).resolve_all(&augmented)?;
        let sightings = dedupe_and_rank(&resolved);

        info!(
            "Aggregated {} sightings ({} live, {} after backfill) in {:?}",
            sightings.len(),
            live_count,
            augmented.len(),
            start_time.elapsed()
        );

        Ok(RecentSightings::Fresh {
            sightings,
            last_modified,
        })
    }
}
