//! Historic backfill for sparse live data
//!
//! When fewer than the target number of live sightings exist, the feed is
//! topped up with the stations most often reported at the same hour on the
//! same weekday. Stand-ins carry the store's latest write time and are flagged
//! `is_historic`.

use crate::Result;
use crate::app::models::RawSighting;
use crate::app::services::sighting_store::SightingStore;
use chrono::{DateTime, Datelike, Timelike, Utc};
use std::collections::HashSet;
use tracing::{debug, info};

/// Append historic stand-ins to `live` until `target_minimum` is reached
///
/// Candidates are taken in the given order. A candidate whose station is
/// already present is skipped. Live entries are never removed.
pub fn merge_historic(
    live: Vec<RawSighting>,
    candidates: Vec<String>,
    stamp: DateTime<Utc>,
    target_minimum: usize,
) -> Vec<RawSighting> {
    let mut present: HashSet<String> = live.iter().map(|s| s.station_id.clone()).collect();
    let mut merged = live;

    for station_id in candidates {
        if merged.len() >= target_minimum {
            break;
        }
        if !present.insert(station_id.clone()) {
            debug!("Skipping historic station {}, already present", station_id);
            continue;
        }
        merged.push(RawSighting::historic(stamp, station_id));
    }

    merged
}

/// Supplement live sightings with historically frequent stations
///
/// The store is only queried when `live` holds fewer than `target_minimum`
/// entries. The candidates are ranked for `reference_time`'s hour and
/// weekday (UTC). Stand-ins are stamped with `latest_write`, the write time
/// the caller read before fetching `live`; nothing is added when it is `None`.
pub async fn backfill<S: SightingStore>(
    store: &S,
    live: Vec<RawSighting>,
    target_minimum: usize,
    candidate_limit: usize,
    reference_time: DateTime<Utc>,
    latest_write: Option<DateTime<Utc>>,
) -> Result<Vec<RawSighting>> {
    if live.len() >= target_minimum {
        return Ok(live);
    }
    let Some(stamp) = latest_write else {
        debug!("Store holds no sightings, skipping backfill");
        return Ok(live);
    };

    let hour = reference_time.hour();
    let weekday = reference_time.weekday();
    let candidates = store.fetch_historic(hour, weekday, candidate_limit).await?;
    if candidates.is_empty() {
        info!(
            "No historic stations for {} at {:02}:00, returning {} live sightings",
            weekday,
            hour,
            live.len()
        );
        return Ok(live);
    }

    let live_count = live.len();
    let merged = merge_historic(live, candidates, stamp, target_minimum);
    info!(
        "Added {} historic stations to {} live sightings",
        merged.len() - live_count,
        live_count
    );
    Ok(merged)
}
