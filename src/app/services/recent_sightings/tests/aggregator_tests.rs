//! Tests for the recent-sightings pipeline

use super::*;
use crate::app::models::{NewSighting, RawSighting};
use crate::app::services::recent_sightings::{RecentSightings, RecentSightingsAggregator};
use crate::app::services::sighting_store::{MemorySightingStore, SightingStore};
use crate::{Error, Result};
use crate::app::services::sighting_store::tests::station_row;
use crate::app::services::station_directory::tests::create_test_station;
use crate::app::services::station_directory::{DirectoryHandle, StationDirectory};
use crate::config::AggregationConfig;
use chrono::{DateTime, Duration, SecondsFormat, Utc, Weekday};
use std::sync::{Arc, Mutex};

/// Memory store that records one more report right after the live fetch
struct LateWriteStore {
    inner: MemorySightingStore,
    late_write: Mutex<Option<NewSighting>>,
}

impl SightingStore for LateWriteStore {
    async fn fetch_recent(&self, window_minutes: u32) -> Result<Vec<RawSighting>> {
        let live = self.inner.fetch_recent(window_minutes).await?;
        let late = self.late_write.lock().unwrap().take();
        if let Some(row) = late {
            self.inner.insert(&row).await?;
        }
        Ok(live)
    }

    async fn fetch_historic(&self, hour: u32, weekday: Weekday, limit: usize) -> Result<Vec<String>> {
        self.inner.fetch_historic(hour, weekday, limit).await
    }

    async fn latest_write_time(&self) -> Result<Option<DateTime<Utc>>> {
        self.inner.latest_write_time().await
    }

    async fn insert(&self, sighting: &NewSighting) -> Result<()> {
        self.inner.insert(sighting).await
    }
}

/// Store whose live query always times out
struct UnreachableStore;

impl SightingStore for UnreachableStore {
    async fn fetch_recent(&self, _window_minutes: u32) -> Result<Vec<RawSighting>> {
        Err(Error::store_timeout(
            "fetch recent sightings",
            std::time::Duration::from_secs(10),
        ))
    }

    async fn fetch_historic(&self, _hour: u32, _weekday: Weekday, _limit: usize) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    async fn latest_write_time(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(Some(reference_time()))
    }

    async fn insert(&self, _sighting: &NewSighting) -> Result<()> {
        Ok(())
    }
}

fn aggregator_with(rows: Vec<NewSighting>) -> RecentSightingsAggregator<MemorySightingStore> {
    let store = Arc::new(MemorySightingStore::with_rows(rows).at(reference_time()));
    RecentSightingsAggregator::new(
        store,
        DirectoryHandle::new(sample_directory()),
        AggregationConfig::default(),
    )
}

#[tokio::test]
async fn test_empty_store_yields_empty_feed() {
    let aggregator = aggregator_with(Vec::new());

    let result = aggregator
        .recent_sightings_at(None, reference_time())
        .await
        .unwrap();

    assert_eq!(
        result,
        RecentSightings::Fresh {
            sightings: Vec::new(),
            last_modified: None,
        }
    );
}

#[tokio::test]
async fn test_live_and_historic_combined() {
    let now = reference_time();
    let mut rows = historic_rows(&[("U-Hptz", 3), ("U-Ado", 2), ("S-Ost", 1)]);
    rows.push(NewSighting {
        line: Some("U7".to_string()),
        direction_id: Some("SU-Zoo".to_string()),
        direction_name: Some("Zoologischer Garten".to_string()),
        ..station_row(now - Duration::minutes(10), "U-Ado")
    });
    rows.push(station_row(now - Duration::minutes(40), "U-Ado"));
    rows.push(station_row(now - Duration::minutes(5), "SU-A"));
    let aggregator = aggregator_with(rows);

    let result = aggregator.recent_sightings_at(None, now).await.unwrap();
    let RecentSightings::Fresh {
        sightings,
        last_modified,
    } = result
    else {
        panic!("expected a fresh result");
    };

    let names: Vec<&str> = sightings.iter().map(|s| s.station.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Alexanderplatz", "Hermannplatz", "Ostkreuz", "Adenauerplatz"]
    );

    let latest = now - Duration::minutes(5);
    assert_eq!(last_modified, Some(latest));
    assert!(!sightings[0].is_historic);
    assert!(sightings[1].is_historic && sightings[1].timestamp == latest);
    assert!(sightings[2].is_historic && sightings[2].timestamp == latest);

    let adenauerplatz = &sightings[3];
    assert!(!adenauerplatz.is_historic);
    assert_eq!(adenauerplatz.timestamp, now - Duration::minutes(10));
    assert_eq!(adenauerplatz.line, "U7");
    assert_eq!(adenauerplatz.direction.name, "Zoologischer Garten");
}

#[tokio::test]
async fn test_not_modified_when_nothing_new() {
    let now = reference_time();
    let aggregator = aggregator_with(vec![station_row(now - Duration::minutes(5), "SU-A")]);

    let result = aggregator
        .recent_sightings_at(Some("2024-05-15T18:30:00Z"), now)
        .await
        .unwrap();
    assert!(result.is_not_modified());
    assert!(result.sightings().is_empty());

    let result = aggregator
        .recent_sightings_at(Some("2024-05-15T18:00:00Z"), now)
        .await
        .unwrap();
    assert_eq!(result.sightings().len(), 1);
}

#[tokio::test]
async fn test_unknown_station_fails_request() {
    let now = reference_time();
    let aggregator = aggregator_with(vec![
        station_row(now - Duration::minutes(5), "SU-A"),
        station_row(now - Duration::minutes(6), "X-Removed"),
    ]);

    let result = aggregator.recent_sightings_at(None, now).await;
    assert!(matches!(
        result,
        Err(Error::StationNotFound { ref station_id }) if station_id == "X-Removed"
    ));
}

#[tokio::test]
async fn test_malformed_client_timestamp_fails_request() {
    let aggregator = aggregator_with(Vec::new());

    let result = aggregator
        .recent_sightings_at(Some("15/05/2024"), reference_time())
        .await;
    assert!(matches!(result, Err(Error::MalformedClientTimestamp { .. })));
}

#[tokio::test]
async fn test_directory_swap_applies_to_next_request() {
    let now = reference_time();
    let store = Arc::new(
        MemorySightingStore::with_rows(vec![station_row(now - Duration::minutes(5), "U-Ado")]).at(now),
    );
    let handle = DirectoryHandle::new(sample_directory());
    let aggregator =
        RecentSightingsAggregator::new(store, handle.clone(), AggregationConfig::default());

    let before = aggregator.recent_sightings_at(None, now).await.unwrap();
    assert_eq!(before.sightings()[0].station.name, "Adenauerplatz");

    let (renamed, _) = StationDirectory::from_stations(vec![create_test_station(
        "U-Ado",
        "Adenauerplatz (Kurfürstendamm)",
        52.499755,
        13.307208,
    )]);
    handle.replace(renamed);

    let after = aggregator.recent_sightings_at(None, now).await.unwrap();
    assert_eq!(
        after.sightings()[0].station.name,
        "Adenauerplatz (Kurfürstendamm)"
    );
}

#[tokio::test]
async fn test_write_during_live_fetch_is_served_next_time() {
    let now = reference_time();
    let store = Arc::new(LateWriteStore {
        inner: MemorySightingStore::with_rows(vec![station_row(now - Duration::minutes(5), "U-Ado")])
            .at(now),
        late_write: Mutex::new(Some(station_row(now - Duration::minutes(1), "SU-A"))),
    });
    let settings = AggregationConfig {
        historic_target: 1,
        ..AggregationConfig::default()
    };
    let aggregator =
        RecentSightingsAggregator::new(store, DirectoryHandle::new(sample_directory()), settings);

    let first = aggregator.recent_sightings_at(None, now).await.unwrap();
    let RecentSightings::Fresh {
        sightings,
        last_modified,
    } = first
    else {
        panic!("expected a fresh result");
    };
    let ids: Vec<&str> = sightings.iter().map(|s| s.station.id.as_str()).collect();
    assert_eq!(ids, vec!["U-Ado"]);
    assert_eq!(last_modified, Some(now - Duration::minutes(5)));

    let echoed = last_modified
        .unwrap()
        .to_rfc3339_opts(SecondsFormat::AutoSi, true);
    let second = aggregator
        .recent_sightings_at(Some(&echoed), now)
        .await
        .unwrap();
    assert!(!second.is_not_modified());
    let ids: Vec<&str> = second
        .sightings()
        .iter()
        .map(|s| s.station.id.as_str())
        .collect();
    assert_eq!(ids, vec!["SU-A", "U-Ado"]);
}

#[tokio::test]
async fn test_store_failure_fails_request() {
    let aggregator = RecentSightingsAggregator::new(
        Arc::new(UnreachableStore),
        DirectoryHandle::new(sample_directory()),
        AggregationConfig::default(),
    );

    let result = aggregator.recent_sightings_at(None, reference_time()).await;
    assert!(matches!(result, Err(Error::StoreUnavailable { .. })));
}
