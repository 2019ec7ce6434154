//! In-memory sighting store
//!
//! Mirrors the row filtering of the PostgreSQL store: rows without a station
//! id or name never show up in live or historic queries, and historic ranking
//! keeps first-seen order between stations with equal counts.

use super::{SightingStore, sanitize_column};
use crate::Result;
use crate::app::models::{NewSighting, RawSighting};
use chrono::{DateTime, Datelike, Duration, Timelike, Utc, Weekday};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Sighting store holding rows in process memory
#[derive(Debug, Default)]
pub struct MemorySightingStore {
    rows: RwLock<Vec<NewSighting>>,

    /// Clock override for the live window; wall clock when `None`
    fixed_now: Option<DateTime<Utc>>,
}

impl MemorySightingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with rows
    pub fn with_rows(rows: Vec<NewSighting>) -> Self {
        Self {
            rows: RwLock::new(rows),
            fixed_now: None,
        }
    }

    /// Evaluate the live window against a fixed instant instead of the wall clock
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.fixed_now = Some(now);
        self
    }

    /// Number of stored rows
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    fn now(&self) -> DateTime<Utc> {
        self.fixed_now.unwrap_or_else(Utc::now)
    }
}

/// Station id of a row that counts for live and historic queries
fn countable_station(row: &NewSighting) -> Option<&str> {
    match (&row.station_id, &row.station_name) {
        (Some(id), Some(_)) => Some(id.as_str()),
        _ => None,
    }
}

impl SightingStore for MemorySightingStore {
    async fn fetch_recent(&self, window_minutes: u32) -> Result<Vec<RawSighting>> {
        let cutoff = self.now() - Duration::minutes(i64::from(window_minutes));
        let rows = self.rows.read().await;

        let sightings: Vec<RawSighting> = rows
            .iter()
            .filter(|row| row.timestamp >= cutoff)
            .filter_map(|row| {
                countable_station(row).map(|station_id| RawSighting {
                    timestamp: row.timestamp,
                    station_id: sanitize_column(station_id),
                    line_id: row.line.as_deref().map(sanitize_column),
                    direction_id: row.direction_id.as_deref().map(sanitize_column),
                    is_historic: false,
                })
            })
            .collect();

        debug!(
            "Memory store returned {} sightings newer than {}",
            sightings.len(),
            cutoff
        );
        Ok(sightings)
    }

    async fn fetch_historic(&self, hour: u32, weekday: Weekday, limit: usize) -> Result<Vec<String>> {
        let rows = self.rows.read().await;

        let mut order: Vec<String> = Vec::new();
        let mut counts: HashMap<String, usize> = HashMap::new();
        for row in rows.iter() {
            if row.timestamp.hour() != hour || row.timestamp.weekday() != weekday {
                continue;
            }
            if let Some(station_id) = countable_station(row) {
                let station_id = sanitize_column(station_id);
                let count = counts.entry(station_id.clone()).or_insert(0);
                if *count == 0 {
                    order.push(station_id);
                }
                *count += 1;
            }
        }

        // Stable sort keeps first-seen order for equal counts
        order.sort_by(|a, b| counts[b].cmp(&counts[a]));
        order.truncate(limit);
        Ok(order)
    }

    async fn latest_write_time(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self.rows.read().await.iter().map(|row| row.timestamp).max())
    }

    async fn insert(&self, sighting: &NewSighting) -> Result<()> {
        self.rows.write().await.push(sighting.clone());
        Ok(())
    }
}
