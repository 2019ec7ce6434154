//! Shared test utilities and fixtures for recent-sightings tests

use crate::app::models::{Coordinates, NewSighting, ResolvedSighting, Station};
use crate::app::services::sighting_store::tests::station_row;
use chrono::{DateTime, Duration, Utc};

pub use crate::app::services::sighting_store::tests::reference_time;
pub use crate::app::services::station_directory::tests::sample_directory;

pub mod aggregator_tests;

/// Rows one week before `reference_time()`, same hour and weekday
///
/// Each station is reported `count` times, in the order given.
pub fn historic_rows(counts: &[(&str, usize)]) -> Vec<NewSighting> {
    let last_week = reference_time() - Duration::days(7);
    counts
        .iter()
        .flat_map(|&(station_id, count)| {
            (0..count).map(move |i| station_row(last_week + Duration::seconds(i as i64), station_id))
        })
        .collect()
}

/// A resolved sighting without direction or line
pub fn resolved_at(timestamp: DateTime<Utc>, id: &str, name: &str) -> ResolvedSighting {
    ResolvedSighting {
        timestamp,
        station: Station {
            id: id.to_string(),
            name: name.to_string(),
            coordinates: Coordinates::default(),
        },
        direction: Station::default(),
        line: String::new(),
        is_historic: false,
    }
}
