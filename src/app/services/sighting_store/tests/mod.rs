//! Tests for the sighting store implementations

use crate::app::models::NewSighting;
use chrono::{DateTime, TimeZone, Utc};

pub mod postgres_tests;

/// Wednesday 2024-05-15 18:30 UTC
pub fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 15, 18, 30, 0).unwrap()
}

/// A stored report at a station with both id and name
pub fn station_row(timestamp: DateTime<Utc>, station_id: &str) -> NewSighting {
    NewSighting {
        timestamp,
        line: None,
        station_name: Some(format!("Name of {}", station_id)),
        station_id: Some(station_id.to_string()),
        direction_name: None,
        direction_id: None,
    }
}

/// A stored report that only names a line
pub fn line_only_row(timestamp: DateTime<Utc>, line: &str) -> NewSighting {
    NewSighting {
        timestamp,
        line: Some(line.to_string()),
        station_name: None,
        station_id: None,
        direction_name: None,
        direction_id: None,
    }
}
