//! Data models for inspector sightings
//!
//! This module contains the core data structures for representing stations,
//! raw sightings as they come out of the store, and resolved sightings as
//! they are handed to map clients.

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Station Structures
// =============================================================================

/// WGS84 position of a station
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Validate that the coordinates lie within WGS84 bounds
    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(Error::configuration(format!(
                "Invalid latitude {}: must be between -90 and 90 degrees",
                self.latitude
            )));
        }

        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(Error::configuration(format!(
                "Invalid longitude {}: must be between -180 and 180 degrees",
                self.longitude
            )));
        }

        Ok(())
    }
}

/// A transit station from the static dataset
///
/// Stations are keyed by a short stable code such as `"U-Ado"`. The zero
/// value (`Station::default()`) stands in for a missing direction.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Station {
    pub id: String,
    pub name: String,
    pub coordinates: Coordinates,
}

impl Station {
    /// Create a new Station with validation
    pub fn new(id: String, name: String, coordinates: Coordinates) -> Result<Self> {
        let station = Self {
            id,
            name,
            coordinates,
        };

        station.validate()?;
        Ok(station)
    }

    /// Validate station data for consistency and valid ranges
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::configuration("Station id cannot be empty"));
        }

        if self.name.trim().is_empty() {
            return Err(Error::configuration(format!(
                "Station '{}' has an empty name",
                self.id
            )));
        }

        self.coordinates.validate().map_err(|e| {
            Error::configuration(format!("Station '{}' has invalid coordinates: {}", self.id, e))
        })
    }

    /// Whether this is the zero value used for "no direction"
    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }
}

/// Station id and name pair used in catalogue listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationListEntry {
    pub id: String,
    pub name: String,
}

/// A transit line and the ids of the stations it serves, in route order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    pub name: String,
    pub stations: Vec<String>,
}

// =============================================================================
// Sighting Structures
// =============================================================================

/// A sighting as produced by the store or by historic backfill
///
/// `line_id` and `direction_id` mirror nullable columns: `None` means the
/// reporter did not provide the value, which is distinct from `Some("")`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSighting {
    pub timestamp: DateTime<Utc>,
    pub station_id: String,
    pub line_id: Option<String>,
    pub direction_id: Option<String>,
    pub is_historic: bool,
}

impl RawSighting {
    /// Create a live sighting without line or direction
    pub fn live(timestamp: DateTime<Utc>, station_id: impl Into<String>) -> Self {
        Self {
            timestamp,
            station_id: station_id.into(),
            line_id: None,
            direction_id: None,
            is_historic: false,
        }
    }

    /// Create a historic stand-in for a frequently reported station
    pub fn historic(timestamp: DateTime<Utc>, station_id: impl Into<String>) -> Self {
        Self {
            is_historic: true,
            ..Self::live(timestamp, station_id)
        }
    }

    pub fn with_line(mut self, line_id: impl Into<String>) -> Self {
        self.line_id = Some(line_id.into());
        self
    }

    pub fn with_direction(mut self, direction_id: impl Into<String>) -> Self {
        self.direction_id = Some(direction_id.into());
        self
    }
}

/// A sighting with station and direction resolved for presentation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSighting {
    pub timestamp: DateTime<Utc>,
    pub station: Station,
    pub direction: Station,
    pub line: String,
    #[serde(rename = "isHistoric")]
    pub is_historic: bool,
}

/// A report ready to be persisted by the store
///
/// Every column except the timestamp is nullable; absent values stay `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSighting {
    pub timestamp: DateTime<Utc>,
    pub line: Option<String>,
    pub station_name: Option<String>,
    pub station_id: Option<String>,
    pub direction_name: Option<String>,
    pub direction_id: Option<String>,
}

// =============================================================================
// Report Intake Structures
// =============================================================================

/// A rider's report as submitted by the client
///
/// Station and direction are human-entered names, resolved through the
/// station directory before anything is stored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InspectorReport {
    #[serde(default)]
    pub line: Option<String>,
    #[serde(default)]
    pub station: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
}

/// What the intake echoes back after storing a report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportReceipt {
    pub line: String,
    pub station: Station,
    pub direction: Station,
}
