//! Rider report intake
//!
//! Validates a submitted report, resolves the human-entered station and
//! direction names through the station directory and persists the result
//! through the sighting store. Nothing is written unless the whole report
//! resolves.

use crate::app::models::{InspectorReport, NewSighting, ReportReceipt, Station};
use crate::app::services::sighting_store::SightingStore;
use crate::app::services::station_directory::{DirectoryHandle, StationDirectory};
use crate::constants::MAX_LINE_LENGTH;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[cfg(test)]
pub mod tests;

/// Accepts rider reports and stores them as new sightings
#[derive(Debug)]
pub struct ReportService<S> {
    store: Arc<S>,
    directory: DirectoryHandle,
}

impl<S> Clone for ReportService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            directory: self.directory.clone(),
        }
    }
}

impl<S: SightingStore> ReportService<S> {
    pub fn new(store: Arc<S>, directory: DirectoryHandle) -> Self {
        Self { store, directory }
    }

    /// Validate, resolve and store a report stamped `now`
    ///
    /// Fields are trimmed and empty values count as absent. The stored row
    /// carries the directory's canonical station names, not the rider's
    /// spelling.
    ///
    /// # Errors
    /// * `Error::InvalidReport` when no field is given or the line is too long
    /// * `Error::UnknownStationName` when a name matches no station
    /// * `Error::StoreUnavailable` when the insert fails
    pub async fn submit(&self, report: InspectorReport, now: DateTime<Utc>) -> Result<ReportReceipt> {
        let line = present(report.line.as_deref());
        let station_name = present(report.station.as_deref());
        let direction_name = present(report.direction.as_deref());

        if line.is_none() && station_name.is_none() && direction_name.is_none() {
            return Err(Error::invalid_report(
                "a report needs at least one of line, station or direction",
            ));
        }

        if let Some(line) = &line {
            if line.chars().count() > MAX_LINE_LENGTH {
                return Err(Error::invalid_report(format!(
                    "line '{}' is longer than {} characters",
                    line, MAX_LINE_LENGTH
                )));
            }
        }

        let (station, direction) = {
            let directory = self.directory.snapshot();
            (
                resolve_name(&directory, station_name.as_deref())?,
                resolve_name(&directory, direction_name.as_deref())?,
            )
        };

        let sighting = NewSighting {
            timestamp: now,
            line: line.clone(),
            station_name: station.as_ref().map(|s| s.name.clone()),
            station_id: station.as_ref().map(|s| s.id.clone()),
            direction_name: direction.as_ref().map(|s| s.name.clone()),
            direction_id: direction.as_ref().map(|s| s.id.clone()),
        };
        self.store.insert(&sighting).await?;

        info!(
            "Stored report: line = {:?}, station = {:?}, direction = {:?}",
            sighting.line, sighting.station_id, sighting.direction_id
        );

        Ok(ReportReceipt {
            line: line.unwrap_or_default(),
            station: station.unwrap_or_default(),
            direction: direction.unwrap_or_default(),
        })
    }
}

/// Trimmed value, `None` when absent or blank
fn present(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn resolve_name(directory: &StationDirectory, name: Option<&str>) -> Result<Option<Station>> {
    let Some(name) = name else {
        return Ok(None);
    };

    let Some(station) = directory
        .resolve_by_name(name)
        .and_then(|id| directory.get_station(id))
    else {
        warn!("Rejected report with unknown station name '{}'", name);
        return Err(Error::unknown_station_name(name));
    };

    debug!("Resolved '{}' to {}", name, station.id);
    Ok(Some(station.clone()))
}
