//! Resolve raw sightings against the station directory
//!
//! An unknown station or direction id is a data-integrity fault and fails the
//! whole batch.

use crate::Result;
use crate::app::models::{RawSighting, ResolvedSighting, Station};
use crate::app::services::station_directory::StationDirectory;
use tracing::error;

/// Turns raw sightings into presentation-ready ones
#[derive(Debug, Clone, Copy)]
pub struct SightingResolver<'a> {
    directory: &'a StationDirectory,
}

impl<'a> SightingResolver<'a> {
    pub fn new(directory: &'a StationDirectory) -> Self {
        Self { directory }
    }

    /// Resolve one sighting
    ///
    /// A missing direction resolves to the zero-value station. The line is
    /// copied as-is, empty when absent.
    ///
    /// # Errors
    /// * Returns `Error::StationNotFound` for an unknown station or direction id
    pub fn resolve(&self, raw: &RawSighting) -> Result<ResolvedSighting> {
        let station = self.lookup(&raw.station_id)?;

        let direction = match &raw.direction_id {
            Some(direction_id) => self.lookup(direction_id)?,
            None => Station::default(),
        };

        Ok(ResolvedSighting {
            timestamp: raw.timestamp,
            station,
            direction,
            line: raw.line_id.clone().unwrap_or_default(),
            is_historic: raw.is_historic,
        })
    }

    /// Resolve a batch, stopping at the first unresolvable id
    pub fn resolve_all(&self, raws: &[RawSighting]) -> Result<Vec<ResolvedSighting>> {
        raws.iter().map(|raw| self.resolve(raw)).collect()
    }

    fn lookup(&self, id: &str) -> Result<Station> {
        self.directory.resolve_by_id(id).cloned().inspect_err(|e| {
            error!("Cannot resolve sighting: {}", e);
        })
    }
}
