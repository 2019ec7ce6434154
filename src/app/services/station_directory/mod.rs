//! Station directory service for id and name lookups
//!
//! This module provides the in-memory station directory that resolves the
//! short station codes stored with each sighting into names and coordinates,
//! and resolves rider-entered names back into codes.
//!
//! The directory is built once from the static dataset and never mutated
//! afterwards. [`DirectoryHandle`] shares it between requests and swaps in a
//! complete new snapshot when the dataset is reloaded.

use crate::app::models::{Line, Station};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::PathBuf;
use std::time::Instant;
use tracing::warn;

pub mod handle;
pub mod loader;
pub mod metadata;
pub mod query;

#[cfg(test)]
pub mod tests;

// Re-export key types for convenience
pub use handle::DirectoryHandle;
pub use metadata::{DirectoryMetadata, LoadStats};
pub use query::normalize_name;

/// Station directory providing O(1) id and name lookups
#[derive(Debug, Clone)]
pub struct StationDirectory {
    /// Stations in dataset load order
    pub(crate) stations: Vec<Station>,

    /// Position in `stations` by station id
    pub(crate) by_id: HashMap<String, usize>,

    /// Position in `stations` by normalized name; first loaded station wins
    pub(crate) by_name: HashMap<String, usize>,

    /// Line catalogue in dataset load order
    pub(crate) lines: Vec<Line>,

    /// Dataset the directory was loaded from, if any
    pub(crate) source_path: Option<PathBuf>,

    /// When the directory was built
    pub(crate) load_time: Instant,
}

impl StationDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self {
            stations: Vec::new(),
            by_id: HashMap::new(),
            by_name: HashMap::new(),
            lines: Vec::new(),
            source_path: None,
            load_time: Instant::now(),
        }
    }

    /// Build a directory from stations in load order
    ///
    /// Returns the rejected duplicate ids alongside the directory; the first
    /// station seen for an id is kept.
    pub fn from_stations(stations: impl IntoIterator<Item = Station>) -> (Self, Vec<String>) {
        let mut directory = Self::new();
        let mut duplicates = Vec::new();

        for station in stations {
            if !directory.insert(station.clone()) {
                warn!(
                    "Duplicate station found: id = {}, name = '{}', keeping existing",
                    station.id, station.name
                );
                duplicates.push(station.id);
            }
        }

        (directory, duplicates)
    }

    /// Attach a line catalogue
    pub fn with_lines(mut self, lines: Vec<Line>) -> Self {
        self.lines = lines;
        self
    }

    /// Add a station, returning false if its id is already present
    pub(crate) fn insert(&mut self, station: Station) -> bool {
        let position = self.stations.len();

        match self.by_id.entry(station.id.clone()) {
            Entry::Occupied(_) => return false,
            Entry::Vacant(e) => {
                e.insert(position);
            }
        }

        self.by_name
            .entry(normalize_name(&station.name))
            .or_insert(position);
        self.stations.push(station);
        true
    }

    /// Get station by id (O(1) lookup)
    pub fn get_station(&self, id: &str) -> Option<&Station> {
        self.by_id.get(id).map(|&position| &self.stations[position])
    }

    /// Check if a station exists in the directory
    pub fn contains_station(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Get the total number of stations in the directory
    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    /// Get the total number of lines in the catalogue
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Get directory metadata
    pub fn metadata(&self) -> DirectoryMetadata {
        DirectoryMetadata {
            source_path: self.source_path.clone(),
            station_count: self.stations.len(),
            line_count: self.lines.len(),
            load_time: self.load_time,
        }
    }
}

impl Default for StationDirectory {
    fn default() -> Self {
        Self::new()
    }
}
