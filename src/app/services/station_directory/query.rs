//! Station lookup and listing functionality
//!
//! This module provides the lookups the aggregator and report intake depend
//! on: strict id resolution, forgiving name resolution, and sorted catalogue
//! listings for clients.

use super::StationDirectory;
use crate::app::models::{Line, Station, StationListEntry};
use crate::{Error, Result};

/// Normalize a station name for comparison
///
/// Lowercases the name and drops every whitespace character, so that
/// `"Hermann Platz"`, `"hermannplatz"` and `" HERMANN\tPLATZ "` compare equal.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

impl StationDirectory {
    /// Resolve a station id to its station
    ///
    /// # Errors
    /// * Returns `Error::StationNotFound` if the id is not in the directory
    pub fn resolve_by_id(&self, id: &str) -> Result<&Station> {
        self.get_station(id)
            .ok_or_else(|| Error::station_not_found(id))
    }

    /// Resolve a human-entered station name to a station id
    ///
    /// Matching ignores case and all whitespace. When several stations share
    /// a normalized name, the one loaded first is returned.
    ///
    /// # Examples
    /// ```
    /// # use inspector_sightings::app::services::station_directory::StationDirectory;
    /// # use inspector_sightings::{Coordinates, Station};
    /// let station = Station::new(
    ///     "U-Ado".to_string(),
    ///     "Adenauerplatz".to_string(),
    ///     Coordinates::new(52.4998, 13.3072),
    /// )
    /// .unwrap();
    /// let (directory, _) = StationDirectory::from_stations([station]);
    ///
    /// assert_eq!(directory.resolve_by_name("adenauer platz"), Some("U-Ado"));
    /// assert_eq!(directory.resolve_by_name("Zoo"), None);
    /// ```
    pub fn resolve_by_name(&self, name: &str) -> Option<&str> {
        self.by_name
            .get(&normalize_name(name))
            .map(|&position| self.stations[position].id.as_str())
    }

    /// Get the name of a station by id
    pub fn station_name(&self, id: &str) -> Option<&str> {
        self.get_station(id).map(|station| station.name.as_str())
    }

    /// Get all stations in dataset load order
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// List all stations as id/name pairs sorted by name, then id
    pub fn station_list(&self) -> Vec<StationListEntry> {
        let mut entries: Vec<StationListEntry> = self
            .stations
            .iter()
            .map(|station| StationListEntry {
                id: station.id.clone(),
                name: station.name.clone(),
            })
            .collect();

        entries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        entries
    }

    /// List the line catalogue sorted by line name
    pub fn lines(&self) -> Vec<Line> {
        let mut lines = self.lines.clone();
        lines.sort_by(|a, b| a.name.cmp(&b.name));
        lines
    }

    /// Names of the lines serving a station, sorted
    pub fn lines_serving(&self, station_id: &str) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .lines
            .iter()
            .filter(|line| line.stations.iter().any(|id| id == station_id))
            .map(|line| line.name.as_str())
            .collect();

        names.sort_unstable();
        names
    }
}
